use rusqlite::Connection;
use serde_json::json;

use crate::ipc::helpers::{
    check_expected_revision, dispatch, new_id, optional_field, optional_str, required_field,
    required_str, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{Gender, Parent, Student};
use crate::seed;
use crate::store;

fn load_students(conn: &Connection) -> Result<Vec<Student>, HandlerErr> {
    store::read_or_seed(conn, store::STUDENTS_KEY, &seed::initial_students())
        .map_err(HandlerErr::from)
}

fn load_parents(conn: &Connection) -> Result<Vec<Parent>, HandlerErr> {
    store::read_or_seed(conn, store::PARENTS_KEY, &seed::initial_parents())
        .map_err(HandlerErr::from)
}

fn matches_search(student: &Student, term: &str) -> bool {
    let t = term.to_lowercase();
    student.name.to_lowercase().contains(&t)
        || student.roll_number.to_lowercase().contains(&t)
        || student.class.contains(term)
}

fn students_list(conn: &Connection, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let students = load_students(conn)?;
    let filtered: Vec<&Student> = match optional_str(params, "search") {
        Some(term) if !term.is_empty() => students
            .iter()
            .filter(|s| matches_search(s, &term))
            .collect(),
        _ => students.iter().collect(),
    };
    let revision = store::revision(conn, store::STUDENTS_KEY).map_err(HandlerErr::from)?;
    Ok(json!({ "students": filtered, "revision": revision }))
}

fn students_create(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let name = required_str(params, "name")?;
    let roll_number = required_str(params, "rollNumber")?;
    let class = required_str(params, "class")?;
    let section = required_str(params, "section")?;
    let date_of_birth = required_str(params, "dateOfBirth")?;
    let gender: Gender = required_field(params, "gender")?;
    let parent_name = required_str(params, "parentName")?;
    let contact_number = required_str(params, "contactNumber")?;
    let email = required_str(params, "email")?;
    let address = required_str(params, "address")?;
    let admission_date = required_str(params, "admissionDate")?;
    let blood_group: Option<String> = optional_field(params, "bloodGroup")?;
    let photo: Option<String> = optional_field(params, "photo")?;

    check_expected_revision(conn, store::STUDENTS_KEY, params)?;

    let mut students = load_students(conn)?;
    let mut parents = load_parents(conn)?;

    let student_id = new_id();

    // Reuse an existing parent when one is named, keeping its studentIds in
    // sync; otherwise mint a linked parent account from the student's
    // contact fields.
    let (parent_id, parent_name) = match optional_str(params, "parentId") {
        Some(pid) => {
            let Some(parent) = parents.iter_mut().find(|p| p.id == pid) else {
                return Err(HandlerErr::not_found("parent not found"));
            };
            parent.student_ids.push(student_id.clone());
            (pid, parent.name.clone())
        }
        None => {
            let pid = new_id();
            parents.push(Parent {
                id: pid.clone(),
                name: parent_name.clone(),
                email: email.replace("@student", "@parent"),
                phone: contact_number.clone(),
                address: address.clone(),
                occupation: "Parent".to_string(),
                student_ids: vec![student_id.clone()],
            });
            (pid, parent_name)
        }
    };

    students.push(Student {
        id: student_id.clone(),
        name,
        photo,
        roll_number,
        class,
        section,
        date_of_birth,
        gender,
        parent_id: parent_id.clone(),
        parent_name,
        contact_number,
        email,
        address,
        admission_date,
        blood_group,
        attendance_percentage: 0.0,
    });

    let revision = store::replace(conn, store::STUDENTS_KEY, &students).map_err(HandlerErr::from)?;
    store::replace(conn, store::PARENTS_KEY, &parents).map_err(HandlerErr::from)?;

    Ok(json!({
        "studentId": student_id,
        "parentId": parent_id,
        "revision": revision
    }))
}

fn students_delete(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let student_id = required_str(params, "studentId")?;
    check_expected_revision(conn, store::STUDENTS_KEY, params)?;

    let students = load_students(conn)?;
    let before = students.len();
    let remaining: Vec<Student> = students
        .into_iter()
        .filter(|s| s.id != student_id)
        .collect();
    let removed = remaining.len() != before;
    let revision =
        store::replace(conn, store::STUDENTS_KEY, &remaining).map_err(HandlerErr::from)?;
    Ok(json!({ "removed": removed, "revision": revision }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(dispatch(state, req, students_list)),
        "students.create" => Some(dispatch(state, req, students_create)),
        "students.delete" => Some(dispatch(state, req, students_delete)),
        _ => None,
    }
}
