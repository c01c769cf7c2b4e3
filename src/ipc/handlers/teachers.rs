use rusqlite::Connection;
use serde_json::json;

use crate::ipc::helpers::{
    check_expected_revision, dispatch, new_id, optional_field, optional_str, required_f64,
    required_str, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::model::Teacher;
use crate::seed;
use crate::store;

fn load_teachers(conn: &Connection) -> Result<Vec<Teacher>, HandlerErr> {
    store::read_or_seed(conn, store::TEACHERS_KEY, &seed::initial_teachers())
        .map_err(HandlerErr::from)
}

fn teachers_list(conn: &Connection, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let teachers = load_teachers(conn)?;
    let filtered: Vec<&Teacher> = match optional_str(params, "search") {
        Some(term) if !term.is_empty() => {
            let t = term.to_lowercase();
            teachers
                .iter()
                .filter(|tc| {
                    tc.name.to_lowercase().contains(&t) || tc.subject.to_lowercase().contains(&t)
                })
                .collect()
        }
        _ => teachers.iter().collect(),
    };
    let revision = store::revision(conn, store::TEACHERS_KEY).map_err(HandlerErr::from)?;
    Ok(json!({ "teachers": filtered, "revision": revision }))
}

fn teachers_create(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let name = required_str(params, "name")?;
    let email = required_str(params, "email")?;
    let phone = required_str(params, "phone")?;
    let subject = required_str(params, "subject")?;
    let qualification = required_str(params, "qualification")?;
    let date_of_joining = required_str(params, "dateOfJoining")?;
    let address = required_str(params, "address")?;
    let salary = required_f64(params, "salary")?;
    let photo: Option<String> = optional_field(params, "photo")?;

    check_expected_revision(conn, store::TEACHERS_KEY, params)?;

    let mut teachers = load_teachers(conn)?;
    let teacher_id = new_id();
    teachers.push(Teacher {
        id: teacher_id.clone(),
        name,
        photo,
        email,
        phone,
        subject,
        qualification,
        date_of_joining,
        address,
        salary,
    });
    let revision = store::replace(conn, store::TEACHERS_KEY, &teachers).map_err(HandlerErr::from)?;
    Ok(json!({ "teacherId": teacher_id, "revision": revision }))
}

fn teachers_delete(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let teacher_id = required_str(params, "teacherId")?;
    check_expected_revision(conn, store::TEACHERS_KEY, params)?;

    let teachers = load_teachers(conn)?;
    let before = teachers.len();
    let remaining: Vec<Teacher> = teachers
        .into_iter()
        .filter(|t| t.id != teacher_id)
        .collect();
    let removed = remaining.len() != before;
    let revision =
        store::replace(conn, store::TEACHERS_KEY, &remaining).map_err(HandlerErr::from)?;
    Ok(json!({ "removed": removed, "revision": revision }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "teachers.list" => Some(dispatch(state, req, teachers_list)),
        "teachers.create" => Some(dispatch(state, req, teachers_create)),
        "teachers.delete" => Some(dispatch(state, req, teachers_delete)),
        _ => None,
    }
}
