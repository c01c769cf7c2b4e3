use rusqlite::Connection;
use serde_json::json;

use crate::calc;
use crate::ipc::helpers::{dispatch, optional_str, required_str, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::{Audience, FeeStatus, Role, Student, User};
use crate::report;
use crate::seed;
use crate::session;
use crate::store;

struct Collections {
    students: Vec<crate::model::Student>,
    exams: Vec<crate::model::Exam>,
    results: Vec<crate::model::ExamResult>,
    attendance: Vec<crate::model::AttendanceRecord>,
    fees: Vec<crate::model::FeePayment>,
}

fn load_all(conn: &Connection) -> Result<Collections, HandlerErr> {
    Ok(Collections {
        students: store::read_or_seed(conn, store::STUDENTS_KEY, &seed::initial_students())
            .map_err(HandlerErr::from)?,
        exams: store::read_or_seed(conn, store::EXAMS_KEY, &[]).map_err(HandlerErr::from)?,
        results: store::read_or_seed(conn, store::RESULTS_KEY, &[]).map_err(HandlerErr::from)?,
        attendance: store::read_or_seed(conn, store::ATTENDANCE_KEY, &[])
            .map_err(HandlerErr::from)?,
        fees: store::read_or_seed(conn, store::FEES_KEY, &[]).map_err(HandlerErr::from)?,
    })
}

fn signed_in(conn: &Connection) -> Result<User, HandlerErr> {
    session::current_user(conn)
        .map_err(HandlerErr::from)?
        .ok_or_else(|| HandlerErr::new("forbidden", "not signed in"))
}

/// Per-role overview, computed fresh from the collections on every call.
fn reports_dashboard(
    conn: &Connection,
    _params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let user = signed_in(conn)?;
    let c = load_all(conn)?;
    let announcements =
        store::read_or_seed(conn, store::ANNOUNCEMENTS_KEY, &seed::initial_announcements())
            .map_err(HandlerErr::from)?;

    match user.role {
        Role::Admin => {
            let teachers =
                store::read_or_seed(conn, store::TEACHERS_KEY, &seed::initial_teachers())
                    .map_err(HandlerErr::from)?;
            let parents = store::read_or_seed(conn, store::PARENTS_KEY, &seed::initial_parents())
                .map_err(HandlerErr::from)?;
            let recent: Vec<serde_json::Value> = c
                .students
                .iter()
                .take(5)
                .map(|s| {
                    json!({
                        "id": s.id,
                        "name": s.name,
                        "rollNumber": s.roll_number,
                        "class": s.class,
                        "section": s.section,
                    })
                })
                .collect();
            Ok(json!({
                "role": user.role.as_str(),
                "totalStudents": c.students.len(),
                "totalTeachers": teachers.len(),
                "totalParents": parents.len(),
                "totalAnnouncements": announcements.len(),
                "recentStudents": recent,
            }))
        }
        Role::Teacher => {
            let relevant = announcements
                .iter()
                .filter(|a| {
                    a.target_audience == Audience::Teachers || a.target_audience == Audience::All
                })
                .count();
            Ok(json!({
                "role": user.role.as_str(),
                "totalStudents": c.students.len(),
                "scheduledExams": c.exams.len(),
                "announcements": relevant,
            }))
        }
        Role::Parent => {
            let children: Vec<serde_json::Value> = c
                .students
                .iter()
                .filter(|s| s.parent_id == user.id)
                .map(|s| child_overview(s, &c))
                .collect();
            let relevant = announcements
                .iter()
                .filter(|a| {
                    a.target_audience == Audience::Parents || a.target_audience == Audience::All
                })
                .count();
            Ok(json!({
                "role": user.role.as_str(),
                "children": children,
                "announcements": relevant,
            }))
        }
    }
}

fn child_overview(student: &Student, c: &Collections) -> serde_json::Value {
    let child_fees: Vec<crate::model::FeePayment> = c
        .fees
        .iter()
        .filter(|f| f.student_id == student.id)
        .cloned()
        .collect();
    let pending =
        calc::fee_total_where(&child_fees, &[FeeStatus::Pending, FeeStatus::Overdue]);
    json!({
        "student": student,
        "attendance": calc::attendance_summary(&c.attendance, student),
        "pendingFeeTotal": pending,
    })
}

fn accessible_student<'a>(
    user: &User,
    students: &'a [Student],
    student_id: &str,
) -> Result<&'a Student, HandlerErr> {
    let Some(student) = students.iter().find(|s| s.id == student_id) else {
        return Err(HandlerErr::not_found("student not found"));
    };
    // Parents only see their own children; admin and teacher see everyone.
    if user.role == Role::Parent && student.parent_id != user.id {
        return Err(HandlerErr::new("forbidden", "not your student"));
    }
    Ok(student)
}

fn reports_report_card(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let student_id = required_str(params, "studentId")?;
    let user = signed_in(conn)?;
    let c = load_all(conn)?;
    let student = accessible_student(&user, &c.students, &student_id)?;
    let model = calc::report_card_model(student, &c.exams, &c.results, &c.attendance);
    Ok(json!({ "reportCard": model }))
}

fn reports_report_card_html(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let student_id = required_str(params, "studentId")?;
    let remarks = optional_str(params, "remarks");
    let user = signed_in(conn)?;
    let c = load_all(conn)?;
    let student = accessible_student(&user, &c.students, &student_id)?;
    let model = calc::report_card_model(student, &c.exams, &c.results, &c.attendance);
    let html = report::report_card_html(&model, remarks.as_deref());
    Ok(json!({ "html": html }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "reports.dashboard" => Some(dispatch(state, req, reports_dashboard)),
        "reports.reportCard" => Some(dispatch(state, req, reports_report_card)),
        "reports.reportCardHtml" => Some(dispatch(state, req, reports_report_card_html)),
        _ => None,
    }
}
