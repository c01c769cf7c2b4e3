use rusqlite::Connection;
use serde_json::json;

use crate::ipc::helpers::{
    check_expected_revision, dispatch, new_id, optional_str, required_field, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{AttendanceRecord, AttendanceStatus};
use crate::seed;
use crate::session;
use crate::store;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarkEntry {
    student_id: String,
    status: AttendanceStatus,
}

fn load_attendance(conn: &Connection) -> Result<Vec<AttendanceRecord>, HandlerErr> {
    store::read_or_seed(conn, store::ATTENDANCE_KEY, &[]).map_err(HandlerErr::from)
}

/// Appends one batch of day records. The log is append-only: a second mark
/// for the same (student, date) is kept as a duplicate, matching the
/// collection's contract.
fn attendance_mark(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let entries: Vec<MarkEntry> = required_field(params, "entries")?;
    let date = optional_str(params, "date")
        .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string());
    let marked_by = session::current_user(conn)
        .map_err(HandlerErr::from)?
        .map(|u| u.name)
        .unwrap_or_else(|| "Unknown".to_string());

    check_expected_revision(conn, store::ATTENDANCE_KEY, params)?;

    let students = store::read_or_seed(conn, store::STUDENTS_KEY, &seed::initial_students())
        .map_err(HandlerErr::from)?;
    let mut attendance = load_attendance(conn)?;

    let mut appended = 0usize;
    for entry in entries {
        // Soft reference: entries naming no known student are dropped.
        let Some(student) = students.iter().find(|s| s.id == entry.student_id) else {
            continue;
        };
        attendance.push(AttendanceRecord {
            id: new_id(),
            student_id: entry.student_id,
            student_name: student.name.clone(),
            class: format!("{}{}", student.class, student.section),
            date: date.clone(),
            status: entry.status,
            marked_by: marked_by.clone(),
        });
        appended += 1;
    }

    let revision =
        store::replace(conn, store::ATTENDANCE_KEY, &attendance).map_err(HandlerErr::from)?;
    Ok(json!({ "appended": appended, "date": date, "revision": revision }))
}

fn attendance_list(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let attendance = load_attendance(conn)?;
    let student_id = optional_str(params, "studentId");
    let date = optional_str(params, "date");
    let filtered: Vec<&AttendanceRecord> = attendance
        .iter()
        .filter(|r| student_id.as_deref().map_or(true, |sid| r.student_id == sid))
        .filter(|r| date.as_deref().map_or(true, |d| r.date == d))
        .collect();
    let revision = store::revision(conn, store::ATTENDANCE_KEY).map_err(HandlerErr::from)?;
    Ok(json!({ "records": filtered, "revision": revision }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.mark" => Some(dispatch(state, req, attendance_mark)),
        "attendance.list" => Some(dispatch(state, req, attendance_list)),
        _ => None,
    }
}
