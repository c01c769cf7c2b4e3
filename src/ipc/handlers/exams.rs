use rusqlite::Connection;
use serde_json::json;

use crate::calc;
use crate::ipc::helpers::{
    check_expected_revision, dispatch, new_id, optional_field, optional_str, required_f64,
    required_str, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{Exam, ExamResult};
use crate::seed;
use crate::store;

fn load_exams(conn: &Connection) -> Result<Vec<Exam>, HandlerErr> {
    store::read_or_seed(conn, store::EXAMS_KEY, &[]).map_err(HandlerErr::from)
}

fn load_results(conn: &Connection) -> Result<Vec<ExamResult>, HandlerErr> {
    store::read_or_seed(conn, store::RESULTS_KEY, &[]).map_err(HandlerErr::from)
}

fn exams_list(conn: &Connection, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let exams = load_exams(conn)?;
    let class = optional_str(params, "class");
    let filtered: Vec<&Exam> = exams
        .iter()
        .filter(|e| class.as_deref().map_or(true, |c| e.class == c))
        .collect();
    let revision = store::revision(conn, store::EXAMS_KEY).map_err(HandlerErr::from)?;
    Ok(json!({ "exams": filtered, "revision": revision }))
}

fn exams_schedule(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let name = required_str(params, "name")?;
    let class = required_str(params, "class")?;
    let subject = required_str(params, "subject")?;
    let date = required_str(params, "date")?;
    let total_marks = required_f64(params, "totalMarks")?;
    let passing_marks = required_f64(params, "passingMarks")?;
    let duration = required_str(params, "duration")?;
    if total_marks <= 0.0 {
        return Err(HandlerErr::bad_params("totalMarks must be positive"));
    }

    check_expected_revision(conn, store::EXAMS_KEY, params)?;

    let mut exams = load_exams(conn)?;
    let exam_id = new_id();
    exams.push(Exam {
        id: exam_id.clone(),
        name,
        class,
        subject,
        date,
        total_marks,
        passing_marks,
        duration,
    });
    let revision = store::replace(conn, store::EXAMS_KEY, &exams).map_err(HandlerErr::from)?;
    Ok(json!({ "examId": exam_id, "revision": revision }))
}

fn results_list(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let results = load_results(conn)?;
    let student_id = optional_str(params, "studentId");
    let exam_id = optional_str(params, "examId");
    let filtered: Vec<&ExamResult> = results
        .iter()
        .filter(|r| student_id.as_deref().map_or(true, |sid| r.student_id == sid))
        .filter(|r| exam_id.as_deref().map_or(true, |eid| r.exam_id == eid))
        .collect();
    let revision = store::revision(conn, store::RESULTS_KEY).map_err(HandlerErr::from)?;
    Ok(json!({ "results": filtered, "revision": revision }))
}

/// Records one student's marks for a scheduled exam. Percentage and grade
/// are computed here once and stored on the result, which is what the
/// report-card average later reads back.
fn results_record(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let exam_id = required_str(params, "examId")?;
    let student_id = required_str(params, "studentId")?;
    let marks_obtained = required_f64(params, "marksObtained")?;
    let remarks: Option<String> = optional_field(params, "remarks")?;

    check_expected_revision(conn, store::RESULTS_KEY, params)?;

    let exams = load_exams(conn)?;
    let Some(exam) = exams.iter().find(|e| e.id == exam_id) else {
        return Err(HandlerErr::not_found("exam not found"));
    };
    let students = store::read_or_seed(conn, store::STUDENTS_KEY, &seed::initial_students())
        .map_err(HandlerErr::from)?;
    let Some(student) = students.iter().find(|s| s.id == student_id) else {
        return Err(HandlerErr::not_found("student not found"));
    };

    let percentage = if exam.total_marks > 0.0 {
        calc::round_2_decimals(marks_obtained / exam.total_marks * 100.0)
    } else {
        0.0
    };
    let grade = calc::grade_band(percentage).to_string();

    let mut results = load_results(conn)?;
    let result_id = new_id();
    results.push(ExamResult {
        id: result_id.clone(),
        exam_id,
        student_id,
        student_name: student.name.clone(),
        marks_obtained,
        total_marks: exam.total_marks,
        percentage,
        grade: grade.clone(),
        remarks,
    });
    let revision = store::replace(conn, store::RESULTS_KEY, &results).map_err(HandlerErr::from)?;
    Ok(json!({
        "resultId": result_id,
        "percentage": percentage,
        "grade": grade,
        "revision": revision
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "exams.list" => Some(dispatch(state, req, exams_list)),
        "exams.schedule" => Some(dispatch(state, req, exams_schedule)),
        "results.list" => Some(dispatch(state, req, results_list)),
        "results.record" => Some(dispatch(state, req, results_record)),
        _ => None,
    }
}
