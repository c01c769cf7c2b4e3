use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_campusd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn campusd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    if value.get("ok").and_then(|v| v.as_bool()) == Some(false) {
        let code = value
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        assert_ne!(
            code, "not_implemented",
            "unexpected unknown method for {}",
            method
        );
    }
    value
}

#[test]
fn router_dispatch_smoke_covers_handler_families() {
    let workspace = temp_dir("campusd-router-smoke");
    let bundle_out = workspace.join("smoke-backup.campusbackup.zip");

    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request(&mut stdin, &mut reader, "1", "health", json!({}));
    let _ = request(
        &mut stdin,
        &mut reader,
        "2",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "3",
        "auth.login",
        json!({ "email": "admin@school.com", "password": "admin123" }),
    );
    let _ = request(&mut stdin, &mut reader, "4", "auth.currentUser", json!({}));
    let _ = request(
        &mut stdin,
        &mut reader,
        "5",
        "auth.resolveRoute",
        json!({ "path": "/admin/students" }),
    );
    let _ = request(&mut stdin, &mut reader, "6", "students.list", json!({}));
    let created_student = request(
        &mut stdin,
        &mut reader,
        "7",
        "students.create",
        json!({
            "name": "Smoke Student",
            "rollNumber": "S900",
            "class": "10",
            "section": "A",
            "dateOfBirth": "2010-01-01",
            "gender": "other",
            "parentName": "Smoke Parent",
            "contactNumber": "+1999999999",
            "email": "smoke.s@student.school.com",
            "address": "9 Smoke St",
            "admissionDate": "2026-01-01"
        }),
    );
    let student_id = created_student
        .get("result")
        .and_then(|v| v.get("studentId"))
        .and_then(|v| v.as_str())
        .expect("studentId")
        .to_string();
    let _ = request(&mut stdin, &mut reader, "8", "teachers.list", json!({}));
    let _ = request(
        &mut stdin,
        &mut reader,
        "9",
        "teachers.create",
        json!({
            "name": "Smoke Teacher",
            "email": "smoke.t@school.com",
            "phone": "+1888888888",
            "subject": "Science",
            "qualification": "B.Sc",
            "dateOfJoining": "2026-01-01",
            "address": "8 Smoke St",
            "salary": 40000
        }),
    );
    let _ = request(&mut stdin, &mut reader, "10", "parents.list", json!({}));
    let _ = request(
        &mut stdin,
        &mut reader,
        "11",
        "attendance.mark",
        json!({
            "date": "2026-03-02",
            "entries": [{ "studentId": student_id, "status": "present" }]
        }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "12",
        "attendance.list",
        json!({ "studentId": student_id }),
    );
    let scheduled = request(
        &mut stdin,
        &mut reader,
        "13",
        "exams.schedule",
        json!({
            "name": "Smoke Exam",
            "class": "10",
            "subject": "Science",
            "date": "2026-03-10",
            "totalMarks": 100,
            "passingMarks": 40,
            "duration": "2h"
        }),
    );
    let exam_id = scheduled
        .get("result")
        .and_then(|v| v.get("examId"))
        .and_then(|v| v.as_str())
        .expect("examId")
        .to_string();
    let _ = request(&mut stdin, &mut reader, "14", "exams.list", json!({}));
    let _ = request(
        &mut stdin,
        &mut reader,
        "15",
        "results.record",
        json!({ "examId": exam_id, "studentId": student_id, "marksObtained": 72 }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "16",
        "results.list",
        json!({ "studentId": student_id }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "17",
        "fees.record",
        json!({
            "studentId": student_id,
            "amount": 500,
            "paymentMode": "cash",
            "status": "paid"
        }),
    );
    let _ = request(&mut stdin, &mut reader, "18", "fees.list", json!({}));
    let _ = request(&mut stdin, &mut reader, "19", "fees.summary", json!({}));
    let _ = request(
        &mut stdin,
        &mut reader,
        "20",
        "announcements.create",
        json!({
            "title": "Smoke",
            "message": "Router smoke announcement",
            "targetAudience": "all",
            "priority": "low"
        }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "21",
        "announcements.list",
        json!({ "audience": "parents" }),
    );
    let _ = request(&mut stdin, &mut reader, "22", "reports.dashboard", json!({}));
    let _ = request(
        &mut stdin,
        &mut reader,
        "23",
        "reports.reportCard",
        json!({ "studentId": student_id }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "24",
        "reports.reportCardHtml",
        json!({ "studentId": student_id, "remarks": "Good progress" }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "25",
        "backup.exportWorkspaceBundle",
        json!({ "outPath": bundle_out.to_string_lossy() }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "26",
        "backup.importWorkspaceBundle",
        json!({ "inPath": bundle_out.to_string_lossy() }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "27",
        "students.delete",
        json!({ "studentId": student_id }),
    );
    let _ = request(&mut stdin, &mut reader, "28", "auth.logout", json!({}));

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}
