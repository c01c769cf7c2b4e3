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

fn request_ok(
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
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn parent_row<'a>(
    parents: &'a serde_json::Value,
    parent_id: &str,
) -> Option<&'a serde_json::Value> {
    parents
        .get("parents")
        .and_then(|v| v.as_array())?
        .iter()
        .find(|row| {
            row.get("parent")
                .and_then(|p| p.get("id"))
                .and_then(|v| v.as_str())
                == Some(parent_id)
        })
}

fn new_student_params(name: &str, roll: &str) -> serde_json::Value {
    json!({
        "name": name,
        "rollNumber": roll,
        "class": "10",
        "section": "A",
        "dateOfBirth": "2010-06-01",
        "gender": "female",
        "parentName": "Linda Lee",
        "contactNumber": "+1777777777",
        "email": "kid@student.school.com",
        "address": "7 Lee Ln",
        "admissionDate": "2026-01-05"
    })
}

#[test]
fn creating_a_student_mints_a_linked_parent_account() {
    let workspace = temp_dir("campusd-parent-mint");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "students.create",
        new_student_params("Lily Lee", "S101"),
    );
    let student_id = created
        .get("studentId")
        .and_then(|v| v.as_str())
        .expect("studentId")
        .to_string();
    let parent_id = created
        .get("parentId")
        .and_then(|v| v.as_str())
        .expect("parentId")
        .to_string();

    let parents = request_ok(&mut stdin, &mut reader, "3", "parents.list", json!({}));
    let row = parent_row(&parents, &parent_id).expect("minted parent listed");
    let parent = row.get("parent").expect("parent body");
    assert_eq!(
        parent.get("name").and_then(|v| v.as_str()),
        Some("Linda Lee")
    );
    // The parent email is derived from the student's address.
    assert_eq!(
        parent.get("email").and_then(|v| v.as_str()),
        Some("kid@parent.school.com")
    );
    assert_eq!(
        parent.get("occupation").and_then(|v| v.as_str()),
        Some("Parent")
    );
    let children = row.get("children").and_then(|v| v.as_array()).expect("children");
    assert_eq!(children.len(), 1);
    assert_eq!(
        children[0].get("id").and_then(|v| v.as_str()),
        Some(student_id.as_str())
    );

    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn reusing_an_existing_parent_syncs_its_student_list() {
    let workspace = temp_dir("campusd-parent-reuse");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    // Parent "3" (Sarah Parent) is seeded with one child.
    let mut params = new_student_params("Liam Johnson", "S102");
    params["parentId"] = json!("3");
    let created = request_ok(&mut stdin, &mut reader, "2", "students.create", params);
    let student_id = created
        .get("studentId")
        .and_then(|v| v.as_str())
        .expect("studentId")
        .to_string();
    assert_eq!(created.get("parentId").and_then(|v| v.as_str()), Some("3"));

    let parents = request_ok(&mut stdin, &mut reader, "3", "parents.list", json!({}));
    let row = parent_row(&parents, "3").expect("existing parent listed");
    let children = row.get("children").and_then(|v| v.as_array()).expect("children");
    assert_eq!(children.len(), 2);
    assert!(children
        .iter()
        .any(|c| c.get("id").and_then(|v| v.as_str()) == Some(student_id.as_str())));

    // The denormalized parentName on the student follows the reused parent.
    let students = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "students.list",
        json!({ "search": "Liam" }),
    );
    let student = &students.get("students").and_then(|v| v.as_array()).expect("students")[0];
    assert_eq!(
        student.get("parentName").and_then(|v| v.as_str()),
        Some("Sarah Parent")
    );

    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn naming_a_missing_parent_fails_without_writing() {
    let workspace = temp_dir("campusd-parent-missing");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let mut params = new_student_params("Ghost Child", "S103");
    params["parentId"] = json!("does-not-exist");
    let payload = json!({ "id": "2", "method": "students.create", "params": params });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");
    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("ok").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(
        value
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("not_found")
    );

    let students = request_ok(&mut stdin, &mut reader, "3", "students.list", json!({}));
    assert_eq!(
        students
            .get("students")
            .and_then(|v| v.as_array())
            .map(|a| a.len()),
        Some(3)
    );

    let _ = std::fs::remove_dir_all(workspace);
}
