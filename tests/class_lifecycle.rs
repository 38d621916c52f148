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
    let exe = env!("CARGO_BIN_EXE_seatmapd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn seatmapd");
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
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn request_err_code(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> String {
    let value = request(stdin, reader, id, method, params);
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(false),
        "{} unexpectedly succeeded: {}",
        method,
        value
    );
    value
        .pointer("/error/code")
        .and_then(|v| v.as_str())
        .expect("error code")
        .to_string()
}

#[test]
fn class_create_select_delete_and_last_class_guard() {
    let workspace = temp_dir("seatmap-class-lifecycle");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let list = request_ok(&mut stdin, &mut reader, "2", "classes.list", json!({}));
    assert_eq!(list.get("current").and_then(|v| v.as_str()), Some("Turma 1"));
    let rows = list.get("classes").and_then(|v| v.as_array()).expect("classes");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("studentCount").and_then(|v| v.as_i64()), Some(2));

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "classes.create",
        json!({ "name": "Turma 2" }),
    );
    assert_eq!(created.get("current").and_then(|v| v.as_str()), Some("Turma 2"));

    let dup = request_err_code(
        &mut stdin,
        &mut reader,
        "4",
        "classes.create",
        json!({ "name": "Turma 2" }),
    );
    assert_eq!(dup, "already_exists");

    let empty = request_err_code(
        &mut stdin,
        &mut reader,
        "5",
        "classes.create",
        json!({ "name": "   " }),
    );
    assert_eq!(empty, "bad_params");

    let selected = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "classes.select",
        json!({ "name": "Turma 1" }),
    );
    assert_eq!(selected.get("current").and_then(|v| v.as_str()), Some("Turma 1"));

    let deleted = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "classes.delete",
        json!({ "name": "Turma 2" }),
    );
    assert_eq!(deleted.get("current").and_then(|v| v.as_str()), Some("Turma 1"));

    // The only remaining class cannot be deleted; the set is unchanged.
    let last = request_err_code(&mut stdin, &mut reader, "8", "classes.delete", json!({}));
    assert_eq!(last, "last_class");

    let list2 = request_ok(&mut stdin, &mut reader, "9", "classes.list", json!({}));
    let rows2 = list2.get("classes").and_then(|v| v.as_array()).expect("classes");
    assert_eq!(rows2.len(), 1);
    assert_eq!(list2.get("current").and_then(|v| v.as_str()), Some("Turma 1"));

    let reset = request_ok(&mut stdin, &mut reader, "10", "classes.reset", json!({}));
    assert_eq!(reset.get("studentCount").and_then(|v| v.as_i64()), Some(0));
    let roster = request_ok(&mut stdin, &mut reader, "11", "roster.get", json!({}));
    assert_eq!(
        roster.get("students").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(0)
    );
}

#[test]
fn deleting_current_class_falls_back_to_first_remaining() {
    let workspace = temp_dir("seatmap-class-fallback");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "classes.create",
        json!({ "name": "Turma B" }),
    );

    // Deleting with no name targets the current class.
    let deleted = request_ok(&mut stdin, &mut reader, "3", "classes.delete", json!({}));
    assert_eq!(deleted.get("deleted").and_then(|v| v.as_str()), Some("Turma B"));
    assert_eq!(deleted.get("current").and_then(|v| v.as_str()), Some("Turma 1"));
}

#[test]
fn methods_require_a_workspace() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let code = request_err_code(&mut stdin, &mut reader, "1", "classes.list", json!({}));
    assert_eq!(code, "no_workspace");
    let code = request_err_code(
        &mut stdin,
        &mut reader,
        "2",
        "chart.click",
        json!({ "row": 1, "column": 1, "pointIndex": 0 }),
    );
    assert_eq!(code, "no_workspace");
}

#[test]
fn unknown_method_is_reported() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let code = request_err_code(&mut stdin, &mut reader, "1", "classes.rename", json!({}));
    assert_eq!(code, "not_implemented");
}
