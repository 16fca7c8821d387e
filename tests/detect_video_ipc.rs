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

fn spawn_sidecar(envs: &[(&str, String)]) -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_attendanced");
    let mut child = Command::new(exe)
        .envs(envs.iter().map(|(k, v)| (*k, v.as_str())))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn attendanced");
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
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown error")
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn error_code(value: &serde_json::Value) -> &str {
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
}


fn setup_roster(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    workspace: &std::path::Path,
) -> (String, String, String) {
    request_ok(
        stdin,
        reader,
        "ws",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let subject = request_ok(stdin, reader, "subj", "subjects.create", json!({ "name": "Physics" }))
        ["subjectId"]
        .as_str()
        .expect("subjectId")
        .to_string();
    let asha = request_ok(
        stdin,
        reader,
        "asha",
        "students.create",
        json!({ "name": "Asha", "rollNumber": "01", "subjectIds": [subject], "hasEncoding": true }),
    )["studentId"]
        .as_str()
        .expect("studentId")
        .to_string();
    let opened = request_ok(
        stdin,
        reader,
        "open",
        "marking.open",
        json!({ "subjectId": subject }),
    );
    let session_id = opened["sessionId"].as_str().expect("sessionId").to_string();
    (subject, asha, session_id)
}

#[cfg(unix)]
#[test]
fn detect_video_runs_the_configured_recognizer() {
    let workspace = temp_dir("attendanced-detect-video");
    let video = workspace.join("lecture.mp4");
    std::fs::write(&video, b"not really a video").expect("write video");
    let script = workspace.join("detector.sh");
    let ids_file = workspace.join("detected.json");
    std::fs::write(
        &script,
        format!("#!/bin/sh\ncat '{}'\n", ids_file.to_string_lossy()),
    )
    .expect("write detector script");

    let (_child, mut stdin, mut reader) = spawn_sidecar(&[
        ("ATTENDANCED_RECOGNIZER", "/bin/sh".to_string()),
        (
            "ATTENDANCED_RECOGNIZER_ARGS",
            script.to_string_lossy().to_string(),
        ),
    ]);
    let health = request_ok(&mut stdin, &mut reader, "h", "health", json!({}));
    assert_eq!(health["recognizerConfigured"], true);

    let (_subject, asha, session_id) = setup_roster(&mut stdin, &mut reader, &workspace);
    std::fs::write(
        &ids_file,
        json!({ "detected": [asha, "stranger"], "totalStudents": 1, "detectedCount": 2 })
            .to_string(),
    )
    .expect("write detector output");

    let detected = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "marking.detectVideo",
        json!({ "sessionId": session_id, "videoPath": video.to_string_lossy() }),
    );
    assert_eq!(detected["present"], 1);
    assert_eq!(detected["summary"]["detectedOnRoster"], 1);
    assert_eq!(detected["summary"]["ignored"], json!(["stranger"]));
    let entry = &detected["roster"]["entries"][0];
    assert_eq!(entry["status"], "Present");
    assert_eq!(entry["markedByAi"], true);

    // Unreadable output fails the pass and leaves the session as it was.
    std::fs::write(&ids_file, "Traceback (most recent call last):").expect("write garbage");
    let failed = request(
        &mut stdin,
        &mut reader,
        "2",
        "marking.detectVideo",
        json!({ "sessionId": session_id, "videoPath": video.to_string_lossy() }),
    );
    assert_eq!(error_code(&failed), "processing_failed");
    let snapshot = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "marking.snapshot",
        json!({ "sessionId": session_id }),
    );
    assert_eq!(snapshot["roster"]["entries"][0]["status"], "Present");

    let missing_video = request(
        &mut stdin,
        &mut reader,
        "4",
        "marking.detectVideo",
        json!({ "sessionId": session_id, "videoPath": workspace.join("nope.mp4").to_string_lossy() }),
    );
    assert_eq!(error_code(&missing_video), "processing_failed");

    // A bare id list from a detector keyed on integers also works; nobody matches here.
    std::fs::write(&ids_file, "[101, 102]").expect("write ids");
    let second = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "marking.detectVideo",
        json!({ "sessionId": session_id, "videoPath": video.to_string_lossy() }),
    );
    assert_eq!(second["roster"]["entries"][0]["status"], "Absent");
    assert_eq!(second["summary"]["ignored"], json!(["101", "102"]));
}

#[test]
fn detect_video_without_recognizer_fails() {
    let workspace = temp_dir("attendanced-detect-none");
    let video = workspace.join("lecture.mp4");
    std::fs::write(&video, b"frames").expect("write video");

    let (_child, mut stdin, mut reader) = spawn_sidecar(&[]);
    let health = request_ok(&mut stdin, &mut reader, "h", "health", json!({}));
    assert_eq!(health["recognizerConfigured"], false);

    let (_subject, _asha, session_id) = setup_roster(&mut stdin, &mut reader, &workspace);
    let failed = request(
        &mut stdin,
        &mut reader,
        "1",
        "marking.detectVideo",
        json!({ "sessionId": session_id, "videoPath": video.to_string_lossy() }),
    );
    assert_eq!(error_code(&failed), "processing_failed");
}
