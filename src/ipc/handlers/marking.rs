use crate::db::Workspace;
use crate::error::EngineError;
use crate::ipc::helpers::{
    get_mark_value, get_optional_date, get_optional_str, get_optional_time, get_required_str,
    get_string_list, require_db, respond, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{LectureDraft, RecognitionResult, Roster};
use crate::reconcile::reconcile;
use crate::roster::build_roster;
use crate::session::MarkingSession;
use serde_json::json;
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

fn roster_json(roster: &Roster) -> serde_json::Value {
    json!({
        "roster": roster,
        "present": roster.present_count(),
        "total": roster.len(),
    })
}

fn session_mut<'a>(
    sessions: &'a mut HashMap<String, MarkingSession>,
    params: &serde_json::Value,
) -> Result<&'a mut MarkingSession, HandlerErr> {
    let session_id = get_required_str(params, "sessionId")?;
    sessions.get_mut(&session_id).ok_or_else(|| HandlerErr {
        code: "not_found",
        message: "marking session not found".to_string(),
        details: Some(json!({ "sessionId": session_id })),
    })
}

fn marking_open(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let conn = require_db(&state.db)?;
    let subject_id = get_optional_str(params, "subjectId")?
        .ok_or_else(|| HandlerErr::from(EngineError::EmptySelection))?;
    let class_id = get_optional_str(params, "classId")?;
    let roster = build_roster(&Workspace::new(conn), &subject_id, class_id.as_deref())?;

    let mut out = roster_json(&roster);
    let mut session = MarkingSession::new();
    session.initialize(roster);
    let session_id = Uuid::new_v4().to_string();
    state.marking.insert(session_id.clone(), session);
    log::info!("opened marking session {} for subject {}", session_id, subject_id);
    out["sessionId"] = json!(session_id);
    Ok(out)
}

fn marking_apply_recognition(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let session = session_mut(&mut state.marking, params)?;
    let mut result = RecognitionResult::from_detected(get_string_list(params, "detected")?);
    if let Some(n) = params.get("totalStudents").and_then(|v| v.as_u64()) {
        result.total_students = n as usize;
    }
    if let Some(n) = params.get("detectedCount").and_then(|v| v.as_u64()) {
        result.detected_count = n as usize;
    }
    let reconciled = reconcile(&session.snapshot()?, &result);
    let summary = session.apply(reconciled)?;
    let mut out = roster_json(&session.snapshot()?);
    out["summary"] = json!(summary);
    Ok(out)
}

fn marking_detect_video(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let video = PathBuf::from(get_required_str(params, "videoPath")?);
    let recognizer = state.config.recognizer().ok_or_else(|| {
        HandlerErr::from(EngineError::ProcessingFailed(
            "no recognizer configured".to_string(),
        ))
    })?;
    let session = session_mut(&mut state.marking, params)?;
    let summary = session.detect_and_apply(&recognizer, &video)?;
    let mut out = roster_json(&session.snapshot()?);
    out["summary"] = json!(summary);
    Ok(out)
}

fn marking_set_mark(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    let value = get_mark_value(params, "status")?;
    let session = session_mut(&mut state.marking, params)?;
    session.override_mark(&student_id, value)?;
    Ok(roster_json(&session.snapshot()?))
}

fn marking_set_all(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let value = get_mark_value(params, "status")?;
    let session = session_mut(&mut state.marking, params)?;
    session.override_all(value)?;
    Ok(roster_json(&session.snapshot()?))
}

fn marking_snapshot(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let session = session_mut(&mut state.marking, params)?;
    Ok(roster_json(&session.snapshot()?))
}

fn marking_commit(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let conn = require_db(&state.db)?;
    let session_id = get_required_str(params, "sessionId")?;
    let draft = LectureDraft {
        subject_id: get_optional_str(params, "subjectId")?,
        class_id: get_optional_str(params, "classId")?,
        date: get_optional_date(params, "date")?,
        time_start: get_optional_time(params, "timeStart")?,
        time_end: get_optional_time(params, "timeEnd")?,
    };
    let session = session_mut(&mut state.marking, params)?;
    let mut ws = Workspace::new(conn);
    let (record_id, record) = session.commit_to(&mut ws, &draft)?;
    state.marking.remove(&session_id);
    Ok(json!({
        "recordId": record_id,
        "present": record.present_count(),
        "total": record.total(),
    }))
}

fn marking_discard(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let session_id = get_required_str(params, "sessionId")?;
    let removed = state.marking.remove(&session_id).is_some();
    Ok(json!({ "discarded": removed }))
}

type Handler = fn(&mut AppState, &serde_json::Value) -> Result<serde_json::Value, HandlerErr>;

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let handler: Handler = match req.method.as_str() {
        "marking.open" => marking_open,
        "marking.applyRecognition" => marking_apply_recognition,
        "marking.detectVideo" => marking_detect_video,
        "marking.setMark" => marking_set_mark,
        "marking.setAll" => marking_set_all,
        "marking.snapshot" => marking_snapshot,
        "marking.commit" => marking_commit,
        "marking.discard" => marking_discard,
        _ => return None,
    };
    Some(respond(req, handler(state, &req.params)))
}
