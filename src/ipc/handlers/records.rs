use crate::db::{self, Workspace};
use crate::edit::EditSession;
use crate::ipc::helpers::{
    get_mark_value, get_record_filter, get_required_str, require_db, respond, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::model::LectureContext;
use crate::store::LectureStore;
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

fn context_json(ctx: &LectureContext) -> serde_json::Value {
    json!({
        "subjectId": ctx.subject_id,
        "classId": ctx.class_id,
        "date": db::format_date(ctx.date),
        "timeStart": ctx.time_start.map(db::format_time),
        "timeEnd": ctx.time_end.map(db::format_time),
    })
}

fn edit_mut<'a>(
    edits: &'a mut HashMap<String, EditSession>,
    params: &serde_json::Value,
) -> Result<&'a mut EditSession, HandlerErr> {
    let edit_id = get_required_str(params, "editId")?;
    edits.get_mut(&edit_id).ok_or_else(|| HandlerErr {
        code: "not_found",
        message: "edit session not found".to_string(),
        details: Some(json!({ "editId": edit_id })),
    })
}

fn edit_json(edit: &EditSession) -> serde_json::Value {
    json!({
        "recordId": edit.record_id(),
        "context": context_json(edit.context()),
        "roster": edit.roster(),
        "present": edit.roster().present_count(),
        "total": edit.roster().len(),
        "changes": edit.diff(),
    })
}

fn records_list(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let conn = require_db(&state.db)?;
    let filter = get_record_filter(params)?;
    let ws = Workspace::new(conn);
    let rows = ws.list(&filter)?;

    let mut subject_names: HashMap<String, Option<String>> = HashMap::new();
    let mut records = Vec::with_capacity(rows.len());
    for (id, record) in rows {
        let subject_id = record.context.subject_id.clone();
        if !subject_names.contains_key(&subject_id) {
            let name = ws
                .subject_name(&subject_id)
                .map_err(|e| HandlerErr::db("db_query_failed", e))?;
            subject_names.insert(subject_id.clone(), name);
        }
        let mut row = context_json(&record.context);
        row["id"] = json!(id);
        row["subjectName"] = json!(subject_names.get(&subject_id).cloned().flatten());
        row["present"] = json!(record.present_count());
        row["total"] = json!(record.total());
        row["entries"] = json!(record.roster.entries());
        records.push(row);
    }
    Ok(json!({ "records": records }))
}

fn records_open(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let conn = require_db(&state.db)?;
    let record_id = get_required_str(params, "recordId")?;
    let edit = EditSession::open(&Workspace::new(conn), &record_id)?;
    let mut out = edit_json(&edit);
    let edit_id = Uuid::new_v4().to_string();
    state.edits.insert(edit_id.clone(), edit);
    log::info!("opened edit session {} for lecture {}", edit_id, record_id);
    out["editId"] = json!(edit_id);
    Ok(out)
}

fn records_set_mark(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    let value = get_mark_value(params, "status")?;
    let edit = edit_mut(&mut state.edits, params)?;
    edit.apply(&student_id, value)?;
    Ok(edit_json(edit))
}

fn records_diff(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let edit = edit_mut(&mut state.edits, params)?;
    Ok(json!({ "recordId": edit.record_id(), "changes": edit.diff() }))
}

fn records_commit_edit(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let conn = require_db(&state.db)?;
    let edit_id = get_required_str(params, "editId")?;
    let edit = edit_mut(&mut state.edits, params)?;
    let mut ws = Workspace::new(conn);
    let outcome = edit.commit_edit(&mut ws)?;
    state.edits.remove(&edit_id);
    Ok(json!(outcome))
}

fn records_discard(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let edit_id = get_required_str(params, "editId")?;
    let removed = state.edits.remove(&edit_id).is_some();
    Ok(json!({ "discarded": removed }))
}

type Handler = fn(&mut AppState, &serde_json::Value) -> Result<serde_json::Value, HandlerErr>;

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let handler: Handler = match req.method.as_str() {
        "records.list" => records_list,
        "records.open" => records_open,
        "records.setMark" => records_set_mark,
        "records.diff" => records_diff,
        "records.commitEdit" => records_commit_edit,
        "records.discard" => records_discard,
        _ => return None,
    };
    Some(respond(req, handler(state, &req.params)))
}
