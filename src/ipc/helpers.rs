use chrono::{NaiveDate, NaiveTime};
use rusqlite::Connection;
use serde_json::json;

use crate::db;
use crate::error::EngineError;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::model::{MarkValue, RecordFilter};

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_params(message: impl Into<String>) -> Self {
        Self::new("bad_params", message)
    }

    pub fn db(code: &'static str, e: anyhow::Error) -> Self {
        Self::new(code, format!("{e:#}"))
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

impl From<EngineError> for HandlerErr {
    fn from(e: EngineError) -> Self {
        let details = match &e {
            EngineError::IncompleteContext(field) => Some(json!({ "field": field })),
            EngineError::UnknownStudent(id) => Some(json!({ "studentId": id })),
            EngineError::RecordNotFound(id) => Some(json!({ "recordId": id })),
            _ => None,
        };
        Self {
            code: e.code(),
            message: e.to_string(),
            details,
        }
    }
}

/// Runs `f` against the open workspace database, rendering the envelope either way.
pub fn with_db<F>(state: &mut AppState, req: &Request, f: F) -> serde_json::Value
where
    F: FnOnce(&Connection, &serde_json::Value) -> Result<serde_json::Value, HandlerErr>,
{
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match f(conn, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

pub fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    get_optional_str(params, key)?.ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

/// Missing, null and blank strings all read as `None`.
pub fn get_optional_str(
    params: &serde_json::Value,
    key: &str,
) -> Result<Option<String>, HandlerErr> {
    match params.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => {
            let t = s.trim();
            Ok((!t.is_empty()).then(|| t.to_string()))
        }
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(HandlerErr::bad_params(format!("{} must be a string", key))),
    }
}

pub fn get_optional_date(
    params: &serde_json::Value,
    key: &str,
) -> Result<Option<NaiveDate>, HandlerErr> {
    get_optional_str(params, key)?
        .map(|raw| db::parse_date(&raw).map_err(|e| HandlerErr::bad_params(format!("{e:#}"))))
        .transpose()
}

pub fn get_optional_time(
    params: &serde_json::Value,
    key: &str,
) -> Result<Option<NaiveTime>, HandlerErr> {
    get_optional_str(params, key)?
        .map(|raw| db::parse_time(&raw).map_err(|e| HandlerErr::bad_params(format!("{e:#}"))))
        .transpose()
}

pub fn get_mark_value(params: &serde_json::Value, key: &str) -> Result<MarkValue, HandlerErr> {
    let raw = params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))?;
    MarkValue::parse(raw).ok_or_else(|| {
        HandlerErr::bad_params(format!(
            "{} must be Present, Absent or Not Marked, got {:?}",
            key, raw
        ))
    })
}

pub fn get_string_list(params: &serde_json::Value, key: &str) -> Result<Vec<String>, HandlerErr> {
    let Some(v) = params.get(key) else {
        return Ok(Vec::new());
    };
    if v.is_null() {
        return Ok(Vec::new());
    }
    let Some(items) = v.as_array() else {
        return Err(HandlerErr::bad_params(format!("{} must be an array", key)));
    };
    items
        .iter()
        .map(|item| match item {
            serde_json::Value::String(s) => Ok(s.clone()),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            _ => Err(HandlerErr::bad_params(format!(
                "{} entries must be strings",
                key
            ))),
        })
        .collect()
}

pub fn get_record_filter(params: &serde_json::Value) -> Result<RecordFilter, HandlerErr> {
    Ok(RecordFilter {
        subject_id: get_optional_str(params, "subjectId")?,
        class_id: get_optional_str(params, "classId")?,
        date_from: get_optional_date(params, "dateFrom")?,
        date_to: get_optional_date(params, "dateTo")?,
    })
}

pub fn require_db(db: &Option<Connection>) -> Result<&Connection, HandlerErr> {
    db.as_ref()
        .ok_or_else(|| HandlerErr::new("no_workspace", "select a workspace first"))
}

pub fn respond(req: &Request, result: Result<serde_json::Value, HandlerErr>) -> serde_json::Value {
    match result {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    }
}
