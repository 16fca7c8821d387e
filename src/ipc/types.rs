use std::collections::HashMap;
use std::path::PathBuf;

use rusqlite::Connection;
use serde::Deserialize;

use crate::config::DaemonConfig;
use crate::edit::EditSession;
use crate::session::MarkingSession;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub db: Option<Connection>,
    pub config: DaemonConfig,
    /// Live-marking sessions keyed by session id.
    pub marking: HashMap<String, MarkingSession>,
    /// Record edit sessions keyed by edit id.
    pub edits: HashMap<String, EditSession>,
}

impl AppState {
    pub fn new(config: DaemonConfig) -> Self {
        Self {
            workspace: None,
            db: None,
            config,
            marking: HashMap::new(),
            edits: HashMap::new(),
        }
    }
}
