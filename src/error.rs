use thiserror::Error;

/// Failures surfaced by the attendance engine. Every variant is recoverable by the caller;
/// the IPC layer renders them as form guidance rather than aborting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Subject or class reference does not exist; the user must reselect.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),
    /// Commit attempted before a subject was chosen.
    #[error("no subject selected")]
    EmptySelection,
    /// Commit attempted with required context fields missing.
    #[error("incomplete lecture context: missing {0}")]
    IncompleteContext(&'static str),
    /// Recognition service failed; the roster is left unchanged.
    #[error("recognition failed: {0}")]
    ProcessingFailed(String),
    /// Record store unavailable or rejected the write.
    #[error("persistence failed: {0}")]
    PersistenceFailed(String),
    /// Manual mark addressed to a student that is not on the roster.
    #[error("student not on roster: {0}")]
    UnknownStudent(String),
    #[error("lecture record not found: {0}")]
    RecordNotFound(String),
}

impl EngineError {
    /// Stable code used in IPC error envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InvalidSelection(_) => "invalid_selection",
            EngineError::EmptySelection => "empty_selection",
            EngineError::IncompleteContext(_) => "incomplete_context",
            EngineError::ProcessingFailed(_) => "processing_failed",
            EngineError::PersistenceFailed(_) => "persistence_failed",
            EngineError::UnknownStudent(_) | EngineError::RecordNotFound(_) => "not_found",
        }
    }

    pub fn persistence(err: impl std::fmt::Display) -> Self {
        EngineError::PersistenceFailed(err.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
