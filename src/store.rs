//! Collaborator seams the engine talks through. The engine never reaches for a database or a
//! recognizer directly; callers hand it one of these.

use std::path::Path;

use crate::error::EngineResult;
use crate::model::{LectureRecord, RecognitionResult, RecordFilter, Student};

pub trait StudentDirectory {
    fn subject_exists(&self, subject_id: &str) -> EngineResult<bool>;

    fn class_exists(&self, class_id: &str) -> EngineResult<bool>;

    fn list_eligible_students(
        &self,
        subject_id: &str,
        class_id: Option<&str>,
    ) -> EngineResult<Vec<Student>>;
}

/// Face-recognition service. Implementations report every student they believe appears in
/// the footage; mapping onto the roster is the reconciler's job.
pub trait Recognizer {
    fn detect(
        &self,
        video: &Path,
        subject_id: &str,
        class_id: Option<&str>,
    ) -> EngineResult<RecognitionResult>;
}

pub type RecordId = String;

pub trait LectureStore {
    fn save(&mut self, record: &LectureRecord) -> EngineResult<RecordId>;

    fn load(&self, id: &str) -> EngineResult<LectureRecord>;

    /// Whole-record replacement; concurrent editors get last-writer-wins.
    fn replace(&mut self, id: &str, record: &LectureRecord) -> EngineResult<()>;

    /// Matching records, newest lecture date first.
    fn list(&self, filter: &RecordFilter) -> EngineResult<Vec<(RecordId, LectureRecord)>>;
}
