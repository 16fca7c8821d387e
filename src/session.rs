use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::model::{LectureDraft, LectureRecord, MarkValue, Roster};
use crate::reconcile::{reconcile, set_manual, set_manual_all, Reconciled, ReconcileSummary};
use crate::store::{LectureStore, Recognizer, RecordId};

/// Live-marking state for one lecture. Owned by a single marking session and never shared.
#[derive(Debug, Clone, Default)]
pub struct MarkingSession {
    roster: Option<Roster>,
}

impl MarkingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initialize(&mut self, roster: Roster) {
        self.roster = Some(roster);
    }

    fn current(&self) -> EngineResult<&Roster> {
        self.roster.as_ref().ok_or(EngineError::EmptySelection)
    }

    /// Installs reconciler output. The output must come from this session's scope.
    pub fn apply(&mut self, reconciled: Reconciled) -> EngineResult<ReconcileSummary> {
        let current = self.current()?;
        if !current.same_scope(&reconciled.roster) {
            return Err(EngineError::InvalidSelection(format!(
                "roster for subject {} does not match session subject {}",
                reconciled.roster.subject_id(),
                current.subject_id()
            )));
        }
        self.roster = Some(reconciled.roster);
        Ok(reconciled.summary)
    }

    /// Runs the recognizer and reconciles its result. The session is untouched unless the
    /// call returns successfully.
    pub fn detect_and_apply(
        &mut self,
        recognizer: &dyn Recognizer,
        video: &Path,
    ) -> EngineResult<ReconcileSummary> {
        let current = self.current()?;
        let result = recognizer.detect(video, current.subject_id(), current.class_id())?;
        let reconciled = reconcile(current, &result);
        self.apply(reconciled)
    }

    pub fn override_mark(&mut self, student_id: &str, value: MarkValue) -> EngineResult<()> {
        let next = set_manual(self.current()?, student_id, value)?;
        self.roster = Some(next);
        Ok(())
    }

    pub fn override_all(&mut self, value: MarkValue) -> EngineResult<()> {
        let next = set_manual_all(self.current()?, value);
        self.roster = Some(next);
        Ok(())
    }

    pub fn snapshot(&self) -> EngineResult<Roster> {
        self.current().cloned()
    }

    pub fn commit(&self, draft: &LectureDraft) -> EngineResult<LectureRecord> {
        let roster = self.current()?;
        let context = draft.validate()?;
        if context.subject_id != roster.subject_id()
            || context.class_id.as_deref() != roster.class_id()
        {
            return Err(EngineError::InvalidSelection(
                "lecture context does not match the marked roster".to_string(),
            ));
        }
        Ok(LectureRecord {
            context,
            roster: roster.clone(),
        })
    }

    /// Commits and hands the record to the store. A failed save leaves the session intact so
    /// the caller can retry.
    pub fn commit_to(
        &self,
        store: &mut dyn LectureStore,
        draft: &LectureDraft,
    ) -> EngineResult<(RecordId, LectureRecord)> {
        let record = self.commit(draft)?;
        let id = store.save(&record)?;
        log::info!(
            "saved lecture {} for subject {} on {} ({}/{} present)",
            id,
            record.context.subject_id,
            record.context.date,
            record.present_count(),
            record.total()
        );
        Ok((id, record))
    }
}
