use serde::Serialize;

use crate::error::EngineResult;
use crate::model::{LectureContext, LectureDraft, LectureRecord, Mark, MarkValue, Roster};
use crate::reconcile::set_manual;
use crate::store::{LectureStore, RecordId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkChange {
    pub student_id: String,
    pub before: Mark,
    pub after: Mark,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditOutcome {
    pub record_id: RecordId,
    pub changes: Vec<MarkChange>,
}

/// Correction workflow for one persisted lecture. Commits replace the whole record.
#[derive(Debug, Clone)]
pub struct EditSession {
    record_id: RecordId,
    original: LectureRecord,
    roster: Roster,
}

impl EditSession {
    pub fn open(store: &dyn LectureStore, record_id: &str) -> EngineResult<Self> {
        let original = store.load(record_id)?;
        Ok(Self {
            record_id: record_id.to_string(),
            roster: original.roster.clone(),
            original,
        })
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn context(&self) -> &LectureContext {
        &self.original.context
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn apply(&mut self, student_id: &str, value: MarkValue) -> EngineResult<()> {
        self.roster = set_manual(&self.roster, student_id, value)?;
        Ok(())
    }

    /// Entries whose mark differs from the record as opened, in roster order.
    pub fn diff(&self) -> Vec<MarkChange> {
        self.roster
            .entries()
            .iter()
            .filter_map(|e| {
                let before = self.original.roster.mark_of(&e.student_id)?;
                (before != e.mark).then(|| MarkChange {
                    student_id: e.student_id.clone(),
                    before,
                    after: e.mark,
                })
            })
            .collect()
    }

    pub fn commit_edit(&self, store: &mut dyn LectureStore) -> EngineResult<EditOutcome> {
        let context = LectureDraft::from(&self.original.context).validate()?;
        let changes = self.diff();
        let record = LectureRecord {
            context,
            roster: self.roster.clone(),
        };
        store.replace(&self.record_id, &record)?;
        log::info!(
            "replaced lecture {} ({} marks changed)",
            self.record_id,
            changes.len()
        );
        Ok(EditOutcome {
            record_id: self.record_id.clone(),
            changes,
        })
    }
}
