use crate::error::{EngineError, EngineResult};
use crate::model::{Mark, Roster, RosterEntry};
use crate::store::StudentDirectory;

/// Initial attendance state for a lecture: one `NotMarked`/manual entry per eligible
/// student, in roll-number order.
pub fn build_roster(
    directory: &dyn StudentDirectory,
    subject_id: &str,
    class_id: Option<&str>,
) -> EngineResult<Roster> {
    let subject_id = subject_id.trim();
    if subject_id.is_empty() || !directory.subject_exists(subject_id)? {
        return Err(EngineError::InvalidSelection(format!(
            "unknown subject: {}",
            subject_id
        )));
    }
    let class_id = class_id.map(str::trim).filter(|c| !c.is_empty());
    if let Some(c) = class_id {
        if !directory.class_exists(c)? {
            return Err(EngineError::InvalidSelection(format!("unknown class: {}", c)));
        }
    }

    let students = directory.list_eligible_students(subject_id, class_id)?;
    let fetched = students.len();
    let entries: Vec<RosterEntry> = students
        .into_iter()
        .filter(|s| s.is_eligible(subject_id, class_id))
        .map(|s| RosterEntry {
            student_id: s.id,
            name: s.name,
            roll_number: s.roll_number,
            mark: Mark::default(),
        })
        .collect();
    if entries.len() != fetched {
        log::warn!(
            "directory returned {} ineligible students for subject {}",
            fetched - entries.len(),
            subject_id
        );
    }

    let roster = Roster::from_entries(subject_id, class_id.map(str::to_string), entries);
    if roster.is_empty() {
        log::info!("no students enrolled for subject {} class {:?}", subject_id, class_id);
    }
    log::debug!(
        "built roster for subject {} class {:?}: {} students",
        subject_id,
        class_id,
        roster.len()
    );
    Ok(roster)
}
