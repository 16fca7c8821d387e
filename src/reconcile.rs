use serde::Serialize;

use crate::error::EngineResult;
use crate::model::{Mark, MarkValue, Provenance, RecognitionResult, Roster};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileSummary {
    /// Roster students the detector reported.
    pub detected_on_roster: usize,
    /// Detector ids with no roster entry, sorted.
    pub ignored: Vec<String>,
    pub present: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub roster: Roster,
    pub summary: ReconcileSummary,
}

/// Merges a recognition pass into `current`.
///
/// Detected students become `Present`/ai. A student an earlier pass marked (ai provenance)
/// but this pass misses is demoted to `Absent`/ai. Anything else keeps its mark, so manual
/// input is never clobbered by a miss.
pub fn reconcile(current: &Roster, result: &RecognitionResult) -> Reconciled {
    let mut roster = current.clone();
    let mut detected_on_roster = 0;
    for entry in roster.entries_mut() {
        let detected = result.detected.contains(&entry.student_id);
        match (detected, entry.mark.provenance) {
            (true, _) => {
                detected_on_roster += 1;
                entry.mark = Mark::ai(MarkValue::Present);
            }
            (false, Provenance::Ai) => entry.mark = Mark::ai(MarkValue::Absent),
            (false, Provenance::Manual) => {}
        }
    }

    let ignored: Vec<String> = result
        .detected
        .iter()
        .filter(|id| !current.contains(id))
        .cloned()
        .collect();
    if !ignored.is_empty() {
        log::warn!(
            "recognition reported {} students not on the {} roster: {:?}",
            ignored.len(),
            current.subject_id(),
            ignored
        );
    }
    if result.detected_count != 0 && result.detected_count != result.detected.len() {
        log::debug!(
            "detector count {} disagrees with {} reported ids",
            result.detected_count,
            result.detected.len()
        );
    }

    let summary = ReconcileSummary {
        detected_on_roster,
        ignored,
        present: roster.present_count(),
        total: roster.len(),
    };
    Reconciled { roster, summary }
}

/// Manual input wins unconditionally and stays until the next recognition pass.
pub fn set_manual(roster: &Roster, student_id: &str, value: MarkValue) -> EngineResult<Roster> {
    let mut next = roster.clone();
    next.entry_mut(student_id)?.mark = Mark::manual(value);
    Ok(next)
}

pub fn set_manual_all(roster: &Roster, value: MarkValue) -> Roster {
    let mut next = roster.clone();
    for entry in next.entries_mut() {
        entry.mark = Mark::manual(value);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::model::RosterEntry;

    fn math_roster() -> Roster {
        Roster::from_entries(
            "math",
            None,
            ["S1", "S2", "S3", "S4"].iter().enumerate().map(|(i, id)| RosterEntry {
                student_id: id.to_string(),
                name: id.to_string(),
                roll_number: format!("{:02}", i + 1),
                mark: Mark::default(),
            }),
        )
    }

    fn mark(r: &Roster, id: &str) -> Mark {
        r.mark_of(id).expect("student on roster")
    }

    #[test]
    fn first_pass_marks_detected_and_leaves_the_rest() {
        let r = reconcile(&math_roster(), &RecognitionResult::from_detected(["S1", "S3"]));
        assert_eq!(mark(&r.roster, "S1"), Mark::ai(MarkValue::Present));
        assert_eq!(mark(&r.roster, "S2"), Mark::manual(MarkValue::NotMarked));
        assert_eq!(mark(&r.roster, "S3"), Mark::ai(MarkValue::Present));
        assert_eq!(mark(&r.roster, "S4"), Mark::manual(MarkValue::NotMarked));
        assert_eq!(r.summary.detected_on_roster, 2);
        assert_eq!(r.summary.present, 2);
        assert_eq!(r.summary.total, 4);
    }

    #[test]
    fn second_pass_demotes_earlier_ai_marks() {
        let first = reconcile(&math_roster(), &RecognitionResult::from_detected(["S1", "S3"]));
        let second = reconcile(&first.roster, &RecognitionResult::from_detected(["S1"]));
        assert_eq!(mark(&second.roster, "S1"), Mark::ai(MarkValue::Present));
        assert_eq!(mark(&second.roster, "S3"), Mark::ai(MarkValue::Absent));
        assert_eq!(mark(&second.roster, "S2"), Mark::manual(MarkValue::NotMarked));
        assert_eq!(mark(&second.roster, "S4"), Mark::manual(MarkValue::NotMarked));
    }

    #[test]
    fn manual_mark_survives_a_pass_that_misses_the_student() {
        let first = reconcile(&math_roster(), &RecognitionResult::from_detected(["S1", "S3"]));
        let second = reconcile(&first.roster, &RecognitionResult::from_detected(["S1"]));
        let overridden = set_manual(&second.roster, "S2", MarkValue::Present).expect("override");
        let third = reconcile(&overridden, &RecognitionResult::from_detected(["S1", "S3"]));
        assert_eq!(mark(&third.roster, "S2"), Mark::manual(MarkValue::Present));
        assert_eq!(mark(&third.roster, "S3"), Mark::ai(MarkValue::Present));
    }

    #[test]
    fn reconcile_is_idempotent() {
        let results = [
            RecognitionResult::from_detected(["S1", "S3"]),
            RecognitionResult::from_detected(Vec::<String>::new()),
            RecognitionResult::from_detected(["S2", "S4", "ghost"]),
        ];
        let base = set_manual(&math_roster(), "S4", MarkValue::Absent).expect("override");
        let primed = reconcile(&base, &results[0]).roster;
        for start in [math_roster(), base, primed] {
            for res in &results {
                let once = reconcile(&start, res).roster;
                let twice = reconcile(&once, res).roster;
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn override_wins_regardless_of_recognition() {
        for res in [
            RecognitionResult::from_detected(["S1", "S2"]),
            RecognitionResult::from_detected(["S3"]),
        ] {
            for value in [MarkValue::Present, MarkValue::Absent, MarkValue::NotMarked] {
                let r = reconcile(&math_roster(), &res).roster;
                let o = set_manual(&r, "S2", value).expect("override");
                assert_eq!(mark(&o, "S2"), Mark::manual(value));
            }
        }
    }

    #[test]
    fn unknown_detected_ids_are_ignored_not_fatal() {
        let r = reconcile(
            &math_roster(),
            &RecognitionResult::from_detected(["S1", "X9", "A0"]),
        );
        assert_eq!(r.summary.ignored, vec!["A0".to_string(), "X9".to_string()]);
        assert_eq!(r.roster.len(), 4);
        assert!(!r.roster.contains("X9"));
    }

    #[test]
    fn set_manual_on_missing_student_errors() {
        assert_eq!(
            set_manual(&math_roster(), "nobody", MarkValue::Present),
            Err(EngineError::UnknownStudent("nobody".into()))
        );
    }

    #[test]
    fn set_all_stamps_every_entry_manual() {
        let r = reconcile(&math_roster(), &RecognitionResult::from_detected(["S1"])).roster;
        let all = set_manual_all(&r, MarkValue::Absent);
        assert!(all
            .entries()
            .iter()
            .all(|e| e.mark == Mark::manual(MarkValue::Absent)));
    }
}
