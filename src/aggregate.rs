use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::model::LectureRecord;

pub const LOW_ATTENDANCE_THRESHOLD: u32 = 75;

/// `round(100 * present / total)` with halves rounding up; 0 when there is nothing to count.
pub fn percentage(present: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let p = present as u64;
    let t = total as u64;
    ((200 * p + t) / (2 * t)) as u32
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectStatistic {
    pub subject_id: String,
    pub total_lectures: usize,
    pub total_present: usize,
    pub total_records: usize,
    pub attendance_percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStatistic {
    pub student_id: String,
    pub subject_id: String,
    pub present: usize,
    pub total: usize,
    pub attendance_percentage: u32,
    pub low: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceReport {
    pub total_lectures: usize,
    pub threshold: u32,
    pub subject_stats: Vec<SubjectStatistic>,
    pub student_stats: Vec<StudentStatistic>,
    pub low_attendance: Vec<StudentStatistic>,
}

#[derive(Default)]
struct Tally {
    lectures: usize,
    present: usize,
    total: usize,
}

#[cfg(test)]
pub fn aggregate(records: &[LectureRecord]) -> AttendanceReport {
    aggregate_with_threshold(records, LOW_ATTENDANCE_THRESHOLD)
}

/// Subject and student statistics over a set of lecture records. Accumulation is keyed on
/// ordered maps, so the result does not depend on record order.
pub fn aggregate_with_threshold(records: &[LectureRecord], threshold: u32) -> AttendanceReport {
    let mut by_subject: BTreeMap<&str, Tally> = BTreeMap::new();
    let mut by_pair: BTreeMap<(&str, &str), Tally> = BTreeMap::new();

    for record in records {
        let subject = record.context.subject_id.as_str();
        let t = by_subject.entry(subject).or_default();
        t.lectures += 1;
        t.present += record.present_count();
        t.total += record.total();

        for entry in record.roster.entries() {
            let pair = by_pair
                .entry((subject, entry.student_id.as_str()))
                .or_default();
            pair.total += 1;
            if entry.mark.is_present() {
                pair.present += 1;
            }
        }
    }

    let subject_stats: Vec<SubjectStatistic> = by_subject
        .into_iter()
        .map(|(subject, t)| SubjectStatistic {
            subject_id: subject.to_string(),
            total_lectures: t.lectures,
            total_present: t.present,
            total_records: t.total,
            attendance_percentage: percentage(t.present, t.total),
        })
        .collect();

    let student_stats: Vec<StudentStatistic> = by_pair
        .into_iter()
        .map(|((subject, student), t)| {
            let pct = percentage(t.present, t.total);
            StudentStatistic {
                student_id: student.to_string(),
                subject_id: subject.to_string(),
                present: t.present,
                total: t.total,
                attendance_percentage: pct,
                low: t.total > 0 && pct < threshold,
            }
        })
        .collect();

    let mut low_attendance: Vec<StudentStatistic> =
        student_stats.iter().filter(|s| s.low).cloned().collect();
    // Stable sort over (subject, student)-ordered input keeps ties deterministic.
    low_attendance.sort_by_key(|s| s.attendance_percentage);

    AttendanceReport {
        total_lectures: records.len(),
        threshold,
        subject_stats,
        student_stats,
        low_attendance,
    }
}

/// Subjects that appear in the report; used to resolve display names in one pass.
pub fn subjects_in(report: &AttendanceReport) -> BTreeSet<&str> {
    report
        .subject_stats
        .iter()
        .map(|s| s.subject_id.as_str())
        .collect()
}
