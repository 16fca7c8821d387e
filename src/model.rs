use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub roll_number: String,
    pub class_id: Option<String>,
    pub subject_ids: BTreeSet<String>,
    pub has_encoding: bool,
}

impl Student {
    pub fn is_eligible(&self, subject_id: &str, class_id: Option<&str>) -> bool {
        if !self.subject_ids.contains(subject_id) {
            return false;
        }
        match class_id {
            None => true,
            Some(c) => self.class_id.as_deref() == Some(c),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkValue {
    Present,
    Absent,
    #[serde(rename = "Not Marked")]
    NotMarked,
}

impl MarkValue {
    pub fn as_str(self) -> &'static str {
        match self {
            MarkValue::Present => "Present",
            MarkValue::Absent => "Absent",
            MarkValue::NotMarked => "Not Marked",
        }
    }

    /// Accepts the stored spelling plus the compact forms the marking views send.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Present" | "present" | "P" => Some(MarkValue::Present),
            "Absent" | "absent" | "A" => Some(MarkValue::Absent),
            "Not Marked" | "NotMarked" | "not_marked" | "" => Some(MarkValue::NotMarked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    Manual,
    Ai,
}

impl Provenance {
    pub fn is_ai(self) -> bool {
        matches!(self, Provenance::Ai)
    }

    pub fn from_ai_flag(marked_by_ai: bool) -> Self {
        if marked_by_ai {
            Provenance::Ai
        } else {
            Provenance::Manual
        }
    }
}

/// Provenance travels as the `markedByAi` boolean the views already render badges from.
mod provenance_flag {
    use super::Provenance;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(p: &Provenance, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_bool(p.is_ai())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Provenance, D::Error> {
        Ok(Provenance::from_ai_flag(bool::deserialize(d)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
    #[serde(rename = "status")]
    pub value: MarkValue,
    #[serde(rename = "markedByAi", with = "provenance_flag")]
    pub provenance: Provenance,
}

impl Mark {
    pub const fn manual(value: MarkValue) -> Self {
        Self {
            value,
            provenance: Provenance::Manual,
        }
    }

    pub const fn ai(value: MarkValue) -> Self {
        Self {
            value,
            provenance: Provenance::Ai,
        }
    }

    pub fn is_present(&self) -> bool {
        self.value == MarkValue::Present
    }
}

impl Default for Mark {
    fn default() -> Self {
        Mark::manual(MarkValue::NotMarked)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub student_id: String,
    pub name: String,
    pub roll_number: String,
    #[serde(flatten)]
    pub mark: Mark,
}

/// Per-lecture attendance state. Entries are kept in roll-number order and each student
/// appears at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    subject_id: String,
    class_id: Option<String>,
    entries: Vec<RosterEntry>,
}

impl Roster {
    /// Builds a roster from arbitrary entries, sorting by roll number and dropping repeated
    /// student ids (first occurrence wins).
    pub fn from_entries(
        subject_id: impl Into<String>,
        class_id: Option<String>,
        entries: impl IntoIterator<Item = RosterEntry>,
    ) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        let mut entries: Vec<RosterEntry> = entries
            .into_iter()
            .filter(|e| seen.insert(e.student_id.clone()))
            .collect();
        entries.sort_by(|a, b| {
            a.roll_number
                .cmp(&b.roll_number)
                .then_with(|| a.student_id.cmp(&b.student_id))
        });
        Self {
            subject_id: subject_id.into(),
            class_id,
            entries,
        }
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn class_id(&self) -> Option<&str> {
        self.class_id.as_deref()
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, student_id: &str) -> Option<&RosterEntry> {
        self.entries.iter().find(|e| e.student_id == student_id)
    }

    pub fn mark_of(&self, student_id: &str) -> Option<Mark> {
        self.get(student_id).map(|e| e.mark)
    }

    pub fn contains(&self, student_id: &str) -> bool {
        self.get(student_id).is_some()
    }

    pub fn present_count(&self) -> usize {
        self.entries.iter().filter(|e| e.mark.is_present()).count()
    }

    pub fn same_scope(&self, other: &Roster) -> bool {
        self.subject_id == other.subject_id && self.class_id == other.class_id
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [RosterEntry] {
        &mut self.entries
    }

    pub(crate) fn entry_mut(&mut self, student_id: &str) -> EngineResult<&mut RosterEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.student_id == student_id)
            .ok_or_else(|| EngineError::UnknownStudent(student_id.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureContext {
    pub subject_id: String,
    pub class_id: Option<String>,
    pub date: NaiveDate,
    pub time_start: Option<NaiveTime>,
    pub time_end: Option<NaiveTime>,
}

/// Context fields as collected from the marking form; validated into a [`LectureContext`]
/// at commit time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LectureDraft {
    pub subject_id: Option<String>,
    pub class_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub time_start: Option<NaiveTime>,
    pub time_end: Option<NaiveTime>,
}

impl LectureDraft {
    pub fn validate(&self) -> EngineResult<LectureContext> {
        let subject_id = match self.subject_id.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => return Err(EngineError::EmptySelection),
        };
        let date = self.date.ok_or(EngineError::IncompleteContext("date"))?;
        Ok(LectureContext {
            subject_id,
            class_id: self.class_id.clone().filter(|c| !c.trim().is_empty()),
            date,
            time_start: self.time_start,
            time_end: self.time_end,
        })
    }
}

impl From<&LectureContext> for LectureDraft {
    fn from(ctx: &LectureContext) -> Self {
        Self {
            subject_id: Some(ctx.subject_id.clone()),
            class_id: ctx.class_id.clone(),
            date: Some(ctx.date),
            time_start: ctx.time_start,
            time_end: ctx.time_end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureRecord {
    pub context: LectureContext,
    pub roster: Roster,
}

impl LectureRecord {
    pub fn present_count(&self) -> usize {
        self.roster.present_count()
    }

    pub fn total(&self) -> usize {
        self.roster.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    pub detected: BTreeSet<String>,
    /// Detector-reported counts; informational only.
    #[serde(default)]
    pub total_students: usize,
    #[serde(default)]
    pub detected_count: usize,
}

impl RecognitionResult {
    pub fn from_detected<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let detected: BTreeSet<String> = ids.into_iter().map(Into::into).collect();
        let detected_count = detected.len();
        Self {
            detected,
            total_students: 0,
            detected_count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub subject_id: Option<String>,
    pub class_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl RecordFilter {
    pub fn matches(&self, ctx: &LectureContext) -> bool {
        if let Some(s) = &self.subject_id {
            if &ctx.subject_id != s {
                return false;
            }
        }
        if let Some(c) = &self.class_id {
            if ctx.class_id.as_ref() != Some(c) {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if ctx.date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if ctx.date > to {
                return false;
            }
        }
        true
    }
}
