use anyhow::{anyhow, Context};
use chrono::{NaiveDate, NaiveTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use std::collections::BTreeSet;
use std::path::Path;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::model::{
    LectureContext, LectureRecord, Mark, MarkValue, Provenance, RecordFilter, Roster, RosterEntry,
    Student,
};
use crate::store::{LectureStore, RecordId, StudentDirectory};

pub const DB_FILE: &str = "attendance.sqlite3";

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)
        .with_context(|| format!("failed to create workspace {}", workspace.display()))?;
    let db_path = workspace.join(DB_FILE);
    let conn = Connection::open(&db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS subjects(
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            code TEXT UNIQUE
        )",
        [],
    )?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS classes(
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            section TEXT
        )",
        [],
    )?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS students(
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            roll_number TEXT NOT NULL UNIQUE,
            class_id TEXT,
            has_encoding INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            FOREIGN KEY(class_id) REFERENCES classes(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_students_class ON students(class_id)",
        [],
    )?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS student_subjects(
            student_id TEXT NOT NULL,
            subject_id TEXT NOT NULL,
            PRIMARY KEY(student_id, subject_id),
            FOREIGN KEY(student_id) REFERENCES students(id),
            FOREIGN KEY(subject_id) REFERENCES subjects(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_student_subjects_subject ON student_subjects(subject_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS lectures(
            id TEXT PRIMARY KEY,
            subject_id TEXT NOT NULL,
            class_id TEXT,
            date TEXT NOT NULL,
            time_start TEXT,
            time_end TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT,
            FOREIGN KEY(subject_id) REFERENCES subjects(id),
            FOREIGN KEY(class_id) REFERENCES classes(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_lectures_subject_date ON lectures(subject_id, date)",
        [],
    )?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS lecture_marks(
            lecture_id TEXT NOT NULL,
            student_id TEXT NOT NULL,
            status TEXT NOT NULL,
            marked_by_ai INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY(lecture_id, student_id),
            FOREIGN KEY(lecture_id) REFERENCES lectures(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_lecture_marks_student ON lecture_marks(student_id)",
        [],
    )?;

    Ok(conn)
}

#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub roll_number: String,
    pub class_id: Option<String>,
    pub subject_ids: Vec<String>,
    pub has_encoding: bool,
}

/// Workspace database seen through the engine's collaborator traits.
pub struct Workspace<'a> {
    conn: &'a Connection,
}

impl<'a> Workspace<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create_subject(&self, name: &str, code: Option<&str>) -> anyhow::Result<String> {
        let id = Uuid::new_v4().to_string();
        self.conn
            .execute(
                "INSERT INTO subjects(id, name, code) VALUES(?, ?, ?)",
                (&id, name, code),
            )
            .context("insert subject")?;
        Ok(id)
    }

    pub fn list_subjects(&self) -> anyhow::Result<Vec<(String, String, Option<String>)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, code FROM subjects ORDER BY name, id")?;
        let rows = stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn subject_name(&self, subject_id: &str) -> anyhow::Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT name FROM subjects WHERE id = ?",
                [subject_id],
                |r| r.get(0),
            )
            .optional()?)
    }

    pub fn create_class(&self, name: &str, section: Option<&str>) -> anyhow::Result<String> {
        let id = Uuid::new_v4().to_string();
        self.conn
            .execute(
                "INSERT INTO classes(id, name, section) VALUES(?, ?, ?)",
                (&id, name, section),
            )
            .context("insert class")?;
        Ok(id)
    }

    pub fn list_classes(&self) -> anyhow::Result<Vec<(String, String, Option<String>)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, section FROM classes ORDER BY name, section, id")?;
        let rows = stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn create_student(&self, s: &NewStudent) -> anyhow::Result<String> {
        if let Some(c) = &s.class_id {
            if !self.class_exists_raw(c)? {
                return Err(anyhow!("unknown class: {}", c));
            }
        }
        for subject in &s.subject_ids {
            if !self.subject_exists_raw(subject)? {
                return Err(anyhow!("unknown subject: {}", subject));
            }
        }
        let id = Uuid::new_v4().to_string();
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO students(id, name, roll_number, class_id, has_encoding, created_at)
             VALUES(?, ?, ?, ?, ?, ?)",
            (
                &id,
                &s.name,
                &s.roll_number,
                &s.class_id,
                s.has_encoding as i64,
                Utc::now().to_rfc3339(),
            ),
        )
        .context("insert student")?;
        for subject in &s.subject_ids {
            tx.execute(
                "INSERT OR IGNORE INTO student_subjects(student_id, subject_id) VALUES(?, ?)",
                (&id, subject),
            )?;
        }
        tx.commit()?;
        Ok(id)
    }

    /// Students filtered by optional subject enrollment and class, in roll-number order.
    pub fn list_students(
        &self,
        subject_id: Option<&str>,
        class_id: Option<&str>,
    ) -> anyhow::Result<Vec<Student>> {
        let mut sql = String::from(
            "SELECT s.id, s.name, s.roll_number, s.class_id, s.has_encoding FROM students s",
        );
        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<Value> = Vec::new();
        if let Some(subject) = subject_id {
            clauses.push(
                "EXISTS (SELECT 1 FROM student_subjects ss
                         WHERE ss.student_id = s.id AND ss.subject_id = ?)",
            );
            params.push(Value::Text(subject.to_string()));
        }
        if let Some(c) = class_id {
            clauses.push("s.class_id = ?");
            params.push(Value::Text(c.to_string()));
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY s.roll_number, s.id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(params), |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, Option<String>>(3)?,
                    r.get::<_, i64>(4)? != 0,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut subj_stmt = self
            .conn
            .prepare("SELECT subject_id FROM student_subjects WHERE student_id = ?")?;
        let mut out = Vec::with_capacity(rows.len());
        for (id, name, roll_number, class_id, has_encoding) in rows {
            let subject_ids = subj_stmt
                .query_map([&id], |r| r.get::<_, String>(0))?
                .collect::<Result<BTreeSet<_>, _>>()?;
            out.push(Student {
                id,
                name,
                roll_number,
                class_id,
                subject_ids,
                has_encoding,
            });
        }
        Ok(out)
    }

    fn subject_exists_raw(&self, subject_id: &str) -> anyhow::Result<bool> {
        Ok(self
            .conn
            .query_row("SELECT 1 FROM subjects WHERE id = ?", [subject_id], |r| {
                r.get::<_, i64>(0)
            })
            .optional()?
            .is_some())
    }

    fn class_exists_raw(&self, class_id: &str) -> anyhow::Result<bool> {
        Ok(self
            .conn
            .query_row("SELECT 1 FROM classes WHERE id = ?", [class_id], |r| {
                r.get::<_, i64>(0)
            })
            .optional()?
            .is_some())
    }

    fn insert_marks(
        tx: &rusqlite::Transaction<'_>,
        lecture_id: &str,
        roster: &Roster,
    ) -> anyhow::Result<()> {
        let mut stmt = tx.prepare(
            "INSERT INTO lecture_marks(lecture_id, student_id, status, marked_by_ai)
             VALUES(?, ?, ?, ?)",
        )?;
        for e in roster.entries() {
            stmt.execute((
                lecture_id,
                &e.student_id,
                e.mark.value.as_str(),
                e.mark.provenance.is_ai() as i64,
            ))?;
        }
        Ok(())
    }

    fn save_raw(&self, record: &LectureRecord) -> anyhow::Result<RecordId> {
        let id = Uuid::new_v4().to_string();
        let ctx = &record.context;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO lectures(id, subject_id, class_id, date, time_start, time_end, created_at)
             VALUES(?, ?, ?, ?, ?, ?, ?)",
            (
                &id,
                &ctx.subject_id,
                &ctx.class_id,
                format_date(ctx.date),
                ctx.time_start.map(format_time),
                ctx.time_end.map(format_time),
                Utc::now().to_rfc3339(),
            ),
        )
        .context("insert lecture")?;
        Self::insert_marks(&tx, &id, &record.roster).context("insert lecture marks")?;
        tx.commit().context("commit lecture")?;
        Ok(id)
    }

    fn replace_raw(&self, id: &str, record: &LectureRecord) -> anyhow::Result<bool> {
        let ctx = &record.context;
        let tx = self.conn.unchecked_transaction()?;
        let updated = tx
            .execute(
                "UPDATE lectures
                 SET subject_id = ?, class_id = ?, date = ?, time_start = ?, time_end = ?,
                     updated_at = ?
                 WHERE id = ?",
                (
                    &ctx.subject_id,
                    &ctx.class_id,
                    format_date(ctx.date),
                    ctx.time_start.map(format_time),
                    ctx.time_end.map(format_time),
                    Utc::now().to_rfc3339(),
                    id,
                ),
            )
            .context("update lecture")?;
        if updated == 0 {
            return Ok(false);
        }
        tx.execute("DELETE FROM lecture_marks WHERE lecture_id = ?", [id])?;
        Self::insert_marks(&tx, id, &record.roster).context("insert lecture marks")?;
        tx.commit().context("commit lecture")?;
        Ok(true)
    }

    fn load_raw(&self, id: &str) -> anyhow::Result<Option<LectureRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT subject_id, class_id, date, time_start, time_end FROM lectures WHERE id = ?",
                [id],
                |r| {
                    Ok((
                        r.get::<_, String>(0)?,
                        r.get::<_, Option<String>>(1)?,
                        r.get::<_, String>(2)?,
                        r.get::<_, Option<String>>(3)?,
                        r.get::<_, Option<String>>(4)?,
                    ))
                },
            )
            .optional()?;
        let Some((subject_id, class_id, date, time_start, time_end)) = row else {
            return Ok(None);
        };
        let context = LectureContext {
            subject_id,
            class_id,
            date: parse_date(&date)?,
            time_start: time_start.as_deref().map(parse_time).transpose()?,
            time_end: time_end.as_deref().map(parse_time).transpose()?,
        };

        let mut stmt = self.conn.prepare(
            "SELECT m.student_id, COALESCE(s.name, ''), COALESCE(s.roll_number, ''),
                    m.status, m.marked_by_ai
             FROM lecture_marks m
             LEFT JOIN students s ON s.id = m.student_id
             WHERE m.lecture_id = ?",
        )?;
        let rows = stmt
            .query_map([id], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, i64>(4)? != 0,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        let mut entries = Vec::with_capacity(rows.len());
        for (student_id, name, roll_number, status, ai) in rows {
            let value = MarkValue::parse(&status)
                .ok_or_else(|| anyhow!("lecture {} has unknown status {:?}", id, status))?;
            entries.push(RosterEntry {
                student_id,
                name,
                roll_number,
                mark: Mark {
                    value,
                    provenance: Provenance::from_ai_flag(ai),
                },
            });
        }
        let roster = Roster::from_entries(
            context.subject_id.clone(),
            context.class_id.clone(),
            entries,
        );
        Ok(Some(LectureRecord { context, roster }))
    }

    fn list_raw(&self, filter: &RecordFilter) -> anyhow::Result<Vec<(RecordId, LectureRecord)>> {
        let mut sql = String::from("SELECT id FROM lectures");
        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<Value> = Vec::new();
        if let Some(s) = &filter.subject_id {
            clauses.push("subject_id = ?");
            params.push(Value::Text(s.clone()));
        }
        if let Some(c) = &filter.class_id {
            clauses.push("class_id = ?");
            params.push(Value::Text(c.clone()));
        }
        if let Some(from) = filter.date_from {
            clauses.push("date >= ?");
            params.push(Value::Text(format_date(from)));
        }
        if let Some(to) = filter.date_to {
            clauses.push("date <= ?");
            params.push(Value::Text(format_date(to)));
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY date DESC, created_at DESC, id");

        let mut stmt = self.conn.prepare(&sql)?;
        let ids = stmt
            .query_map(params_from_iter(params), |r| r.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.load_raw(&id)? {
                debug_assert!(filter.matches(&record.context));
                out.push((id, record));
            }
        }
        Ok(out)
    }
}

impl StudentDirectory for Workspace<'_> {
    fn subject_exists(&self, subject_id: &str) -> EngineResult<bool> {
        self.subject_exists_raw(subject_id)
            .map_err(|e| EngineError::persistence(format!("{e:#}")))
    }

    fn class_exists(&self, class_id: &str) -> EngineResult<bool> {
        self.class_exists_raw(class_id)
            .map_err(|e| EngineError::persistence(format!("{e:#}")))
    }

    fn list_eligible_students(
        &self,
        subject_id: &str,
        class_id: Option<&str>,
    ) -> EngineResult<Vec<Student>> {
        self.list_students(Some(subject_id), class_id)
            .map_err(|e| EngineError::persistence(format!("{e:#}")))
    }
}

impl LectureStore for Workspace<'_> {
    fn save(&mut self, record: &LectureRecord) -> EngineResult<RecordId> {
        self.save_raw(record)
            .map_err(|e| EngineError::persistence(format!("{e:#}")))
    }

    fn load(&self, id: &str) -> EngineResult<LectureRecord> {
        self.load_raw(id)
            .map_err(|e| EngineError::persistence(format!("{e:#}")))?
            .ok_or_else(|| EngineError::RecordNotFound(id.to_string()))
    }

    fn replace(&mut self, id: &str, record: &LectureRecord) -> EngineResult<()> {
        let found = self
            .replace_raw(id, record)
            .map_err(|e| EngineError::persistence(format!("{e:#}")))?;
        if found {
            Ok(())
        } else {
            Err(EngineError::RecordNotFound(id.to_string()))
        }
    }

    fn list(&self, filter: &RecordFilter) -> EngineResult<Vec<(RecordId, LectureRecord)>> {
        self.list_raw(filter)
            .map_err(|e| EngineError::persistence(format!("{e:#}")))
    }
}

pub fn format_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

pub fn format_time(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

pub fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("date must be YYYY-MM-DD, got {:?}", raw))
}

pub fn parse_time(raw: &str) -> anyhow::Result<NaiveTime> {
    let t = raw.trim();
    NaiveTime::parse_from_str(t, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M:%S"))
        .with_context(|| format!("time must be HH:MM, got {:?}", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::EditSession;
    use crate::roster::build_roster;
    use crate::session::MarkingSession;
    use crate::model::{LectureDraft, RecognitionResult};
    use crate::reconcile::reconcile;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(prefix: &str) -> PathBuf {
        let p = std::env::temp_dir().join(format!(
            "{}-{}",
            prefix,
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ));
        std::fs::create_dir_all(&p).expect("create temp dir");
        p
    }

    fn student(name: &str, roll: &str, class_id: &str, subjects: &[&str]) -> NewStudent {
        NewStudent {
            name: name.to_string(),
            roll_number: roll.to_string(),
            class_id: Some(class_id.to_string()),
            subject_ids: subjects.iter().map(|s| s.to_string()).collect(),
            has_encoding: true,
        }
    }

    #[test]
    fn schema_is_idempotent() {
        let dir = temp_dir("attendanced-schema");
        drop(open_db(&dir).expect("first open"));
        let conn = open_db(&dir).expect("second open");
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM lectures", [], |r| r.get(0))
            .expect("count");
        assert_eq!(n, 0);
        drop(conn);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn marking_roundtrip_through_sqlite() {
        let dir = temp_dir("attendanced-db-roundtrip");
        let conn = open_db(&dir).expect("open");
        let mut ws = Workspace::new(&conn);
        let math = ws.create_subject("Math", Some("MTH")).expect("subject");
        let bio = ws.create_subject("Biology", None).expect("subject");
        let class_a = ws.create_class("8", Some("A")).expect("class");
        let s2 = ws
            .create_student(&student("Bea", "02", &class_a, &[math.as_str()]))
            .expect("student");
        let s1 = ws
            .create_student(&student("Ada", "01", &class_a, &[math.as_str(), bio.as_str()]))
            .expect("student");
        ws.create_student(&student("Cy", "03", &class_a, &[bio.as_str()]))
            .expect("student");

        let roster = build_roster(&ws, &math, Some(&class_a)).expect("roster");
        let ids: Vec<&str> = roster.entries().iter().map(|e| e.student_id.as_str()).collect();
        assert_eq!(ids, vec![s1.as_str(), s2.as_str()]);

        let mut session = MarkingSession::new();
        session.initialize(roster);
        let reconciled = reconcile(
            &session.snapshot().expect("snapshot"),
            &RecognitionResult::from_detected([s1.clone()]),
        );
        session.apply(reconciled).expect("apply");
        session
            .override_mark(&s2, MarkValue::Absent)
            .expect("override");
        let draft = LectureDraft {
            subject_id: Some(math.clone()),
            class_id: Some(class_a.clone()),
            date: NaiveDate::from_ymd_opt(2024, 5, 6),
            time_start: NaiveTime::from_hms_opt(9, 30, 0),
            time_end: None,
        };
        let (id, record) = session.commit_to(&mut ws, &draft).expect("commit");

        let loaded = ws.load(&id).expect("load");
        assert_eq!(loaded, record);
        assert_eq!(loaded.roster.mark_of(&s1), Some(Mark::ai(MarkValue::Present)));

        let mut edit = EditSession::open(&ws, &id).expect("open edit");
        edit.apply(&s2, MarkValue::Present).expect("edit");
        let outcome = edit.commit_edit(&mut ws).expect("commit edit");
        assert_eq!(outcome.changes.len(), 1);
        assert_eq!(ws.load(&id).expect("load").present_count(), 2);

        let listed = ws
            .list(&RecordFilter {
                subject_id: Some(math.clone()),
                ..Default::default()
            })
            .expect("list");
        assert_eq!(listed.len(), 1);
        assert!(ws
            .list(&RecordFilter {
                subject_id: Some(bio),
                ..Default::default()
            })
            .expect("list")
            .is_empty());
        assert!(matches!(
            ws.load("missing"),
            Err(EngineError::RecordNotFound(_))
        ));
        assert!(matches!(
            ws.replace("missing", &record),
            Err(EngineError::RecordNotFound(_))
        ));

        drop(conn);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn list_orders_newest_first_and_filters_dates() {
        let dir = temp_dir("attendanced-db-list");
        let conn = open_db(&dir).expect("open");
        let mut ws = Workspace::new(&conn);
        let math = ws.create_subject("Math", None).expect("subject");
        for day in [3, 1, 2] {
            let record = LectureRecord {
                context: LectureContext {
                    subject_id: math.clone(),
                    class_id: None,
                    date: NaiveDate::from_ymd_opt(2024, 1, day).expect("date"),
                    time_start: None,
                    time_end: None,
                },
                roster: Roster::from_entries(math.clone(), None, Vec::new()),
            };
            ws.save(&record).expect("save");
        }
        let all = ws.list(&RecordFilter::default()).expect("list");
        let days: Vec<String> = all.iter().map(|(_, r)| format_date(r.context.date)).collect();
        assert_eq!(days, vec!["2024-01-03", "2024-01-02", "2024-01-01"]);

        let ranged = ws
            .list(&RecordFilter {
                date_from: NaiveDate::from_ymd_opt(2024, 1, 2),
                date_to: NaiveDate::from_ymd_opt(2024, 1, 2),
                ..Default::default()
            })
            .expect("list");
        assert_eq!(ranged.len(), 1);

        drop(conn);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn create_student_rejects_unknown_subject() {
        let dir = temp_dir("attendanced-db-student");
        let conn = open_db(&dir).expect("open");
        let ws = Workspace::new(&conn);
        let class_a = ws.create_class("8", None).expect("class");
        assert!(ws
            .create_student(&student("Ada", "01", &class_a, &["nope"]))
            .is_err());
        drop(conn);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn time_parsing_accepts_minutes_and_seconds() {
        assert_eq!(
            parse_time("09:05").expect("time"),
            NaiveTime::from_hms_opt(9, 5, 0).expect("time")
        );
        assert_eq!(
            parse_time("09:05:00").expect("time"),
            NaiveTime::from_hms_opt(9, 5, 0).expect("time")
        );
        assert!(parse_date("2024/01/01").is_err());
    }
}
