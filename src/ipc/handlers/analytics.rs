use crate::aggregate::{aggregate_with_threshold, subjects_in, StudentStatistic};
use crate::db::Workspace;
use crate::ipc::helpers::{get_record_filter, require_db, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::{LectureRecord, Student};
use crate::store::LectureStore;
use serde_json::json;
use std::collections::HashMap;

fn student_json(stat: &StudentStatistic, students: &HashMap<String, Student>) -> serde_json::Value {
    let mut row = json!(stat);
    // Records can outlive the student row they reference.
    if let Some(s) = students.get(&stat.student_id) {
        row["name"] = json!(s.name);
        row["rollNumber"] = json!(s.roll_number);
    }
    row
}

fn analytics_open(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let conn = require_db(&state.db)?;
    let filter = get_record_filter(params)?;
    let ws = Workspace::new(conn);
    let records: Vec<LectureRecord> = ws.list(&filter)?.into_iter().map(|(_, r)| r).collect();
    let report = aggregate_with_threshold(&records, state.config.low_threshold);

    let mut subject_names = HashMap::new();
    for subject_id in subjects_in(&report) {
        if let Some(name) = ws
            .subject_name(subject_id)
            .map_err(|e| HandlerErr::db("db_query_failed", e))?
        {
            subject_names.insert(subject_id.to_string(), name);
        }
    }
    let students: HashMap<String, Student> = ws
        .list_students(None, None)
        .map_err(|e| HandlerErr::db("db_query_failed", e))?
        .into_iter()
        .map(|s| (s.id.clone(), s))
        .collect();

    let subject_stats: Vec<serde_json::Value> = report
        .subject_stats
        .iter()
        .map(|s| {
            let mut row = json!(s);
            row["subjectName"] = json!(subject_names.get(&s.subject_id));
            row
        })
        .collect();
    let student_stats: Vec<serde_json::Value> = report
        .student_stats
        .iter()
        .map(|s| student_json(s, &students))
        .collect();
    let low_attendance: Vec<serde_json::Value> = report
        .low_attendance
        .iter()
        .map(|s| student_json(s, &students))
        .collect();

    log::debug!(
        "analytics over {} lectures, {} below {}%",
        report.total_lectures,
        low_attendance.len(),
        report.threshold
    );
    Ok(json!({
        "totalLectures": report.total_lectures,
        "threshold": report.threshold,
        "subjectStats": subject_stats,
        "studentStats": student_stats,
        "lowAttendance": low_attendance,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "analytics.open" => Some(respond(req, analytics_open(state, &req.params))),
        _ => None,
    }
}
