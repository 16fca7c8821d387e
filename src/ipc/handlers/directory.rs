use crate::db::{NewStudent, Workspace};
use crate::ipc::helpers::{get_optional_str, get_required_str, get_string_list, with_db, HandlerErr};
use crate::ipc::types::{AppState, Request};
use rusqlite::Connection;
use serde_json::json;

fn subjects_create(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let name = get_required_str(params, "name")?;
    let code = get_optional_str(params, "code")?;
    let id = Workspace::new(conn)
        .create_subject(&name, code.as_deref())
        .map_err(|e| HandlerErr::db("db_insert_failed", e))?;
    Ok(json!({ "subjectId": id }))
}

fn subjects_list(
    conn: &Connection,
    _params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let rows = Workspace::new(conn)
        .list_subjects()
        .map_err(|e| HandlerErr::db("db_query_failed", e))?;
    let subjects: Vec<serde_json::Value> = rows
        .into_iter()
        .map(|(id, name, code)| json!({ "id": id, "name": name, "code": code }))
        .collect();
    Ok(json!({ "subjects": subjects }))
}

fn classes_create(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let name = get_required_str(params, "name")?;
    let section = get_optional_str(params, "section")?;
    let id = Workspace::new(conn)
        .create_class(&name, section.as_deref())
        .map_err(|e| HandlerErr::db("db_insert_failed", e))?;
    Ok(json!({ "classId": id }))
}

fn classes_list(
    conn: &Connection,
    _params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let rows = Workspace::new(conn)
        .list_classes()
        .map_err(|e| HandlerErr::db("db_query_failed", e))?;
    let classes: Vec<serde_json::Value> = rows
        .into_iter()
        .map(|(id, name, section)| {
            let display = match &section {
                Some(s) => format!("{} {}", name, s),
                None => name.clone(),
            };
            json!({ "id": id, "name": name, "section": section, "displayName": display })
        })
        .collect();
    Ok(json!({ "classes": classes }))
}

fn students_create(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let student = NewStudent {
        name: get_required_str(params, "name")?,
        roll_number: get_required_str(params, "rollNumber")?,
        class_id: get_optional_str(params, "classId")?,
        subject_ids: get_string_list(params, "subjectIds")?,
        has_encoding: params
            .get("hasEncoding")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
    };
    let id = Workspace::new(conn)
        .create_student(&student)
        .map_err(|e| HandlerErr::db("db_insert_failed", e))?;
    Ok(json!({ "studentId": id }))
}

fn students_list(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let subject_id = get_optional_str(params, "subjectId")?;
    let class_id = get_optional_str(params, "classId")?;
    let students = Workspace::new(conn)
        .list_students(subject_id.as_deref(), class_id.as_deref())
        .map_err(|e| HandlerErr::db("db_query_failed", e))?;
    Ok(json!({ "students": students }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "subjects.create" => Some(with_db(state, req, subjects_create)),
        "subjects.list" => Some(with_db(state, req, subjects_list)),
        "classes.create" => Some(with_db(state, req, classes_create)),
        "classes.list" => Some(with_db(state, req, classes_list)),
        "students.create" => Some(with_db(state, req, students_create)),
        "students.list" => Some(with_db(state, req, students_list)),
        _ => None,
    }
}
