use crate::calc::{ScoreField, ScoreSet};
use crate::input::parse_score_value;
use crate::ipc::error::HandlerErr;
use serde::Serialize;
use serde_json::json;

pub fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

/// Student ids arrive as strings or numbers (`pessoaId`).
pub fn get_student_id(obj: &serde_json::Value) -> Result<String, HandlerErr> {
    match obj.get("studentId") {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(serde_json::Value::Number(n)) => Ok(n.to_string()),
        _ => Err(HandlerErr::bad_params("missing studentId")),
    }
}

pub fn get_field(params: &serde_json::Value) -> Result<ScoreField, HandlerErr> {
    let raw = get_required_str(params, "field")?;
    ScoreField::parse(&raw).ok_or_else(|| {
        HandlerErr::bad_params("field must be one of: b1, b2, b3, b4, r1, r2")
            .with_details(json!({ "field": raw }))
    })
}

/// Missing keys and unusable values are both absent.
pub fn score_param(obj: &serde_json::Value, key: &str) -> Option<f64> {
    obj.get(key)
        .or_else(|| obj.get(key.to_ascii_uppercase()))
        .and_then(parse_score_value)
}

pub fn score_set_from(obj: &serde_json::Value) -> ScoreSet {
    let mut set = ScoreSet::default();
    for field in ScoreField::ALL {
        set.set(field, score_param(obj, field.as_str()));
    }
    set
}

/// A student's scores live under `scores`, or directly on the student object.
pub fn student_scores(student: &serde_json::Value) -> ScoreSet {
    match student.get("scores") {
        Some(scores) if scores.is_object() => score_set_from(scores),
        _ => score_set_from(student),
    }
}

pub fn optional_name(obj: &serde_json::Value) -> String {
    obj.get("name")
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

pub fn students_param<'a>(
    params: &'a serde_json::Value,
    max_rows: usize,
) -> Result<&'a Vec<serde_json::Value>, HandlerErr> {
    let students = params
        .get("students")
        .and_then(|v| v.as_array())
        .ok_or_else(|| HandlerErr::bad_params("students must be an array"))?;
    if students.len() > max_rows {
        return Err(HandlerErr::bad_params(format!(
            "too many students: {} (limit {})",
            students.len(),
            max_rows
        ))
        .with_details(json!({ "limit": max_rows, "count": students.len() })));
    }
    Ok(students)
}

/// Absent values go on the wire as `""`, the frontend's "no value".
pub fn sentinel(value: Option<f64>) -> serde_json::Value {
    match value {
        Some(v) => json!(v),
        None => json!(""),
    }
}

pub fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, HandlerErr> {
    serde_json::to_value(value)
        .map_err(|e| HandlerErr::internal(format!("failed to serialize result: {}", e)))
}
