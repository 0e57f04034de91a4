use crate::initial::{evaluate_initial, initial_average, is_incomplete, InitialAssessment};
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{get_student_id, optional_name, score_param, students_param};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn initial_average_one(req: &Request) -> serde_json::Value {
    let p = &req.params;
    let (n1, n2, rec) = (score_param(p, "n1"), score_param(p, "n2"), score_param(p, "rec"));
    respond(
        &req.id,
        Ok(json!({
            "media": initial_average(n1, n2, rec),
            "incomplete": is_incomplete(n1, n2, rec),
        })),
    )
}

fn parse_assessment(raw: &serde_json::Value) -> Result<InitialAssessment, HandlerErr> {
    let component = raw
        .get("component")
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| HandlerErr::bad_params("assessment is missing component"))?;
    let semester = match raw.get("semester").and_then(|v| v.as_i64()) {
        Some(1) => 1,
        Some(2) => 2,
        other => {
            return Err(HandlerErr::bad_params("semester must be 1 or 2")
                .with_details(json!({ "component": component, "semester": other })))
        }
    };
    Ok(InitialAssessment {
        component,
        semester,
        av1: score_param(raw, "av1"),
        av2: score_param(raw, "av2"),
        rec: score_param(raw, "rec"),
    })
}

fn initial_table(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let students = students_param(&req.params, state.config.max_rows)?;
    let mut out = Vec::with_capacity(students.len());
    for (idx, student) in students.iter().enumerate() {
        let student_id = get_student_id(student)
            .map_err(|e| e.with_details(json!({ "index": idx })))?;
        let assessments = student
            .get("assessments")
            .and_then(|v| v.as_array())
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let mut rows = Vec::with_capacity(assessments.len());
        for raw in assessments {
            let a = parse_assessment(raw)?;
            rows.push(evaluate_initial(&a, state.separator()));
        }
        out.push(json!({
            "studentId": student_id,
            "name": optional_name(student),
            "incomplete": rows.iter().any(|r| r.incomplete),
            "rows": rows,
        }));
    }
    Ok(json!({ "students": out }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grades.initialAverage" => Some(initial_average_one(req)),
        "grades.initialTable" => Some(respond(&req.id, initial_table(state, req))),
        _ => None,
    }
}
