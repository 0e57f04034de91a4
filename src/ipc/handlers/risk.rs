use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{get_student_id, optional_name, student_scores, students_param, to_json};
use crate::ipc::types::{AppState, Request};
use crate::risk::{build_risk_report, RiskStudent};
use serde_json::json;

fn parse_numero_chamada(student: &serde_json::Value) -> Result<Option<i64>, HandlerErr> {
    match student.get("numeroChamada") {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(v) => v.as_i64().map(Some).ok_or_else(|| {
            HandlerErr::bad_params("numeroChamada must be an integer")
                .with_details(json!({ "numeroChamada": v }))
        }),
    }
}

fn risk_report(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let students = students_param(&req.params, state.config.max_rows)?;
    let mut parsed = Vec::with_capacity(students.len());
    for (idx, student) in students.iter().enumerate() {
        parsed.push(RiskStudent {
            student_id: get_student_id(student)
                .map_err(|e| e.with_details(json!({ "index": idx })))?,
            name: optional_name(student),
            numero_chamada: parse_numero_chamada(student)?,
            scores: student_scores(student),
        });
    }
    let report = build_risk_report(&parsed, state.separator());
    to_json(&report)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "risk.report" => Some(respond(&req.id, risk_report(state, req))),
        _ => None,
    }
}
