use crate::calc::{final_row, ScoreField};
use crate::input::{commit_text, commit_value, parse_score_value, ScoreInput};
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{get_field, get_student_id, to_json};
use crate::ipc::types::{AppState, Request};
use crate::risk::{build_risk_report, RiskStudent};
use crate::sheet::ScoreKey;
use serde_json::json;
use std::collections::BTreeSet;
use tracing::debug;

fn sheet_set(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_student_id(&req.params)?;
    let field = get_field(&req.params)?;
    let sep = state.separator();

    let input = match (req.params.get("text"), req.params.get("value")) {
        (Some(serde_json::Value::String(text)), _) => commit_text(text, sep),
        (Some(other), _) => {
            return Err(HandlerErr::bad_params("text must be a string")
                .with_details(json!({ "text": other })))
        }
        (None, Some(v)) => ScoreInput::from_committed(commit_value(parse_score_value(v)), sep),
        (None, None) => return Err(HandlerErr::bad_params("missing text or value")),
    };

    let value = input.committed();
    debug!(student_id = %student_id, field = %field, ?value, "sheet cell committed");
    state.sheet.set(ScoreKey::new(student_id.clone(), field), value);
    Ok(json!({
        "studentId": student_id,
        "field": field,
        "value": value,
        "display": input.raw_text(),
    }))
}

fn sheet_get(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_student_id(&req.params)?;
    let sep = state.separator();
    let scores = state.sheet.score_set(&student_id);
    let mut display = serde_json::Map::new();
    for field in ScoreField::ALL {
        let cell = ScoreInput::from_committed(scores.get(field), sep);
        display.insert(field.as_str().to_string(), json!(cell.raw_text()));
    }
    Ok(json!({
        "studentId": student_id,
        "scores": to_json(&scores)?,
        "display": display,
        "row": to_json(&final_row(&scores, sep))?,
    }))
}

fn sheet_clear(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let cleared = match req.params.get("studentId") {
        None | Some(serde_json::Value::Null) => state.sheet.clear(),
        Some(_) => {
            let student_id = get_student_id(&req.params)?;
            state.sheet.clear_student(&student_id)
        }
    };
    Ok(json!({ "cleared": cleared }))
}

fn lookup<'a>(params: &'a serde_json::Value, map: &str, student_id: &str) -> Option<&'a serde_json::Value> {
    params.get(map).and_then(|m| m.get(student_id))
}

/// Class roster: every student with a committed score, plus every student named in
/// `studentIds`, `names` or `numerosChamada`, so students without data still count.
fn sheet_roster(state: &AppState, params: &serde_json::Value) -> Result<Vec<String>, HandlerErr> {
    let mut roster: BTreeSet<String> = state.sheet.students().into_iter().collect();
    if let Some(ids) = params.get("studentIds") {
        let Some(ids) = ids.as_array() else {
            return Err(HandlerErr::bad_params("studentIds must be an array"));
        };
        for id in ids {
            roster.insert(get_student_id(&json!({ "studentId": id }))?);
        }
    }
    for map in ["names", "numerosChamada"] {
        if let Some(obj) = params.get(map).and_then(|m| m.as_object()) {
            roster.extend(obj.keys().filter(|k| !k.trim().is_empty()).cloned());
        }
    }
    if roster.len() > state.config.max_rows {
        return Err(HandlerErr::bad_params(format!(
            "too many students: {} (limit {})",
            roster.len(),
            state.config.max_rows
        ))
        .with_details(json!({ "limit": state.config.max_rows, "count": roster.len() })));
    }
    Ok(roster.into_iter().collect())
}

fn sheet_risk_report(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let students: Vec<RiskStudent> = sheet_roster(state, &req.params)?
        .into_iter()
        .map(|id| RiskStudent {
            name: lookup(&req.params, "names", &id)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            numero_chamada: lookup(&req.params, "numerosChamada", &id).and_then(|v| v.as_i64()),
            scores: state.sheet.score_set(&id),
            student_id: id,
        })
        .collect();
    let report = build_risk_report(&students, state.separator());
    to_json(&report)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "sheet.set" => Some(respond(&req.id, sheet_set(state, req))),
        "sheet.get" => Some(respond(&req.id, sheet_get(state, req))),
        "sheet.clear" => Some(respond(&req.id, sheet_clear(state, req))),
        "sheet.riskReport" => Some(respond(&req.id, sheet_risk_report(state, req))),
        _ => None,
    }
}
