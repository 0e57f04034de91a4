use crate::calc::{apply_recoveries, final_row, fmt1, round_up_1};
use crate::input::{commit_text, parse_score_value};
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{
    get_required_str, get_student_id, optional_name, score_param, score_set_from, sentinel,
    student_scores, students_param, to_json,
};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn value_param(req: &Request) -> Option<f64> {
    req.params.get("value").and_then(parse_score_value)
}

fn handle_round_up(req: &Request) -> serde_json::Value {
    respond(&req.id, Ok(json!({ "value": sentinel(round_up_1(value_param(req))) })))
}

fn handle_fmt1(req: &Request) -> serde_json::Value {
    respond(&req.id, Ok(json!({ "text": fmt1(value_param(req)) })))
}

fn handle_apply_recoveries(req: &Request) -> serde_json::Value {
    let p = &req.params;
    let effective = apply_recoveries(
        score_param(p, "b1"),
        score_param(p, "b2"),
        score_param(p, "r1"),
        score_param(p, "b3"),
        score_param(p, "b4"),
        score_param(p, "r2"),
    );
    respond(&req.id, Ok(json!({ "effective": effective })))
}

fn handle_totals(req: &Request) -> serde_json::Value {
    let totals = score_set_from(&req.params).totals();
    respond(
        &req.id,
        Ok(json!({ "total": totals.total, "media": totals.media })),
    )
}

fn final_table(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let students = students_param(&req.params, state.config.max_rows)?;
    let mut rows = Vec::with_capacity(students.len());
    for (idx, student) in students.iter().enumerate() {
        let student_id = get_student_id(student)
            .map_err(|e| e.with_details(json!({ "index": idx })))?;
        let scores = student_scores(student);
        let row = final_row(&scores, state.separator());
        let mut out = to_json(&row)?;
        out["studentId"] = json!(student_id);
        out["name"] = json!(optional_name(student));
        out["scores"] = to_json(&scores)?;
        rows.push(out);
    }
    Ok(json!({ "rows": rows }))
}

fn input_commit(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let text = get_required_str(&req.params, "text")?;
    let input = commit_text(&text, state.separator());
    Ok(json!({
        "value": input.committed(),
        "display": input.raw_text(),
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grades.roundUp1" => Some(handle_round_up(req)),
        "grades.fmt1" => Some(handle_fmt1(req)),
        "grades.applyRecoveries" => Some(handle_apply_recoveries(req)),
        "grades.totals" => Some(handle_totals(req)),
        "grades.finalTable" => Some(respond(&req.id, final_table(state, req))),
        "input.commit" => Some(respond(&req.id, input_commit(state, req))),
        _ => None,
    }
}
