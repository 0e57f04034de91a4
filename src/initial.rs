//! Early-grades ("anos iniciais") track: two assessments and one recovery per
//! curricular component and semester, averaged with ordinary half-up rounding.
//! This rounding is intentionally different from `calc::round_up_1`.

use crate::calc::{with_separator, PASSING_MEDIA};
use serde::Serialize;

/// One-decimal rounding to the nearest value, exact halves away from zero.
pub fn to_fixed_1(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    // A double sits exactly on a .x5 boundary only when it is an odd number of quarters.
    let quarters = x * 4.0;
    if quarters.abs() < 1e15 && quarters.fract() == 0.0 && (quarters as i64) % 2 != 0 {
        return (x * 10.0).round() / 10.0 + 0.0;
    }
    format!("{:.1}", x).parse::<f64>().unwrap_or(x) + 0.0
}

/// Average of the two assessments after the recovery, or `None` when either
/// assessment is missing. A present recovery always takes the lower slot.
pub fn initial_average(n1: Option<f64>, n2: Option<f64>, rec: Option<f64>) -> Option<f64> {
    let (Some(a), Some(b)) = (n1, n2) else {
        return None;
    };
    let mut notes = [a, b];
    if let Some(r) = rec {
        let idx = if a < b { 0 } else { 1 };
        notes[idx] = r;
    }
    Some(to_fixed_1((notes[0] + notes[1]) / 2.0))
}

/// Highlight flag only; it never blocks the average.
pub fn is_incomplete(av1: Option<f64>, av2: Option<f64>, rec: Option<f64>) -> bool {
    av1.is_none() || av2.is_none() || rec.is_none()
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitialAssessment {
    pub component: String,
    pub semester: u8,
    pub av1: Option<f64>,
    pub av2: Option<f64>,
    pub rec: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialRow {
    pub component: String,
    pub semester: u8,
    pub media: Option<f64>,
    pub media_text: String,
    pub incomplete: bool,
    pub below_passing: bool,
}

pub fn evaluate_initial(a: &InitialAssessment, separator: char) -> InitialRow {
    let media = initial_average(a.av1, a.av2, a.rec);
    InitialRow {
        component: a.component.clone(),
        semester: a.semester,
        media,
        media_text: media
            .map(|m| with_separator(&format!("{:.1}", m), separator))
            .unwrap_or_default(),
        incomplete: is_incomplete(a.av1, a.av2, a.rec),
        below_passing: media.map(|m| m < PASSING_MEDIA).unwrap_or(false),
    }
}
