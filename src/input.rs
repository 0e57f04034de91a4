//! Score entry: locale text parsing and the edit/blur state of a single score cell.

use crate::calc::{fmt1, round_up_1, with_separator};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

/// Parses `"7,5"` or `"7.5"`. Blank or malformed text yields `None`.
pub fn parse_locale_score(text: &str) -> Option<f64> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }
    let normalized = t.replace(',', ".");
    let well_formed = normalized
        .chars()
        .enumerate()
        .all(|(i, c)| c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+')));
    if !well_formed || normalized.matches('.').count() > 1 {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Resolves any JSON value sent where a score is expected.
/// Numbers pass through, strings go through `parse_locale_score`, everything else is absent.
pub fn parse_score_value(v: &serde_json::Value) -> Option<f64> {
    match v {
        serde_json::Value::Number(n) => n.as_f64().filter(|x| x.is_finite()),
        serde_json::Value::String(s) => parse_locale_score(s),
        _ => None,
    }
}

pub fn clamp_score(v: f64) -> f64 {
    v.clamp(MIN_SCORE, MAX_SCORE)
}

/// Clamp to the score range, then round up to one decimal.
pub fn commit_value(value: Option<f64>) -> Option<f64> {
    value.map(clamp_score).and_then(|v| round_up_1(Some(v)))
}

/// Keeps a leading minus, digits and the first decimal separator, with at most
/// one digit after it. Negative text is clamped to zero on commit.
pub fn sanitize_typed(text: &str, separator: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut seen_separator = false;
    let mut decimals = 0;
    for c in text.chars() {
        if c.is_ascii_digit() {
            if seen_separator {
                if decimals >= 1 {
                    continue;
                }
                decimals += 1;
            }
            out.push(c);
        } else if c == '-' && out.is_empty() {
            out.push(c);
        } else if (c == ',' || c == '.') && !seen_separator {
            seen_separator = true;
            out.push(separator);
        }
    }
    out
}

/// Text being typed and the last committed value of one score cell.
/// Only `blur` changes the committed value.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreInput {
    raw_text: String,
    committed: Option<f64>,
    separator: char,
}

impl ScoreInput {
    pub fn new(separator: char) -> Self {
        Self {
            raw_text: String::new(),
            committed: None,
            separator,
        }
    }

    pub fn from_committed(value: Option<f64>, separator: char) -> Self {
        Self {
            raw_text: display(value, separator),
            committed: value,
            separator,
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn committed(&self) -> Option<f64> {
        self.committed
    }

    pub fn edit(&mut self, text: &str) {
        self.raw_text = sanitize_typed(text, self.separator);
    }

    /// Commits the typed text: parse, clamp to the score range, round up to one decimal.
    pub fn blur(&mut self) -> Option<f64> {
        let value = commit_value(parse_locale_score(&self.raw_text));
        self.committed = value;
        self.raw_text = display(value, self.separator);
        value
    }
}

fn display(value: Option<f64>, separator: char) -> String {
    with_separator(&fmt1(value), separator)
}

/// One-shot edit and blur of `text`, as the score cell would do it.
pub fn commit_text(text: &str, separator: char) -> ScoreInput {
    let mut input = ScoreInput::new(separator);
    input.edit(text);
    input.blur();
    input
}
