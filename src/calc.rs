use serde::{Deserialize, Serialize};
use std::fmt;

/// Bimester weights for B1..B4. The divisor of the average is their sum.
pub const BIMESTER_WEIGHTS: [f64; 4] = [2.0, 3.0, 2.0, 3.0];
pub const WEIGHT_SUM: f64 = 10.0;

/// Averages strictly below this are failing.
pub const PASSING_MEDIA: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreField {
    B1,
    B2,
    B3,
    B4,
    R1,
    R2,
}

impl ScoreField {
    pub const ALL: [ScoreField; 6] = [
        ScoreField::B1,
        ScoreField::B2,
        ScoreField::B3,
        ScoreField::B4,
        ScoreField::R1,
        ScoreField::R2,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreField::B1 => "b1",
            ScoreField::B2 => "b2",
            ScoreField::B3 => "b3",
            ScoreField::B4 => "b4",
            ScoreField::R1 => "r1",
            ScoreField::R2 => "r2",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let t = raw.trim();
        ScoreField::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(t))
    }
}

impl fmt::Display for ScoreField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One student's raw scores for one course. `None` is "not entered", which is
/// not the same thing as an entered zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSet {
    pub b1: Option<f64>,
    pub b2: Option<f64>,
    pub b3: Option<f64>,
    pub b4: Option<f64>,
    pub r1: Option<f64>,
    pub r2: Option<f64>,
}

impl ScoreSet {
    pub fn get(&self, field: ScoreField) -> Option<f64> {
        match field {
            ScoreField::B1 => self.b1,
            ScoreField::B2 => self.b2,
            ScoreField::B3 => self.b3,
            ScoreField::B4 => self.b4,
            ScoreField::R1 => self.r1,
            ScoreField::R2 => self.r2,
        }
    }

    pub fn set(&mut self, field: ScoreField, value: Option<f64>) {
        let slot = match field {
            ScoreField::B1 => &mut self.b1,
            ScoreField::B2 => &mut self.b2,
            ScoreField::B3 => &mut self.b3,
            ScoreField::B4 => &mut self.b4,
            ScoreField::R1 => &mut self.r1,
            ScoreField::R2 => &mut self.r2,
        };
        *slot = value;
    }

    /// True when no field has been entered at all.
    pub fn is_empty(&self) -> bool {
        ScoreField::ALL.iter().all(|f| self.get(*f).is_none())
    }

    /// True when any ordinary bimester score is missing. Recoveries are optional.
    pub fn missing_bimester(&self) -> bool {
        [self.b1, self.b2, self.b3, self.b4]
            .iter()
            .any(|v| v.is_none())
    }

    pub fn effective(&self) -> [f64; 4] {
        apply_recoveries(self.b1, self.b2, self.r1, self.b3, self.b4, self.r2)
    }

    pub fn totals(&self) -> Totals {
        compute_totals(self.b1, self.b2, self.r1, self.b3, self.b4, self.r2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub total: f64,
    pub media: f64,
}

/// Ceiling to one decimal: `ceil(x * 10) / 10`. Never rounds down.
///
/// Returns `None` for absent or non-finite input. A computed zero stays `Some(0.0)`.
pub fn round_up_1(value: Option<f64>) -> Option<f64> {
    let x = value?;
    if !x.is_finite() {
        return None;
    }
    let scaled = x * 10.0;
    // `x` is already the closest double to a tenth (1.1 * 10 is 11.000000000000002).
    let nearest = scaled.round();
    if nearest / 10.0 == x {
        return Some(x + 0.0);
    }
    let mut tenths = scaled.ceil();
    if tenths / 10.0 < x {
        tenths += 1.0;
    }
    let out = tenths / 10.0 + 0.0;
    out.is_finite().then_some(out)
}

/// `round_up_1` as fixed one-decimal text with a `.` separator; `""` when absent.
pub fn fmt1(value: Option<f64>) -> String {
    match round_up_1(value) {
        Some(v) => format!("{:.1}", v),
        None => String::new(),
    }
}

/// Swaps the `.` decimal point for `separator`.
pub fn with_separator(text: &str, separator: char) -> String {
    if separator == '.' {
        return text.to_string();
    }
    text.replace('.', &separator.to_string())
}

fn substitute_pair(x: f64, y: f64, rec: f64) -> (f64, f64) {
    if rec <= 0.0 {
        return (x, y);
    }
    if x < y && rec > x {
        (rec, y)
    } else if y < x && rec > y {
        (x, rec)
    } else if rec > y {
        // equal pair: the second slot takes the recovery
        (x, rec)
    } else {
        (x, y)
    }
}

/// Applies R1 to the lower of (B1, B2) and R2 to the lower of (B3, B4), only
/// where the recovery is higher. Missing values count as zero.
pub fn apply_recoveries(
    b1: Option<f64>,
    b2: Option<f64>,
    r1: Option<f64>,
    b3: Option<f64>,
    b4: Option<f64>,
    r2: Option<f64>,
) -> [f64; 4] {
    let (e1, e2) = substitute_pair(b1.unwrap_or(0.0), b2.unwrap_or(0.0), r1.unwrap_or(0.0));
    let (e3, e4) = substitute_pair(b3.unwrap_or(0.0), b4.unwrap_or(0.0), r2.unwrap_or(0.0));
    [e1, e2, e3, e4]
}

/// Weighted total (2, 3, 2, 3) and average of the effective bimesters, both
/// rounded up to one decimal. The average is taken from the unrounded total.
/// A sum that overflows stays non-finite instead of collapsing to zero.
pub fn compute_totals(
    b1: Option<f64>,
    b2: Option<f64>,
    r1: Option<f64>,
    b3: Option<f64>,
    b4: Option<f64>,
    r2: Option<f64>,
) -> Totals {
    let effective = apply_recoveries(b1, b2, r1, b3, b4, r2);
    let total: f64 = effective
        .iter()
        .zip(BIMESTER_WEIGHTS.iter())
        .map(|(v, w)| v * w)
        .sum();
    let media = total / WEIGHT_SUM;
    Totals {
        total: round_up_1(Some(total)).unwrap_or(total),
        media: round_up_1(Some(media)).unwrap_or(media),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalRow {
    pub effective: [f64; 4],
    pub total: f64,
    pub media: f64,
    pub total_text: String,
    pub media_text: String,
    pub incomplete: bool,
    pub below_passing: bool,
}

/// Row of the final-years grade table for one student.
pub fn final_row(scores: &ScoreSet, separator: char) -> FinalRow {
    let totals = scores.totals();
    FinalRow {
        effective: scores.effective(),
        total: totals.total,
        media: totals.media,
        total_text: with_separator(&fmt1(Some(totals.total)), separator),
        media_text: with_separator(&fmt1(Some(totals.media)), separator),
        incomplete: scores.missing_bimester(),
        below_passing: !scores.is_empty() && totals.media < PASSING_MEDIA,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn s(v: f64) -> Option<f64> {
        Some(v)
    }

    #[test]
    fn round_up_is_a_ceiling() {
        assert_eq!(round_up_1(s(7.01)), s(7.1));
        assert_eq!(round_up_1(s(7.0)), s(7.0));
        assert_eq!(round_up_1(s(9.99)), s(10.0));
        assert_eq!(round_up_1(s(6.75)), s(6.8));
        assert_eq!(round_up_1(s(0.0)), s(0.0));
    }

    #[test]
    fn round_up_keeps_values_already_at_tenths() {
        // 1.1 * 10 is 11.000000000000002 in binary.
        assert_eq!(round_up_1(s(1.1)), s(1.1));
        assert_eq!(round_up_1(s(6.7)), s(6.7));
    }

    #[test]
    fn round_up_never_lands_below_input() {
        let x = 7.0000000000001;
        let r = round_up_1(s(x)).unwrap();
        assert!(r >= x);
        assert_eq!(r, 7.1);

        let just_above = f64::from_bits(1.1f64.to_bits() + 1);
        let r = round_up_1(s(just_above)).unwrap();
        assert!(r >= just_above);
        assert_eq!(r, 1.2);
    }

    #[test]
    fn round_up_absent_is_sentinel() {
        assert_eq!(round_up_1(None), None);
        assert_eq!(round_up_1(s(f64::NAN)), None);
        assert_eq!(round_up_1(s(f64::INFINITY)), None);
        assert_eq!(fmt1(None), "");
    }

    #[test]
    fn round_up_handles_negatives_without_panicking() {
        assert_eq!(round_up_1(s(-0.25)), s(-0.2));
        assert_eq!(round_up_1(s(-0.01)), s(0.0));
    }

    #[test]
    fn fmt1_formats_fixed_one_decimal() {
        assert_eq!(fmt1(s(7.01)), "7.1");
        assert_eq!(fmt1(s(8.0)), "8.0");
        assert_eq!(with_separator(&fmt1(s(7.01)), ','), "7,1");
    }

    #[test]
    fn recovery_tie_replaces_second_slot() {
        assert_eq!(
            apply_recoveries(s(6.0), s(6.0), s(8.0), s(0.0), s(0.0), s(0.0)),
            [6.0, 8.0, 0.0, 0.0]
        );
        assert_eq!(
            apply_recoveries(s(0.0), s(0.0), s(0.0), s(7.0), s(7.0), s(9.0)),
            [0.0, 0.0, 7.0, 9.0]
        );
    }

    #[test]
    fn recovery_replaces_lower_only_when_higher() {
        assert_eq!(
            apply_recoveries(s(4.0), s(6.0), s(5.0), s(0.0), s(0.0), s(0.0)),
            [5.0, 6.0, 0.0, 0.0]
        );
        assert_eq!(
            apply_recoveries(s(4.0), s(6.0), s(3.0), s(0.0), s(0.0), s(0.0)),
            [4.0, 6.0, 0.0, 0.0]
        );
        assert_eq!(
            apply_recoveries(s(7.0), s(2.0), s(6.0), s(3.0), s(8.0), s(5.0)),
            [7.0, 6.0, 5.0, 8.0]
        );
    }

    #[test]
    fn recovery_missing_values_count_as_zero() {
        assert_eq!(
            apply_recoveries(None, s(6.0), s(5.0), None, None, s(4.0)),
            [5.0, 6.0, 0.0, 4.0]
        );
        assert_eq!(apply_recoveries(None, None, None, None, None, None), [0.0; 4]);
    }

    #[test]
    fn totals_use_fixed_weights() {
        assert_eq!(
            compute_totals(s(10.0), s(10.0), s(0.0), s(10.0), s(10.0), s(0.0)),
            Totals { total: 100.0, media: 10.0 }
        );
        assert_eq!(
            compute_totals(s(0.0), s(0.0), s(0.0), s(0.0), s(0.0), s(0.0)),
            Totals { total: 0.0, media: 0.0 }
        );
        assert_eq!(
            compute_totals(None, None, None, None, None, None),
            Totals { total: 0.0, media: 0.0 }
        );
        // 6*2 + 7*3 + 8*2 + 5.5*3 = 65.5 -> media 6.55 -> 6.6
        assert_eq!(
            compute_totals(s(6.0), s(7.0), None, s(8.0), s(5.5), None),
            Totals { total: 65.5, media: 6.6 }
        );
    }

    #[test]
    fn overflowing_totals_stay_infinite() {
        let totals = compute_totals(s(1e308), s(1e308), None, s(1e308), s(1e308), None);
        assert!(totals.total.is_infinite() && totals.total > 0.0);
        assert!(totals.media.is_infinite() && totals.media > 0.0);

        let set = ScoreSet {
            b1: s(1e308),
            b2: s(1e308),
            ..ScoreSet::default()
        };
        assert!(!final_row(&set, ',').below_passing);
    }

    #[test]
    fn boundary_media_of_five_passes() {
        let set = ScoreSet {
            b1: s(5.0),
            b2: s(5.0),
            b3: s(5.0),
            b4: s(5.0),
            ..ScoreSet::default()
        };
        let row = final_row(&set, ',');
        assert_eq!(row.media, 5.0);
        assert!(!row.below_passing);
        assert!(!row.incomplete);
        assert_eq!(row.media_text, "5,0");
    }

    #[test]
    fn final_row_flags_missing_bimesters() {
        let set = ScoreSet {
            b1: s(3.0),
            b2: s(4.0),
            ..ScoreSet::default()
        };
        let row = final_row(&set, ',');
        assert!(row.incomplete);
        assert!(row.below_passing);
        assert_eq!(row.total_text, "18,0");

        let empty = final_row(&ScoreSet::default(), ',');
        assert!(empty.incomplete);
        assert!(!empty.below_passing);
    }

    #[test]
    fn field_names_parse_case_insensitively() {
        assert_eq!(ScoreField::parse("B3"), Some(ScoreField::B3));
        assert_eq!(ScoreField::parse(" r2 "), Some(ScoreField::R2));
        assert_eq!(ScoreField::parse("b5"), None);
    }

    proptest! {
        #[test]
        fn round_up_never_lowers_and_keeps_one_decimal(x in -1.0e6f64..1.0e6) {
            let r = round_up_1(Some(x)).unwrap();
            prop_assert!(r >= x);
            prop_assert!(r - x <= 0.1 + 1e-9);
            prop_assert_eq!((r * 10.0).round() / 10.0, r);
        }

        #[test]
        fn round_up_hundredths_never_lower(k in -100_000i64..100_000) {
            let x = k as f64 / 100.0;
            prop_assert!(round_up_1(Some(x)).unwrap() >= x);
        }

        #[test]
        fn round_up_is_idempotent(x in -1.0e6f64..1.0e6) {
            let once = round_up_1(Some(x));
            prop_assert_eq!(round_up_1(once), once);
        }
    }
}
