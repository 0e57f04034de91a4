use crate::calc::{fmt1, with_separator, ScoreSet, PASSING_MEDIA};
use crate::initial::to_fixed_1;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct RiskStudent {
    pub student_id: String,
    pub name: String,
    pub numero_chamada: Option<i64>,
    pub scores: ScoreSet,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskEntry {
    pub student_id: String,
    pub name: String,
    pub numero_chamada: i64,
    pub media: f64,
    pub media_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReport {
    pub total_students: usize,
    pub at_risk_count: usize,
    pub percentual: f64,
    pub percentual_text: String,
    pub at_risk: Vec<RiskEntry>,
}

/// A student with at least one entered score whose average is below passing.
pub fn is_at_risk(scores: &ScoreSet) -> bool {
    !scores.is_empty() && scores.totals().media < PASSING_MEDIA
}

pub fn build_risk_report(students: &[RiskStudent], separator: char) -> RiskReport {
    let mut at_risk: Vec<RiskEntry> = students
        .iter()
        .enumerate()
        .filter(|(_, s)| is_at_risk(&s.scores))
        .map(|(idx, s)| {
            let media = s.scores.totals().media;
            RiskEntry {
                student_id: s.student_id.clone(),
                name: s.name.clone(),
                numero_chamada: s.numero_chamada.unwrap_or(idx as i64 + 1),
                media,
                media_text: with_separator(&fmt1(Some(media)), separator),
            }
        })
        .collect();
    at_risk.sort_by_key(|e| e.numero_chamada);

    let total_students = students.len();
    let percentual = if total_students > 0 {
        at_risk.len() as f64 / total_students as f64 * 100.0
    } else {
        0.0
    };

    RiskReport {
        total_students,
        at_risk_count: at_risk.len(),
        percentual,
        percentual_text: with_separator(&format!("{:.1}", to_fixed_1(percentual)), separator),
        at_risk,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str, chamada: Option<i64>, b: [Option<f64>; 4]) -> RiskStudent {
        RiskStudent {
            student_id: id.to_string(),
            name: format!("Aluno {}", id),
            numero_chamada: chamada,
            scores: ScoreSet {
                b1: b[0],
                b2: b[1],
                b3: b[2],
                b4: b[3],
                r1: None,
                r2: None,
            },
        }
    }

    #[test]
    fn media_of_exactly_five_is_not_at_risk() {
        let s = student("a", None, [Some(5.0); 4]);
        assert!(!is_at_risk(&s.scores));
    }

    #[test]
    fn students_without_scores_are_excluded() {
        let s = student("a", None, [None; 4]);
        assert_eq!(s.scores.totals().media, 0.0);
        assert!(!is_at_risk(&s.scores));
    }

    #[test]
    fn single_low_score_counts() {
        let s = student("a", None, [Some(9.0), None, None, None]);
        assert!(is_at_risk(&s.scores));
    }

    #[test]
    fn report_orders_by_call_number_and_formats_percent() {
        let students = vec![
            student("a", Some(7), [Some(2.0); 4]),
            student("b", None, [Some(8.0); 4]),
            student("c", None, [Some(4.0); 4]),
            student("d", None, [None; 4]),
            student("e", Some(1), [Some(3.0), Some(3.0), None, None]),
            student("f", None, [Some(6.0); 4]),
        ];
        let report = build_risk_report(&students, ',');
        assert_eq!(report.total_students, 6);
        assert_eq!(report.at_risk_count, 3);
        let ids: Vec<&str> = report.at_risk.iter().map(|e| e.student_id.as_str()).collect();
        assert_eq!(ids, vec!["e", "c", "a"]);
        assert_eq!(report.at_risk[1].numero_chamada, 3);
        assert_eq!(report.percentual_text, "50,0");
        assert_eq!(report.at_risk[0].media_text, "1,5");
    }

    #[test]
    fn percent_rounds_to_one_decimal() {
        let students = vec![
            student("a", None, [Some(1.0); 4]),
            student("b", None, [Some(9.0); 4]),
            student("c", None, [Some(9.0); 4]),
        ];
        let report = build_risk_report(&students, ',');
        assert_eq!(report.percentual_text, "33,3");
    }

    #[test]
    fn empty_class_reports_zero_percent() {
        let report = build_risk_report(&[], ',');
        assert_eq!(report.percentual, 0.0);
        assert_eq!(report.percentual_text, "0,0");
        assert!(report.at_risk.is_empty());
    }
}
