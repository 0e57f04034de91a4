use crate::calc::{ScoreField, ScoreSet};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScoreKey {
    pub student_id: String,
    pub field: ScoreField,
}

impl ScoreKey {
    pub fn new(student_id: impl Into<String>, field: ScoreField) -> Self {
        Self {
            student_id: student_id.into(),
            field,
        }
    }
}

/// Committed scores of the grade table currently being edited. In memory only.
#[derive(Debug, Default)]
pub struct ScoreSheet {
    values: BTreeMap<ScoreKey, f64>,
}

impl ScoreSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, or removes the entry when `value` is `None`.
    pub fn set(&mut self, key: ScoreKey, value: Option<f64>) {
        match value {
            Some(v) => {
                self.values.insert(key, v);
            }
            None => {
                self.values.remove(&key);
            }
        }
    }

    pub fn get(&self, key: &ScoreKey) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn score_set(&self, student_id: &str) -> ScoreSet {
        let mut set = ScoreSet::default();
        for field in ScoreField::ALL {
            set.set(field, self.get(&ScoreKey::new(student_id, field)));
        }
        set
    }

    pub fn students(&self) -> Vec<String> {
        self.values
            .keys()
            .map(|k| k.student_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Returns the number of removed entries.
    pub fn clear_student(&mut self, student_id: &str) -> usize {
        let before = self.values.len();
        self.values.retain(|k, _| k.student_id != student_id);
        before - self.values.len()
    }

    pub fn clear(&mut self) -> usize {
        let n = self.values.len();
        self.values.clear();
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_do_not_collide_on_underscores() {
        let mut sheet = ScoreSheet::new();
        sheet.set(ScoreKey::new("12_b1", ScoreField::B2), Some(7.0));
        sheet.set(ScoreKey::new("12", ScoreField::B1), Some(3.0));
        assert_eq!(sheet.get(&ScoreKey::new("12_b1", ScoreField::B2)), Some(7.0));
        assert_eq!(sheet.get(&ScoreKey::new("12", ScoreField::B1)), Some(3.0));
        assert_eq!(sheet.students(), vec!["12".to_string(), "12_b1".to_string()]);
    }

    #[test]
    fn score_set_keeps_missing_distinct_from_zero() {
        let mut sheet = ScoreSheet::new();
        sheet.set(ScoreKey::new("s1", ScoreField::B1), Some(0.0));
        sheet.set(ScoreKey::new("s1", ScoreField::R1), Some(6.0));
        let set = sheet.score_set("s1");
        assert_eq!(set.b1, Some(0.0));
        assert_eq!(set.b2, None);
        assert_eq!(set.r1, Some(6.0));
        assert!(sheet.score_set("other").is_empty());
    }

    #[test]
    fn setting_none_removes_and_clear_counts() {
        let mut sheet = ScoreSheet::new();
        sheet.set(ScoreKey::new("s1", ScoreField::B1), Some(5.0));
        sheet.set(ScoreKey::new("s1", ScoreField::B2), Some(6.0));
        sheet.set(ScoreKey::new("s2", ScoreField::B1), Some(4.0));
        sheet.set(ScoreKey::new("s1", ScoreField::B2), None);
        assert_eq!(sheet.clear_student("s1"), 1);
        assert_eq!(sheet.students(), vec!["s2".to_string()]);
        assert_eq!(sheet.clear(), 1);
        assert!(sheet.students().is_empty());
    }
}
