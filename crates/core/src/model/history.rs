use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One submitted answer, as appended to the answers history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    /// 1-based question number.
    pub question_number: u32,
    pub answer: String,
    #[serde(rename = "timeSpent", alias = "timeSpentSeconds", default)]
    pub time_spent_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

impl AnswerRecord {
    #[must_use]
    pub fn new(
        question_index: u32,
        answer: impl Into<String>,
        time_spent_seconds: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            question_number: question_index.saturating_add(1),
            answer: answer.into(),
            time_spent_seconds,
            timestamp,
        }
    }
}

/// Ordered list of every submitted answer.
///
/// Lookups by question return the oldest matching record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerHistory(Vec<AnswerRecord>);

impl AnswerHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: AnswerRecord) {
        self.0.push(record);
    }

    #[must_use]
    pub fn records(&self) -> &[AnswerRecord] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First record for the zero-based `question_index`.
    #[must_use]
    pub fn find(&self, question_index: u32) -> Option<&AnswerRecord> {
        let number = question_index.saturating_add(1);
        self.0.iter().find(|r| r.question_number == number)
    }

    /// Seconds spent on `question_index`, zero when it was never recorded.
    #[must_use]
    pub fn time_spent(&self, question_index: u32) -> u64 {
        self.find(question_index)
            .map_or(0, |record| record.time_spent_seconds)
    }
}

impl FromIterator<AnswerRecord> for AnswerHistory {
    fn from_iter<I: IntoIterator<Item = AnswerRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn time_lookup_uses_first_match() {
        let now = fixed_now();
        let history: AnswerHistory = [
            AnswerRecord::new(0, "a", 30, now),
            AnswerRecord::new(1, "b", 45, now),
            AnswerRecord::new(0, "c", 99, now),
        ]
        .into_iter()
        .collect();

        assert_eq!(history.time_spent(0), 30);
        assert_eq!(history.time_spent(1), 45);
        assert_eq!(history.time_spent(7), 0);
    }

    #[test]
    fn reads_browser_records() {
        let json = r#"[
            {"questionNumber": 2, "answer": "b", "timeSpent": 41, "timestamp": "2024-05-01T10:00:00.000Z"}
        ]"#;
        let history: AnswerHistory = serde_json::from_str(json).unwrap();

        assert_eq!(history.len(), 1);
        assert_eq!(history.find(1).unwrap().answer, "b");
        assert_eq!(history.time_spent(1), 41);
    }
}
