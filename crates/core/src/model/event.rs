use serde::Deserialize;

use crate::model::grade::{Attempts, GradeResult};

/// Subject bucket used when an event arrives without a subject.
pub const UNKNOWN_SUBJECT: &str = "Unknown";

//
// ─── GRADING EVENT ────────────────────────────────────────────────────────────
//

/// One grading action on an already answered question.
///
/// `previous_result` carries the verdict being replaced. When it is `None`
/// this is the first grading of the question and bucket totals grow by one.
///
/// `result` is `None` only when the verdict label could not be recognized at
/// the input boundary. Such an event still counts toward totals and time but
/// moves no verdict counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradingEvent {
    pub subject: String,
    pub chapter: String,
    pub question_index: u32,
    pub result: Option<GradeResult>,
    pub previous_result: Option<GradeResult>,
    pub attempts: Attempts,
    pub time_spent_seconds: u64,
}

impl GradingEvent {
    /// First-time grading with no time spent and a single attempt.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        chapter: impl Into<String>,
        question_index: u32,
        result: GradeResult,
    ) -> Self {
        Self {
            subject: subject.into(),
            chapter: chapter.into(),
            question_index,
            result: Some(result),
            previous_result: None,
            attempts: Attempts::One,
            time_spent_seconds: 0,
        }
    }

    /// Mark this event as a correction of an earlier verdict.
    #[must_use]
    pub fn replacing(mut self, previous: GradeResult) -> Self {
        self.previous_result = Some(previous);
        self
    }

    #[must_use]
    pub fn with_time_spent(mut self, seconds: u64) -> Self {
        self.time_spent_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_attempts(mut self, attempts: Attempts) -> Self {
        self.attempts = attempts;
        self
    }

    /// True when this event re-grades a question that already had a verdict.
    #[must_use]
    pub fn is_regrade(&self) -> bool {
        self.previous_result.is_some()
    }
}

//
// ─── DRAFT ────────────────────────────────────────────────────────────────────
//

/// Loosely typed grading input as produced by a front end.
///
/// Every field is optional. `normalize` applies the defaults once so the
/// accumulation code only ever sees a fully populated `GradingEvent`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GradingEventDraft {
    pub subject: Option<String>,
    pub chapter: Option<String>,
    pub question_index: Option<u32>,
    pub result: Option<String>,
    pub previous_result: Option<String>,
    pub attempts: Option<String>,
    #[serde(alias = "timeSpentSeconds")]
    pub time_spent: Option<u64>,
}

impl GradingEventDraft {
    /// Apply defaults and convert into a `GradingEvent`.
    ///
    /// Returns `None` when no result was supplied at all: there is nothing to
    /// record. An unrecognized result label yields an event with
    /// `result: None`. An unrecognized previous label is treated as absent.
    #[must_use]
    pub fn normalize(self) -> Option<GradingEvent> {
        let raw_result = self.result.filter(|r| !r.trim().is_empty())?;

        let subject = self
            .subject
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN_SUBJECT.to_owned());

        Some(GradingEvent {
            subject,
            chapter: self.chapter.map(|c| c.trim().to_owned()).unwrap_or_default(),
            question_index: self.question_index.unwrap_or(0),
            result: raw_result.trim().parse().ok(),
            previous_result: self
                .previous_result
                .and_then(|p| p.trim().parse().ok()),
            attempts: self
                .attempts
                .and_then(|a| a.trim().parse().ok())
                .unwrap_or_default(),
            time_spent_seconds: self.time_spent.unwrap_or(0),
        })
    }
}
