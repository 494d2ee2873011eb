use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{GradeResult, GradingEvent};
use crate::stats::metrics;

//
// ─── COUNTERS ─────────────────────────────────────────────────────────────────
//

/// Verdict and time counters shared by a bucket and each of its subjects.
///
/// Field names follow the stored JSON layout (`totalTime`), and any missing
/// field reads back as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Counters {
    /// Distinct questions graded at least once.
    pub total: u64,
    pub correct: u64,
    pub incorrect: u64,
    pub discuss: u64,
    #[serde(rename = "totalTime", alias = "totalTimeSeconds")]
    pub total_time_seconds: u64,
}

impl Counters {
    /// Current count for one verdict.
    #[must_use]
    pub fn count(&self, result: GradeResult) -> u64 {
        match result {
            GradeResult::Correct => self.correct,
            GradeResult::Incorrect => self.incorrect,
            GradeResult::Discuss => self.discuss,
        }
    }

    fn count_mut(&mut self, result: GradeResult) -> &mut u64 {
        match result {
            GradeResult::Correct => &mut self.correct,
            GradeResult::Incorrect => &mut self.incorrect,
            GradeResult::Discuss => &mut self.discuss,
        }
    }

    /// Questions holding a verdict right now (`correct + incorrect + discuss`).
    #[must_use]
    pub fn answered(&self) -> u64 {
        self.correct
            .saturating_add(self.incorrect)
            .saturating_add(self.discuss)
    }

    /// Apply one grading action.
    ///
    /// A re-grade removes the replaced verdict and leaves `total` alone; a
    /// first grading grows `total`. Time is added on every call, re-grades
    /// included.
    pub fn apply(&mut self, event: &GradingEvent) {
        match event.previous_result {
            Some(previous) => {
                let slot = self.count_mut(previous);
                *slot = slot.saturating_sub(1);
            }
            None => self.total = self.total.saturating_add(1),
        }

        if let Some(result) = event.result {
            let slot = self.count_mut(result);
            *slot = slot.saturating_add(1);
        }

        self.total_time_seconds = self
            .total_time_seconds
            .saturating_add(event.time_spent_seconds);
    }

    /// Add another set of counters into this one.
    pub fn merge(&mut self, other: &Counters) {
        self.total = self.total.saturating_add(other.total);
        self.correct = self.correct.saturating_add(other.correct);
        self.incorrect = self.incorrect.saturating_add(other.incorrect);
        self.discuss = self.discuss.saturating_add(other.discuss);
        self.total_time_seconds = self
            .total_time_seconds
            .saturating_add(other.total_time_seconds);
    }

    #[must_use]
    pub fn accuracy(&self) -> u32 {
        metrics::accuracy(self)
    }

    #[must_use]
    pub fn average_time_minutes(&self) -> f64 {
        metrics::average_time_minutes(self)
    }
}

//
// ─── ACCUMULATOR ──────────────────────────────────────────────────────────────
//

/// Counters for one bucket (a day, a week or a chapter) plus a per-subject
/// breakdown kept in lockstep with the bucket level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsAccumulator {
    #[serde(flatten)]
    pub counters: Counters,
    #[serde(rename = "bySubject", default)]
    pub by_subject: BTreeMap<String, Counters>,
}

impl StatsAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a grading action at bucket level and under the event's subject.
    pub fn apply(&mut self, event: &GradingEvent) {
        self.counters.apply(event);
        self.by_subject
            .entry(event.subject.clone())
            .or_default()
            .apply(event);
    }

    /// Fold another accumulator into this one, subject by subject.
    pub fn merge(&mut self, other: &StatsAccumulator) {
        self.counters.merge(&other.counters);
        for (subject, counters) in &other.by_subject {
            self.by_subject
                .entry(subject.clone())
                .or_default()
                .merge(counters);
        }
    }

    /// Counters for one subject, zeroed when the subject never appeared.
    #[must_use]
    pub fn subject(&self, subject: &str) -> Counters {
        self.by_subject.get(subject).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counters == Counters::default() && self.by_subject.is_empty()
    }

    #[must_use]
    pub fn accuracy(&self) -> u32 {
        self.counters.accuracy()
    }

    #[must_use]
    pub fn average_time_minutes(&self) -> f64 {
        self.counters.average_time_minutes()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn graded(index: u32, result: GradeResult, seconds: u64) -> GradingEvent {
        GradingEvent::new("Math", "Algebra", index, result).with_time_spent(seconds)
    }

    #[test]
    fn first_gradings_grow_total() {
        let mut stats = StatsAccumulator::new();
        stats.apply(&graded(0, GradeResult::Correct, 10));
        stats.apply(&graded(1, GradeResult::Discuss, 5));

        assert_eq!(stats.counters.total, 2);
        assert_eq!(stats.counters.correct, 1);
        assert_eq!(stats.counters.discuss, 1);
        assert_eq!(stats.counters.total_time_seconds, 15);
    }

    #[test]
    fn regrade_swaps_verdict_without_touching_total() {
        let mut stats = StatsAccumulator::new();
        stats.apply(&graded(5, GradeResult::Incorrect, 0));
        stats.apply(&graded(5, GradeResult::Correct, 0).replacing(GradeResult::Incorrect));

        let expected = Counters {
            total: 1,
            correct: 1,
            incorrect: 0,
            discuss: 0,
            total_time_seconds: 0,
        };
        assert_eq!(stats.counters, expected);
        assert_eq!(stats.subject("Math"), expected);
    }

    #[test]
    fn regrade_adds_time_again() {
        let mut stats = StatsAccumulator::new();
        stats.apply(&graded(0, GradeResult::Incorrect, 30));
        stats.apply(&graded(0, GradeResult::Correct, 30).replacing(GradeResult::Incorrect));

        assert_eq!(stats.counters.total_time_seconds, 60);
    }

    #[test]
    fn stale_previous_never_goes_negative() {
        let mut stats = StatsAccumulator::new();
        stats.apply(&graded(0, GradeResult::Correct, 0).replacing(GradeResult::Discuss));

        assert_eq!(stats.counters.discuss, 0);
        assert_eq!(stats.counters.correct, 1);
        assert_eq!(stats.counters.total, 0);
    }

    #[test]
    fn unrecognized_result_still_counts_total_and_time() {
        let mut event = graded(0, GradeResult::Correct, 12);
        event.result = None;

        let mut stats = StatsAccumulator::new();
        stats.apply(&event);

        assert_eq!(stats.counters.total, 1);
        assert_eq!(stats.counters.answered(), 0);
        assert_eq!(stats.counters.total_time_seconds, 12);
    }

    #[test]
    fn subjects_are_tracked_separately() {
        let mut stats = StatsAccumulator::new();
        stats.apply(&graded(0, GradeResult::Correct, 10));
        stats.apply(&GradingEvent::new("Physics", "Waves", 0, GradeResult::Incorrect));

        assert_eq!(stats.counters.total, 2);
        assert_eq!(stats.subject("Math").correct, 1);
        assert_eq!(stats.subject("Physics").incorrect, 1);
        assert_eq!(stats.subject("Chemistry"), Counters::default());

        let summed: u64 = stats.by_subject.values().map(|c| c.total).sum();
        assert_eq!(summed, stats.counters.total);
    }

    #[test]
    fn reads_browser_layout_with_missing_fields() {
        let json = r#"{
            "total": 3,
            "correct": 2,
            "totalTime": 95,
            "bySubject": { "Math": { "total": 3, "correct": 2, "incorrect": 1 } }
        }"#;
        let stats: StatsAccumulator = serde_json::from_str(json).unwrap();

        assert_eq!(stats.counters.total, 3);
        assert_eq!(stats.counters.incorrect, 0);
        assert_eq!(stats.counters.total_time_seconds, 95);
        assert_eq!(stats.subject("Math").incorrect, 1);
        assert_eq!(stats.subject("Math").total_time_seconds, 0);
    }

    #[test]
    fn writes_browser_layout() {
        let mut stats = StatsAccumulator::new();
        stats.apply(&graded(0, GradeResult::Correct, 30));
        let value = serde_json::to_value(&stats).unwrap();

        assert_eq!(value["total"], 1);
        assert_eq!(value["totalTime"], 30);
        assert_eq!(value["bySubject"]["Math"]["correct"], 1);
    }

    #[test]
    fn merge_sums_bucket_and_subjects() {
        let mut a = StatsAccumulator::new();
        a.apply(&graded(0, GradeResult::Correct, 10));
        let mut b = StatsAccumulator::new();
        b.apply(&graded(1, GradeResult::Incorrect, 20));

        a.merge(&b);
        assert_eq!(a.counters.total, 2);
        assert_eq!(a.subject("Math").total_time_seconds, 30);
    }
}
