use crate::stats::accumulator::{Counters, StatsAccumulator};
use crate::stats::metrics;

/// Totals across a set of chapter buckets.
///
/// Unlike per-bucket accuracy, the overview divides by every answered
/// question, discussed ones included.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChapterOverview {
    pub chapters: usize,
    pub total_questions: u64,
    pub accuracy: u32,
    pub average_time_minutes: f64,
}

impl ChapterOverview {
    #[must_use]
    pub fn from_buckets<'a>(buckets: impl IntoIterator<Item = &'a StatsAccumulator>) -> Self {
        let mut chapters = 0_usize;
        let mut sum = Counters::default();
        for stats in buckets {
            chapters += 1;
            sum.merge(&stats.counters);
        }

        let answered = sum.answered();
        Self {
            chapters,
            total_questions: sum.total,
            accuracy: metrics::percentage(sum.correct, answered),
            average_time_minutes: metrics::minutes_per_item(sum.total_time_seconds, answered),
        }
    }
}
