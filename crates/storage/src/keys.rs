//! Store key layout shared with the browser version of the tracker.

use quiz_core::stats::Dimension;

pub const DAILY_STATS: &str = "dailyStats";
pub const WEEKLY_STATS: &str = "weeklyStats";
pub const CHAPTER_STATS: &str = "chapterStats";
pub const ANSWERS_HISTORY: &str = "answersHistory";

#[must_use]
pub fn stats_key(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Daily => DAILY_STATS,
        Dimension::Weekly => WEEKLY_STATS,
        Dimension::Chapter => CHAPTER_STATS,
    }
}

/// Saved quiz progress of one chapter: `quiz_<subject>_<chapter>`, lowercased.
#[must_use]
pub fn quiz_key(subject: &str, chapter: &str) -> String {
    format!("quiz_{}_{}", subject.trim(), chapter.trim()).to_lowercase()
}

/// Saved answer checks of one chapter: `answerChecks_<subject>_<chapter>`, lowercased.
#[must_use]
pub fn answer_checks_key(subject: &str, chapter: &str) -> String {
    format!("answerChecks_{}_{}", subject.trim(), chapter.trim()).to_lowercase()
}
