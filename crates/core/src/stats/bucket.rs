use std::fmt;

use chrono::NaiveDate;

use crate::calendar;

/// The three aggregation dimensions every grading event feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Daily,
    Weekly,
    Chapter,
}

impl Dimension {
    pub const ALL: [Self; 3] = [Self::Daily, Self::Weekly, Self::Chapter];

    /// Top-level store key holding this dimension's mapping.
    #[must_use]
    pub fn store_key(self) -> &'static str {
        match self {
            Dimension::Daily => "dailyStats",
            Dimension::Weekly => "weeklyStats",
            Dimension::Chapter => "chapterStats",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dimension::Daily => "daily",
            Dimension::Weekly => "weekly",
            Dimension::Chapter => "chapter",
        })
    }
}

//
// ─── CHAPTER KEY ──────────────────────────────────────────────────────────────
//

/// Normalized `subject_chapter` identifier of a chapter bucket.
///
/// Keys are lowercased so lookups ignore case; display names come from the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChapterKey(String);

impl ChapterKey {
    #[must_use]
    pub fn new(subject: &str, chapter: &str) -> Self {
        Self(format!("{}_{}", subject.trim(), chapter.trim()).to_lowercase())
    }

    /// Normalize an already composed key.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text before the first `_`.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.0.split_once('_').map_or(self.0.as_str(), |(s, _)| s)
    }

    /// Text after the first `_`, empty when there is none.
    #[must_use]
    pub fn chapter(&self) -> &str {
        self.0.split_once('_').map_or("", |(_, c)| c)
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ChapterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//
// ─── BUCKET KEY ───────────────────────────────────────────────────────────────
//

/// Address of one bucket within one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BucketKey {
    Day(NaiveDate),
    Week(u32),
    Chapter(ChapterKey),
}

impl BucketKey {
    #[must_use]
    pub fn dimension(&self) -> Dimension {
        match self {
            BucketKey::Day(_) => Dimension::Daily,
            BucketKey::Week(_) => Dimension::Weekly,
            BucketKey::Chapter(_) => Dimension::Chapter,
        }
    }

    /// Parse a raw key string for the given dimension.
    ///
    /// Returns `None` when a day is not `YYYY-MM-DD` or a week is not a number.
    #[must_use]
    pub fn parse(dimension: Dimension, raw: &str) -> Option<Self> {
        match dimension {
            Dimension::Daily => calendar::parse_day(raw).map(BucketKey::Day),
            Dimension::Weekly => raw.trim().parse().ok().map(BucketKey::Week),
            Dimension::Chapter => Some(BucketKey::Chapter(ChapterKey::parse(raw))),
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketKey::Day(day) => f.write_str(&calendar::format_day(*day)),
            BucketKey::Week(week) => write!(f, "{week}"),
            BucketKey::Chapter(key) => f.write_str(key.as_str()),
        }
    }
}
