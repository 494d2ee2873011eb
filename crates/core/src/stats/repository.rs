use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::calendar;
use crate::model::GradingEvent;
use crate::stats::accumulator::StatsAccumulator;
use crate::stats::bucket::{BucketKey, ChapterKey, Dimension};
use crate::stats::overview::ChapterOverview;

/// Day key (`YYYY-MM-DD`) → accumulator, as stored under `dailyStats`.
pub type DailyStats = BTreeMap<String, StatsAccumulator>;
/// ISO week number → accumulator, as stored under `weeklyStats`.
pub type WeeklyStats = BTreeMap<u32, StatsAccumulator>;
/// Lowercased chapter key → accumulator, as stored under `chapterStats`.
pub type ChapterStats = BTreeMap<String, StatsAccumulator>;

/// Buckets touched by one `record` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedBuckets {
    pub day: String,
    pub week: u32,
    pub chapter: ChapterKey,
}

/// In-memory owner of the daily, weekly and chapter mappings.
///
/// Load it from the store, `record` events, then flush every mapping back.
/// The repository performs no deduplication: recording the same grading
/// change twice counts it twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsRepository {
    daily: DailyStats,
    weekly: WeeklyStats,
    chapter: ChapterStats,
}

impl StatsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from persisted mappings.
    ///
    /// Chapter keys are normalized; keys differing only by case are merged.
    #[must_use]
    pub fn from_mappings(daily: DailyStats, weekly: WeeklyStats, chapter: ChapterStats) -> Self {
        let mut normalized = ChapterStats::new();
        for (raw, stats) in chapter {
            let key = ChapterKey::parse(&raw).into_string();
            match normalized.get_mut(&key) {
                Some(existing) => existing.merge(&stats),
                None => {
                    normalized.insert(key, stats);
                }
            }
        }

        Self {
            daily,
            weekly,
            chapter: normalized,
        }
    }

    /// Apply one grading event to its day, week and chapter buckets.
    ///
    /// Buckets are created zeroed on first use.
    pub fn record(&mut self, event: &GradingEvent, now: DateTime<Utc>) -> RecordedBuckets {
        let buckets = RecordedBuckets {
            day: calendar::day_key(now),
            week: calendar::week_key(now),
            chapter: ChapterKey::new(&event.subject, &event.chapter),
        };

        self.daily
            .entry(buckets.day.clone())
            .or_default()
            .apply(event);
        self.weekly.entry(buckets.week).or_default().apply(event);
        self.chapter
            .entry(buckets.chapter.as_str().to_owned())
            .or_default()
            .apply(event);

        buckets
    }

    /// Read one bucket, zeroed when it does not exist.
    #[must_use]
    pub fn get(&self, key: &BucketKey) -> StatsAccumulator {
        let found = match key {
            BucketKey::Day(day) => self.daily.get(&calendar::format_day(*day)),
            BucketKey::Week(week) => self.weekly.get(week),
            BucketKey::Chapter(chapter) => self.chapter.get(chapter.as_str()),
        };
        found.cloned().unwrap_or_default()
    }

    /// Read one bucket by raw key string; unparsable keys read as empty.
    #[must_use]
    pub fn get_raw(&self, dimension: Dimension, raw: &str) -> StatsAccumulator {
        BucketKey::parse(dimension, raw)
            .map(|key| self.get(&key))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn day(&self, date: NaiveDate) -> StatsAccumulator {
        self.get(&BucketKey::Day(date))
    }

    #[must_use]
    pub fn week(&self, week: u32) -> StatsAccumulator {
        self.get(&BucketKey::Week(week))
    }

    #[must_use]
    pub fn chapter(&self, subject: &str, chapter: &str) -> StatsAccumulator {
        self.get(&BucketKey::Chapter(ChapterKey::new(subject, chapter)))
    }

    #[must_use]
    pub fn daily(&self) -> &DailyStats {
        &self.daily
    }

    #[must_use]
    pub fn weekly(&self) -> &WeeklyStats {
        &self.weekly
    }

    #[must_use]
    pub fn chapters(&self) -> &ChapterStats {
        &self.chapter
    }

    /// Chapter buckets whose subject matches `subject` (any case), or all of
    /// them when no filter is given.
    pub fn chapters_for<'a>(
        &'a self,
        subject: Option<&'a str>,
    ) -> impl Iterator<Item = (ChapterKey, &'a StatsAccumulator)> + 'a {
        let filter = subject.map(|s| s.trim().to_lowercase());
        self.chapter.iter().filter_map(move |(raw, stats)| {
            let key = ChapterKey::parse(raw);
            match &filter {
                Some(wanted) if key.subject() != wanted => None,
                _ => Some((key, stats)),
            }
        })
    }

    /// Distinct subjects appearing in chapter keys, sorted.
    #[must_use]
    pub fn subjects(&self) -> Vec<String> {
        let mut subjects: Vec<String> = self
            .chapter
            .keys()
            .map(|raw| ChapterKey::parse(raw).subject().to_owned())
            .collect();
        subjects.sort();
        subjects.dedup();
        subjects
    }

    /// Totals across the chapters matching `subject`.
    #[must_use]
    pub fn chapter_overview(&self, subject: Option<&str>) -> ChapterOverview {
        ChapterOverview::from_buckets(self.chapters_for(subject).map(|(_, stats)| stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GradeResult;
    use crate::stats::Counters;
    use crate::time::fixed_now;

    fn algebra(index: u32, result: GradeResult, seconds: u64) -> GradingEvent {
        GradingEvent::new("Math", "Algebra", index, result).with_time_spent(seconds)
    }

    #[test]
    fn record_fans_out_to_all_dimensions() {
        let mut repo = StatsRepository::new();
        let now = fixed_now();
        let buckets = repo.record(&algebra(0, GradeResult::Correct, 30), now);

        assert_eq!(buckets.day, "2023-11-14");
        assert_eq!(buckets.week, 46);
        assert_eq!(buckets.chapter.as_str(), "math_algebra");

        for dimension in Dimension::ALL {
            let raw = match dimension {
                Dimension::Daily => buckets.day.clone(),
                Dimension::Weekly => buckets.week.to_string(),
                Dimension::Chapter => buckets.chapter.to_string(),
            };
            assert_eq!(repo.get_raw(dimension, &raw).counters.correct, 1);
        }
    }

    #[test]
    fn algebra_scenario_matches_expected_totals() {
        let mut repo = StatsRepository::new();
        let now = fixed_now();
        repo.record(&algebra(0, GradeResult::Correct, 30), now);
        repo.record(&algebra(1, GradeResult::Incorrect, 45), now);
        repo.record(&algebra(2, GradeResult::Correct, 20), now);

        let stats = repo.get_raw(Dimension::Chapter, "Math_algebra");
        assert_eq!(
            stats.counters,
            Counters {
                total: 3,
                correct: 2,
                incorrect: 1,
                discuss: 0,
                total_time_seconds: 95,
            }
        );
        assert_eq!(stats.accuracy(), 67);
        assert!((stats.average_time_minutes() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn correction_keeps_dimensions_consistent() {
        let mut repo = StatsRepository::new();
        let now = fixed_now();
        repo.record(&algebra(5, GradeResult::Incorrect, 0), now);
        repo.record(
            &algebra(5, GradeResult::Correct, 0).replacing(GradeResult::Incorrect),
            now,
        );

        let day = repo.day(now.date_naive());
        let week = repo.week(calendar::week_key(now));
        let chapter = repo.chapter("math", "ALGEBRA");
        assert_eq!(day, week);
        assert_eq!(week, chapter);
        assert_eq!(chapter.counters.total, 1);
        assert_eq!(chapter.counters.correct, 1);
        assert_eq!(chapter.counters.incorrect, 0);
    }

    #[test]
    fn missing_buckets_read_as_zero() {
        let repo = StatsRepository::new();
        assert!(repo.week(7).is_empty());
        assert!(repo.get_raw(Dimension::Daily, "not-a-date").is_empty());
    }

    #[test]
    fn loading_merges_chapter_keys_differing_by_case() {
        let mut upper = StatsAccumulator::new();
        upper.apply(&algebra(0, GradeResult::Correct, 10));
        let mut lower = StatsAccumulator::new();
        lower.apply(&algebra(1, GradeResult::Incorrect, 5));

        let mut chapter = ChapterStats::new();
        chapter.insert("Math_Algebra".into(), upper);
        chapter.insert("math_algebra".into(), lower);

        let repo = StatsRepository::from_mappings(DailyStats::new(), WeeklyStats::new(), chapter);
        assert_eq!(repo.chapters().len(), 1);
        let merged = repo.chapter("Math", "Algebra");
        assert_eq!(merged.counters.total, 2);
        assert_eq!(merged.counters.total_time_seconds, 15);
    }

    #[test]
    fn subjects_and_filters_ignore_case() {
        let mut repo = StatsRepository::new();
        let now = fixed_now();
        repo.record(&algebra(0, GradeResult::Correct, 60), now);
        repo.record(&GradingEvent::new("Math", "Geometry", 0, GradeResult::Discuss), now);
        repo.record(&GradingEvent::new("Physics", "Waves", 0, GradeResult::Incorrect), now);

        assert_eq!(repo.subjects(), vec!["math".to_owned(), "physics".to_owned()]);
        assert_eq!(repo.chapters_for(Some("MATH")).count(), 2);
        assert_eq!(repo.chapters_for(None).count(), 3);
    }
}
