use std::sync::Arc;

use quiz_core::model::{GradingEvent, GradingEventDraft};
use quiz_core::stats::{
    BucketKey, ChapterOverview, ChapterStats, DailyStats, Dimension, RecordedBuckets,
    StatsAccumulator, StatsRepository, WeeklyStats,
};
use storage::json::{read_json_or_default, write_json};
use storage::keys::stats_key;
use storage::repository::KeyValueStore;

use crate::Clock;
use crate::error::StatsServiceError;

/// Loads, updates and flushes the daily, weekly and chapter statistics.
///
/// Every write is a whole-mapping replace; two services sharing a store can
/// lose each other's updates if they interleave.
#[derive(Clone)]
pub struct StatsService {
    clock: Clock,
    store: Arc<dyn KeyValueStore>,
}

impl StatsService {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn KeyValueStore>) -> Self {
        Self { clock, store }
    }

    /// Read all three mappings into a `StatsRepository`.
    ///
    /// A missing or malformed mapping loads as empty without affecting the
    /// others.
    ///
    /// # Errors
    ///
    /// Returns `StatsServiceError::Storage` if the store cannot be read.
    pub async fn load(&self) -> Result<StatsRepository, StatsServiceError> {
        let store = self.store.as_ref();
        let daily: DailyStats = read_json_or_default(store, stats_key(Dimension::Daily)).await?;
        let weekly: WeeklyStats =
            read_json_or_default(store, stats_key(Dimension::Weekly)).await?;
        let chapter: ChapterStats =
            read_json_or_default(store, stats_key(Dimension::Chapter)).await?;
        Ok(StatsRepository::from_mappings(daily, weekly, chapter))
    }

    /// Write all three mappings back to the store.
    ///
    /// # Errors
    ///
    /// Returns `StatsServiceError::Storage` on the first failed write.
    pub async fn flush(&self, repo: &StatsRepository) -> Result<(), StatsServiceError> {
        let store = self.store.as_ref();
        write_json(store, stats_key(Dimension::Daily), repo.daily()).await?;
        write_json(store, stats_key(Dimension::Weekly), repo.weekly()).await?;
        write_json(store, stats_key(Dimension::Chapter), repo.chapters()).await?;
        Ok(())
    }

    /// Record one grading event into today's, this week's and its chapter's buckets.
    ///
    /// # Errors
    ///
    /// Returns `StatsServiceError::Storage` if loading or flushing fails.
    pub async fn record(&self, event: &GradingEvent) -> Result<RecordedBuckets, StatsServiceError> {
        let mut recorded = self.record_all(std::slice::from_ref(event)).await?;
        Ok(recorded.remove(0))
    }

    /// Record several events with a single load and flush.
    ///
    /// # Errors
    ///
    /// Returns `StatsServiceError::Storage` if loading or flushing fails.
    pub async fn record_all(
        &self,
        events: &[GradingEvent],
    ) -> Result<Vec<RecordedBuckets>, StatsServiceError> {
        if events.is_empty() {
            return Ok(Vec::new());
        }

        let mut repo = self.load().await?;
        let now = self.clock.now();
        let recorded: Vec<RecordedBuckets> = events
            .iter()
            .map(|event| {
                let buckets = repo.record(event, now);
                tracing::debug!(
                    day = %buckets.day,
                    week = buckets.week,
                    chapter = %buckets.chapter,
                    result = ?event.result,
                    previous = ?event.previous_result,
                    "recorded grading event"
                );
                buckets
            })
            .collect();
        self.flush(&repo).await?;

        tracing::info!(events = recorded.len(), "statistics updated");
        Ok(recorded)
    }

    /// Normalize a loosely typed draft and record it.
    ///
    /// Returns `Ok(None)` when the draft carries no result.
    ///
    /// # Errors
    ///
    /// Returns `StatsServiceError::Storage` if loading or flushing fails.
    pub async fn record_draft(
        &self,
        draft: GradingEventDraft,
    ) -> Result<Option<RecordedBuckets>, StatsServiceError> {
        let Some(event) = draft.normalize() else {
            tracing::debug!("skipping grading draft without a result");
            return Ok(None);
        };
        self.record(&event).await.map(Some)
    }

    /// Read one bucket; missing buckets read as zero.
    ///
    /// # Errors
    ///
    /// Returns `StatsServiceError::Storage` if the store cannot be read.
    pub async fn get(&self, key: &BucketKey) -> Result<StatsAccumulator, StatsServiceError> {
        Ok(self.load().await?.get(key))
    }

    /// Today's bucket according to the service clock.
    ///
    /// # Errors
    ///
    /// Returns `StatsServiceError::Storage` if the store cannot be read.
    pub async fn today(&self) -> Result<StatsAccumulator, StatsServiceError> {
        self.get(&BucketKey::Day(self.clock.today())).await
    }

    /// This ISO week's bucket according to the service clock.
    ///
    /// # Errors
    ///
    /// Returns `StatsServiceError::Storage` if the store cannot be read.
    pub async fn this_week(&self) -> Result<StatsAccumulator, StatsServiceError> {
        self.get(&BucketKey::Week(self.clock.week_key())).await
    }

    /// Totals over the chapter buckets of `subject`, or all chapters.
    ///
    /// # Errors
    ///
    /// Returns `StatsServiceError::Storage` if the store cannot be read.
    pub async fn chapter_overview(
        &self,
        subject: Option<&str>,
    ) -> Result<ChapterOverview, StatsServiceError> {
        Ok(self.load().await?.chapter_overview(subject))
    }

    /// Distinct subjects that have chapter statistics.
    ///
    /// # Errors
    ///
    /// Returns `StatsServiceError::Storage` if the store cannot be read.
    pub async fn subjects(&self) -> Result<Vec<String>, StatsServiceError> {
        Ok(self.load().await?.subjects())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use quiz_core::model::GradeResult;
    use quiz_core::time::fixed_now;
    use storage::repository::InMemoryStore;

    fn service(store: &InMemoryStore) -> StatsService {
        StatsService::new(Clock::fixed(fixed_now()), Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn record_persists_every_dimension() {
        let store = InMemoryStore::new();
        let stats = service(&store);

        let event =
            GradingEvent::new("Math", "Algebra", 0, GradeResult::Correct).with_time_spent(30);
        let buckets = stats.record(&event).await.unwrap();
        assert_eq!(buckets.day, "2023-11-14");
        assert_eq!(buckets.week, 46);

        let weekly = store.get("weeklyStats").await.unwrap().unwrap();
        assert!(weekly.starts_with(r#"{"46":{"#));

        let today = stats.today().await.unwrap();
        assert_eq!(today.counters.total, 1);
        assert_eq!(stats.this_week().await.unwrap(), today);
    }

    #[tokio::test]
    async fn malformed_dimension_loads_empty_without_touching_others() {
        let store = InMemoryStore::new();
        let stats = service(&store);
        stats
            .record(&GradingEvent::new("Math", "Algebra", 0, GradeResult::Correct))
            .await
            .unwrap();
        store.set("dailyStats", "[oops".into()).await.unwrap();

        let repo = stats.load().await.unwrap();
        assert!(repo.daily().is_empty());
        assert_eq!(repo.chapter("Math", "Algebra").counters.total, 1);
    }

    #[tokio::test]
    async fn draft_without_result_records_nothing() {
        let store = InMemoryStore::new();
        let stats = service(&store);

        let recorded = stats
            .record_draft(GradingEventDraft::default())
            .await
            .unwrap();
        assert!(recorded.is_none());
        assert_eq!(store.len().unwrap(), 0);
    }

    #[tokio::test]
    async fn draft_defaults_subject_to_unknown() {
        let store = InMemoryStore::new();
        let stats = service(&store);
        let draft = GradingEventDraft {
            chapter: Some("Intro".into()),
            result: Some("incorrect".into()),
            ..GradingEventDraft::default()
        };

        let buckets = stats.record_draft(draft).await.unwrap().unwrap();
        assert_eq!(buckets.chapter.as_str(), "unknown_intro");
        assert_eq!(stats.subjects().await.unwrap(), vec!["unknown".to_owned()]);
    }
}
