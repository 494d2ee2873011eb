use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::answer_check_service::AnswerCheckService;
use crate::error::AppServicesError;
use crate::quiz_service::QuizService;
use crate::stats_service::StatsService;

/// Assembles the app-facing services over one shared store.
#[derive(Clone)]
pub struct AppServices {
    stats: Arc<StatsService>,
    quizzes: Arc<QuizService>,
    checks: Arc<AnswerCheckService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock))
    }

    /// Build services over a fresh in-memory store.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(), clock)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let stats = Arc::new(StatsService::new(clock, Arc::clone(&storage.kv)));
        let quizzes = Arc::new(QuizService::new(clock, Arc::clone(&storage.kv)));
        let checks = Arc::new(AnswerCheckService::new(
            clock,
            Arc::clone(&storage.kv),
            Arc::clone(&stats),
        ));
        Self {
            stats,
            quizzes,
            checks,
        }
    }

    #[must_use]
    pub fn stats(&self) -> Arc<StatsService> {
        Arc::clone(&self.stats)
    }

    #[must_use]
    pub fn quizzes(&self) -> Arc<QuizService> {
        Arc::clone(&self.quizzes)
    }

    #[must_use]
    pub fn checks(&self) -> Arc<AnswerCheckService> {
        Arc::clone(&self.checks)
    }
}
