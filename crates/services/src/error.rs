//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuizError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `StatsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatsServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("no saved quiz for {subject} / {chapter}")]
    NotStarted { subject: String, chapter: String },
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AnswerCheckService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnswerCheckError {
    #[error("no saved quiz for {subject} / {chapter}")]
    NotStarted { subject: String, chapter: String },
    #[error("question {number} has not been answered")]
    Unanswered { number: u32 },
    #[error("question {number} was submitted more than once")]
    DuplicateQuestion { number: u32 },
    #[error(transparent)]
    Stats(#[from] StatsServiceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
