#![forbid(unsafe_code)]

pub mod answer_check_service;
pub mod app_services;
pub mod error;
pub mod quiz_service;
pub mod stats_service;

pub use quiz_core::Clock;

pub use answer_check_service::AnswerCheckService;
pub use app_services::AppServices;
pub use error::{AnswerCheckError, AppServicesError, QuizServiceError, StatsServiceError};
pub use quiz_service::{QuizService, StartedQuiz};
pub use stats_service::StatsService;
