mod check;
mod event;
mod grade;
mod history;
mod quiz;
mod timer;

pub use check::{
    AnswerCheck, AnswerChecks, ChapterDetails, CheckReconciliation, CheckSubmission, ReviewItem,
};
pub use event::{GradingEvent, GradingEventDraft, UNKNOWN_SUBJECT};
pub use grade::{Attempts, GradeParseError, GradeResult};
pub use history::{AnswerHistory, AnswerRecord};
pub use quiz::{QuizError, QuizProgress, QuizState, SubmitOutcome};
pub use timer::{AnswerTimer, format_elapsed};
