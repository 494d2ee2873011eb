use std::sync::Arc;

use quiz_core::model::{AnswerHistory, AnswerRecord, QuizState, SubmitOutcome};
use storage::json::{read_json, read_json_or_default, write_json};
use storage::keys::{ANSWERS_HISTORY, quiz_key};
use storage::repository::KeyValueStore;

use crate::Clock;
use crate::error::QuizServiceError;

/// A started or resumed quiz and the question to show first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedQuiz {
    pub state: QuizState,
    pub resume_index: usize,
    pub resumed: bool,
}

/// Saves quiz progress per chapter and appends to the answers history.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    store: Arc<dyn KeyValueStore>,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn KeyValueStore>) -> Self {
        Self { clock, store }
    }

    /// Fetch the saved quiz of a chapter, if any.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if the store cannot be read.
    pub async fn load_quiz(
        &self,
        subject: &str,
        chapter: &str,
    ) -> Result<Option<QuizState>, QuizServiceError> {
        let state = read_json(self.store.as_ref(), &quiz_key(subject, chapter)).await?;
        Ok(state)
    }

    /// Start a new quiz or resume the saved one, and save it.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Quiz` for invalid names or counts, including
    /// an attempt to shrink a saved quiz.
    /// Returns `QuizServiceError::Storage` if persistence fails.
    pub async fn start_quiz(
        &self,
        subject: &str,
        chapter: &str,
        question_count: usize,
    ) -> Result<StartedQuiz, QuizServiceError> {
        let existing = self.load_quiz(subject, chapter).await?;
        let resumed = existing.is_some();
        let state = QuizState::start(subject, chapter, question_count, existing, self.clock.now())?;
        self.save_quiz(&state).await?;

        let resume_index = state.resume_index();
        tracing::info!(
            subject = state.subject(),
            chapter = state.chapter(),
            questions = state.question_count(),
            resume_index,
            resumed,
            "quiz started"
        );
        Ok(StartedQuiz {
            state,
            resume_index,
            resumed,
        })
    }

    /// Record the answer to question `index` and append it to the history.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::NotStarted` when no quiz was saved for the
    /// chapter, `QuizServiceError::Quiz` when the answer is rejected, or
    /// `QuizServiceError::Storage` if persistence fails.
    pub async fn submit_answer(
        &self,
        subject: &str,
        chapter: &str,
        index: usize,
        answer: &str,
        time_spent_seconds: u64,
    ) -> Result<SubmitOutcome, QuizServiceError> {
        let mut state = self
            .load_quiz(subject, chapter)
            .await?
            .ok_or_else(|| QuizServiceError::NotStarted {
                subject: subject.to_owned(),
                chapter: chapter.to_owned(),
            })?;

        let now = self.clock.now();
        let outcome = state.submit_answer(index, answer, now)?;
        self.save_quiz(&state).await?;

        let store = self.store.as_ref();
        let mut history: AnswerHistory = read_json_or_default(store, ANSWERS_HISTORY).await?;
        let question_index = u32::try_from(index).unwrap_or(u32::MAX);
        history.push(AnswerRecord::new(
            question_index,
            answer.trim(),
            time_spent_seconds,
            now,
        ));
        write_json(store, ANSWERS_HISTORY, &history).await?;

        tracing::debug!(
            subject = state.subject(),
            chapter = state.chapter(),
            question = index + 1,
            time_spent_seconds,
            complete = outcome.is_complete,
            "answer saved"
        );
        Ok(outcome)
    }

    /// Every answer submitted so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if the store cannot be read.
    pub async fn answer_history(&self) -> Result<AnswerHistory, QuizServiceError> {
        Ok(read_json_or_default(self.store.as_ref(), ANSWERS_HISTORY).await?)
    }

    async fn save_quiz(&self, state: &QuizState) -> Result<(), QuizServiceError> {
        let key = quiz_key(state.subject(), state.chapter());
        write_json(self.store.as_ref(), &key, state).await?;
        Ok(())
    }
}
