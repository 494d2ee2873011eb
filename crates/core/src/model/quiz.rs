use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors raised while starting or answering a quiz.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("subject is required")]
    MissingSubject,

    #[error("chapter is required")]
    MissingChapter,

    #[error("question count must be at least 1")]
    InvalidQuestionCount,

    #[error("cannot reduce question count; previous count was {previous}")]
    CannotReduce { previous: usize },

    #[error("question {index} is out of range for {count} questions")]
    OutOfRange { index: usize, count: usize },

    #[error("question {index} has already been answered")]
    AlreadyAnswered { index: usize },

    #[error("answer is empty")]
    EmptyAnswer,
}

//
// ─── PROGRESS ─────────────────────────────────────────────────────────────────
//

/// Aggregated view of quiz progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

/// What happened after an answer was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// First unanswered question after the one just answered, if any.
    pub next_index: Option<usize>,
    pub is_complete: bool,
}

//
// ─── QUIZ STATE ───────────────────────────────────────────────────────────────
//

/// Saved progress of one (subject, chapter) quiz.
///
/// `answered_questions` keeps the order in which questions were answered;
/// resuming continues after the most recently answered one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizState {
    subject: String,
    chapter: String,
    question_count: usize,
    answers: Vec<Option<String>>,
    #[serde(default)]
    answered_questions: Vec<usize>,
    timestamp: DateTime<Utc>,
}

impl QuizState {
    /// Start a fresh quiz with `question_count` empty answer slots.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` when the subject or chapter is blank or the count is zero.
    pub fn new(
        subject: &str,
        chapter: &str,
        question_count: usize,
        now: DateTime<Utc>,
    ) -> Result<Self, QuizError> {
        let (subject, chapter) = validate_names(subject, chapter)?;
        if question_count == 0 {
            return Err(QuizError::InvalidQuestionCount);
        }

        Ok(Self {
            subject,
            chapter,
            question_count,
            answers: vec![None; question_count],
            answered_questions: Vec::new(),
            timestamp: now,
        })
    }

    /// Start a quiz, resuming `existing` when one was saved.
    ///
    /// A resumed quiz may grow but never shrink; new questions get empty slots.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::CannotReduce` when `question_count` is below the saved
    /// count, or the validation errors of [`QuizState::new`].
    pub fn start(
        subject: &str,
        chapter: &str,
        question_count: usize,
        existing: Option<Self>,
        now: DateTime<Utc>,
    ) -> Result<Self, QuizError> {
        let Some(mut state) = existing else {
            return Self::new(subject, chapter, question_count, now);
        };

        validate_names(subject, chapter)?;
        if question_count == 0 {
            return Err(QuizError::InvalidQuestionCount);
        }
        let previous = state.question_count();
        if question_count < previous {
            return Err(QuizError::CannotReduce { previous });
        }

        state.answers.resize(question_count, None);
        state.question_count = question_count;
        state.timestamp = now;
        Ok(state)
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn chapter(&self) -> &str {
        &self.chapter
    }

    /// Number of questions, taken from the answer slots.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[must_use]
    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(index).and_then(Option::as_deref)
    }

    #[must_use]
    pub fn is_answered(&self, index: usize) -> bool {
        self.answered_questions.contains(&index)
    }

    /// Answered indices in the order they were answered.
    #[must_use]
    pub fn answered_in_order(&self) -> &[usize] {
        &self.answered_questions
    }

    /// Answered indices, ascending.
    #[must_use]
    pub fn answered_sorted(&self) -> Vec<usize> {
        let mut sorted = self.answered_questions.clone();
        sorted.sort_unstable();
        sorted.dedup();
        sorted
    }

    /// Question to show when the quiz is opened again.
    ///
    /// One past the most recently answered question, wrapping to the first
    /// question when that runs off the end.
    #[must_use]
    pub fn resume_index(&self) -> usize {
        let next = self.answered_questions.last().map_or(0, |last| last + 1);
        if next >= self.question_count() { 0 } else { next }
    }

    /// First unanswered question strictly after `index`.
    #[must_use]
    pub fn next_unanswered_after(&self, index: usize) -> Option<usize> {
        (index + 1..self.question_count()).find(|i| !self.is_answered(*i))
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progress().is_complete
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.question_count();
        let answered = self.answered_sorted().len().min(total);
        QuizProgress {
            total,
            answered,
            remaining: total - answered,
            is_complete: answered == total,
        }
    }

    /// Record the answer for question `index`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::OutOfRange`, `QuizError::AlreadyAnswered` or
    /// `QuizError::EmptyAnswer`.
    pub fn submit_answer(
        &mut self,
        index: usize,
        answer: &str,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome, QuizError> {
        let count = self.question_count();
        if index >= count {
            return Err(QuizError::OutOfRange { index, count });
        }
        if self.is_answered(index) {
            return Err(QuizError::AlreadyAnswered { index });
        }
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(QuizError::EmptyAnswer);
        }

        self.answers[index] = Some(answer.to_owned());
        self.answered_questions.push(index);
        self.timestamp = now;

        Ok(SubmitOutcome {
            next_index: self.next_unanswered_after(index),
            is_complete: self.is_complete(),
        })
    }
}

fn validate_names(subject: &str, chapter: &str) -> Result<(String, String), QuizError> {
    let subject = subject.trim();
    if subject.is_empty() {
        return Err(QuizError::MissingSubject);
    }
    let chapter = chapter.trim();
    if chapter.is_empty() {
        return Err(QuizError::MissingChapter);
    }
    Ok((subject.to_owned(), chapter.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn quiz(count: usize) -> QuizState {
        QuizState::new("Math", "Algebra", count, fixed_now()).unwrap()
    }

    #[test]
    fn new_quiz_validates_input() {
        assert_eq!(
            QuizState::new(" ", "Algebra", 3, fixed_now()).unwrap_err(),
            QuizError::MissingSubject
        );
        assert_eq!(
            QuizState::new("Math", "", 3, fixed_now()).unwrap_err(),
            QuizError::MissingChapter
        );
        assert_eq!(
            QuizState::new("Math", "Algebra", 0, fixed_now()).unwrap_err(),
            QuizError::InvalidQuestionCount
        );
    }

    #[test]
    fn submit_moves_to_next_unanswered() {
        let mut state = quiz(4);
        state.submit_answer(1, "b", fixed_now()).unwrap();

        let outcome = state.submit_answer(0, "a", fixed_now()).unwrap();
        assert_eq!(outcome.next_index, Some(2));
        assert!(!outcome.is_complete);

        state.submit_answer(3, "d", fixed_now()).unwrap();
        let last = state.submit_answer(2, "custom answer", fixed_now()).unwrap();
        assert_eq!(last.next_index, None);
        assert!(last.is_complete);
        assert_eq!(state.answer(2), Some("custom answer"));
    }

    #[test]
    fn submit_rejects_repeats_and_out_of_range() {
        let mut state = quiz(2);
        state.submit_answer(0, "a", fixed_now()).unwrap();

        assert_eq!(
            state.submit_answer(0, "b", fixed_now()).unwrap_err(),
            QuizError::AlreadyAnswered { index: 0 }
        );
        assert_eq!(
            state.submit_answer(2, "b", fixed_now()).unwrap_err(),
            QuizError::OutOfRange { index: 2, count: 2 }
        );
        assert_eq!(
            state.submit_answer(1, "  ", fixed_now()).unwrap_err(),
            QuizError::EmptyAnswer
        );
    }

    #[test]
    fn resume_continues_after_last_answered() {
        let mut state = quiz(3);
        assert_eq!(state.resume_index(), 0);
        state.submit_answer(1, "a", fixed_now()).unwrap();
        assert_eq!(state.resume_index(), 2);
        state.submit_answer(2, "a", fixed_now()).unwrap();
        assert_eq!(state.resume_index(), 0);
    }

    #[test]
    fn start_resumes_and_extends() {
        let mut saved = quiz(2);
        saved.submit_answer(0, "c", fixed_now()).unwrap();

        let resumed = QuizState::start("Math", "Algebra", 4, Some(saved.clone()), fixed_now()).unwrap();
        assert_eq!(resumed.question_count(), 4);
        assert_eq!(resumed.answer(0), Some("c"));
        assert_eq!(resumed.answer(3), None);
        assert_eq!(resumed.progress().remaining, 3);

        let err = QuizState::start("Math", "Algebra", 1, Some(saved), fixed_now()).unwrap_err();
        assert_eq!(err, QuizError::CannotReduce { previous: 2 });
    }

    #[test]
    fn stored_layout_round_trips() {
        let mut state = quiz(2);
        state.submit_answer(1, "e", fixed_now()).unwrap();
        let value = serde_json::to_value(&state).unwrap();

        assert_eq!(value["questionCount"], 2);
        assert_eq!(value["answers"][0], serde_json::Value::Null);
        assert_eq!(value["answeredQuestions"][0], 1);

        let back: QuizState = serde_json::from_value(value).unwrap();
        assert_eq!(back, state);
    }
}
