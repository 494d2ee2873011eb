use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::event::GradingEvent;
use crate::model::grade::{Attempts, GradeResult};
use crate::model::history::AnswerHistory;
use crate::model::quiz::QuizState;

//
// ─── ANSWER CHECK ─────────────────────────────────────────────────────────────
//

/// Saved verdict for one question of one chapter quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerCheck {
    pub result: GradeResult,
    #[serde(default)]
    pub attempts: Attempts,
    #[serde(default)]
    pub marked: bool,
    #[serde(rename = "timeSpent", default)]
    pub time_spent_seconds: u64,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A verdict chosen by the learner for one answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSubmission {
    pub question_index: u32,
    pub result: GradeResult,
    pub attempts: Attempts,
    pub marked: bool,
}

impl CheckSubmission {
    #[must_use]
    pub fn new(question_index: u32, result: GradeResult, attempts: Attempts) -> Self {
        Self {
            question_index,
            result,
            attempts,
            marked: false,
        }
    }

    #[must_use]
    pub fn marked(mut self, marked: bool) -> Self {
        self.marked = marked;
        self
    }
}

/// One row of the answer review: the recorded answer and its current verdict.
///
/// Questions never checked before carry `correct`, one attempt, unmarked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub question_index: u32,
    pub answer: Option<String>,
    pub result: GradeResult,
    pub attempts: Attempts,
    pub marked: bool,
}

impl ReviewItem {
    #[must_use]
    pub fn to_submission(&self) -> CheckSubmission {
        CheckSubmission {
            question_index: self.question_index,
            result: self.result,
            attempts: self.attempts,
            marked: self.marked,
        }
    }
}

/// Outcome of comparing submitted verdicts against the saved ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReconciliation {
    /// Replacement for the saved checks: exactly the submitted questions.
    pub checks: AnswerChecks,
    /// One event per new or changed verdict, in submission order.
    pub events: Vec<GradingEvent>,
}

/// 1-based question numbers grouped the way the chapter report lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterDetails {
    pub incorrect: Vec<u32>,
    pub discuss: Vec<u32>,
    pub marked: Vec<u32>,
    pub two_attempts: Vec<u32>,
    pub three_or_more_attempts: Vec<u32>,
}

//
// ─── ANSWER CHECKS ────────────────────────────────────────────────────────────
//

/// Saved checks of one chapter quiz, keyed by zero-based question index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerChecks(BTreeMap<u32, AnswerCheck>);

impl AnswerChecks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, question_index: u32) -> Option<&AnswerCheck> {
        self.0.get(&question_index)
    }

    pub fn insert(&mut self, question_index: u32, check: AnswerCheck) {
        self.0.insert(question_index, check);
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &AnswerCheck)> {
        self.0.iter().map(|(index, check)| (*index, check))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Review rows for every answered question of `quiz`, ascending.
    #[must_use]
    pub fn review_items(&self, quiz: &QuizState) -> Vec<ReviewItem> {
        quiz.answered_sorted()
            .into_iter()
            .filter_map(|index| u32::try_from(index).ok())
            .map(|index| {
                let saved = self.get(index);
                ReviewItem {
                    question_index: index,
                    answer: quiz.answer(index as usize).map(str::to_owned),
                    result: saved.map_or(GradeResult::Correct, |c| c.result),
                    attempts: saved.map_or(Attempts::One, |c| c.attempts),
                    marked: saved.is_some_and(|c| c.marked),
                }
            })
            .collect()
    }

    /// Compare `submissions` with the saved checks.
    ///
    /// A submission produces a grading event when the question had no saved
    /// check or its result or attempts changed; the saved result becomes the
    /// event's previous result. Toggling only the mark produces no event.
    #[must_use]
    pub fn reconcile(
        &self,
        subject: &str,
        chapter: &str,
        submissions: &[CheckSubmission],
        history: &AnswerHistory,
        now: DateTime<Utc>,
    ) -> CheckReconciliation {
        let mut checks = AnswerChecks::new();
        let mut events = Vec::new();

        for submission in submissions {
            let index = submission.question_index;
            let time_spent = history.time_spent(index);
            let saved = self.get(index);

            let changed = saved.is_none_or(|c| {
                c.result != submission.result || c.attempts != submission.attempts
            });
            if changed {
                let mut event = GradingEvent::new(subject, chapter, index, submission.result)
                    .with_attempts(submission.attempts)
                    .with_time_spent(time_spent);
                event.previous_result = saved.map(|c| c.result);
                events.push(event);
            }

            checks.insert(
                index,
                AnswerCheck {
                    result: submission.result,
                    attempts: submission.attempts,
                    marked: submission.marked,
                    time_spent_seconds: time_spent,
                    timestamp: Some(now),
                },
            );
        }

        CheckReconciliation { checks, events }
    }

    /// Question numbers for the chapter report.
    #[must_use]
    pub fn details(&self) -> ChapterDetails {
        let mut details = ChapterDetails::default();
        // BTreeMap iteration is ascending, so every list comes out sorted.
        for (index, check) in self.iter() {
            let number = index.saturating_add(1);
            match check.result {
                GradeResult::Incorrect => details.incorrect.push(number),
                GradeResult::Discuss => details.discuss.push(number),
                GradeResult::Correct => {}
            }
            if check.marked {
                details.marked.push(number);
            }
            match check.attempts {
                Attempts::Two => details.two_attempts.push(number),
                Attempts::ThreeOrMore => details.three_or_more_attempts.push(number),
                Attempts::One => {}
            }
        }
        details
    }
}
