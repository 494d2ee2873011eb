use std::collections::BTreeSet;
use std::sync::Arc;

use quiz_core::model::{
    AnswerChecks, AnswerHistory, ChapterDetails, CheckReconciliation, CheckSubmission, QuizState,
    ReviewItem,
};
use storage::json::{read_json, read_json_or_default, write_json};
use storage::keys::{ANSWERS_HISTORY, answer_checks_key, quiz_key};
use storage::repository::KeyValueStore;

use crate::Clock;
use crate::error::AnswerCheckError;
use crate::stats_service::StatsService;

/// Turns the learner's verdicts on answered questions into grading events.
#[derive(Clone)]
pub struct AnswerCheckService {
    clock: Clock,
    store: Arc<dyn KeyValueStore>,
    stats: Arc<StatsService>,
}

impl AnswerCheckService {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn KeyValueStore>, stats: Arc<StatsService>) -> Self {
        Self {
            clock,
            store,
            stats,
        }
    }

    /// Saved checks of a chapter; empty when none were saved.
    ///
    /// # Errors
    ///
    /// Returns `AnswerCheckError::Storage` if the store cannot be read.
    pub async fn load_checks(
        &self,
        subject: &str,
        chapter: &str,
    ) -> Result<AnswerChecks, AnswerCheckError> {
        let key = answer_checks_key(subject, chapter);
        Ok(read_json_or_default(self.store.as_ref(), &key).await?)
    }

    /// One review row per answered question, ascending.
    ///
    /// # Errors
    ///
    /// Returns `AnswerCheckError::NotStarted` when the chapter has no saved
    /// quiz, or `AnswerCheckError::Storage` if the store cannot be read.
    pub async fn review_items(
        &self,
        subject: &str,
        chapter: &str,
    ) -> Result<Vec<ReviewItem>, AnswerCheckError> {
        let quiz = self.require_quiz(subject, chapter).await?;
        let checks = self.load_checks(subject, chapter).await?;
        Ok(checks.review_items(&quiz))
    }

    /// Save `submissions` as the chapter's checks, recording a grading event
    /// for every new or changed verdict.
    ///
    /// The saved checks are replaced by exactly the submitted set.
    ///
    /// # Errors
    ///
    /// Returns `AnswerCheckError::Unanswered` when a submission targets a
    /// question without an answer, `AnswerCheckError::DuplicateQuestion` when
    /// a question appears more than once, `AnswerCheckError::NotStarted` when the
    /// chapter has no saved quiz, or a stats or storage error.
    pub async fn submit_checks(
        &self,
        subject: &str,
        chapter: &str,
        submissions: &[CheckSubmission],
    ) -> Result<CheckReconciliation, AnswerCheckError> {
        let quiz = self.require_quiz(subject, chapter).await?;
        if let Some(unanswered) = submissions
            .iter()
            .find(|s| !quiz.is_answered(s.question_index as usize))
        {
            return Err(AnswerCheckError::Unanswered {
                number: unanswered.question_index.saturating_add(1),
            });
        }
        let mut seen = BTreeSet::new();
        if let Some(duplicate) = submissions.iter().find(|s| !seen.insert(s.question_index)) {
            return Err(AnswerCheckError::DuplicateQuestion {
                number: duplicate.question_index.saturating_add(1),
            });
        }

        let saved = self.load_checks(subject, chapter).await?;
        let history: AnswerHistory =
            read_json_or_default(self.store.as_ref(), ANSWERS_HISTORY).await?;
        let reconciliation = saved.reconcile(
            quiz.subject(),
            quiz.chapter(),
            submissions,
            &history,
            self.clock.now(),
        );

        self.stats.record_all(&reconciliation.events).await?;
        let key = answer_checks_key(subject, chapter);
        write_json(self.store.as_ref(), &key, &reconciliation.checks).await?;

        tracing::info!(
            subject = quiz.subject(),
            chapter = quiz.chapter(),
            checks = reconciliation.checks.len(),
            events = reconciliation.events.len(),
            "answer checks saved"
        );
        Ok(reconciliation)
    }

    /// Change the verdict of a single question, keeping every other review row.
    ///
    /// # Errors
    ///
    /// Same as [`AnswerCheckService::submit_checks`].
    pub async fn check_question(
        &self,
        subject: &str,
        chapter: &str,
        submission: CheckSubmission,
    ) -> Result<CheckReconciliation, AnswerCheckError> {
        let items = self.review_items(subject, chapter).await?;
        if !items
            .iter()
            .any(|item| item.question_index == submission.question_index)
        {
            return Err(AnswerCheckError::Unanswered {
                number: submission.question_index.saturating_add(1),
            });
        }

        let submissions: Vec<CheckSubmission> = items
            .iter()
            .map(|item| {
                if item.question_index == submission.question_index {
                    submission
                } else {
                    item.to_submission()
                }
            })
            .collect();
        self.submit_checks(subject, chapter, &submissions).await
    }

    /// Question numbers of the chapter report.
    ///
    /// # Errors
    ///
    /// Returns `AnswerCheckError::Storage` if the store cannot be read.
    pub async fn chapter_details(
        &self,
        subject: &str,
        chapter: &str,
    ) -> Result<ChapterDetails, AnswerCheckError> {
        Ok(self.load_checks(subject, chapter).await?.details())
    }

    async fn require_quiz(&self, subject: &str, chapter: &str) -> Result<QuizState, AnswerCheckError> {
        read_json(self.store.as_ref(), &quiz_key(subject, chapter))
            .await?
            .ok_or_else(|| AnswerCheckError::NotStarted {
                subject: subject.to_owned(),
                chapter: chapter.to_owned(),
            })
    }
}
