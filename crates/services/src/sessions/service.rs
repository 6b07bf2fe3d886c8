use std::sync::Arc;

use quiz_core::model::{PresentationQuestion, QuestionNumber, grade};
use quiz_core::{RandomSource, SelectionBuilder, SelectionPolicy, summarize};

use super::view::{QuizSession, Submission};
use crate::error::SessionError;
use crate::quiz_service::QuizService;
use crate::stats_service::StatsService;

/// Builds sessions from recorded statistics and records their results.
#[derive(Clone)]
pub struct SessionService {
    quiz: Arc<QuizService>,
    stats: Arc<StatsService>,
    random: RandomSource,
}

impl SessionService {
    #[must_use]
    pub fn new(quiz: Arc<QuizService>, stats: Arc<StatsService>, random: RandomSource) -> Self {
        Self {
            quiz,
            stats,
            random,
        }
    }

    /// Select up to `limit` questions under `policy` and prepare them for presentation.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the bank has no questions, or
    /// `SessionError::Quiz` if the bank cannot be read or holds a corrupt question.
    pub async fn start(
        &self,
        policy: SelectionPolicy,
        limit: usize,
    ) -> Result<QuizSession, SessionError> {
        let meta = self.quiz.meta().await?;
        let stats = self.stats.load().await;

        let plan = SelectionBuilder::new(&stats).with_limit(limit).build(
            policy,
            meta.numbers.iter().copied(),
            &mut self.random.rng(),
        );
        if plan.is_empty() {
            return Err(SessionError::Empty);
        }

        let questions = self.quiz.batch(&plan.numbers).await?;
        tracing::debug!(
            ?policy,
            selected = plan.total(),
            missed = plan.missed_selected,
            backfill = plan.backfill_selected,
            "started session"
        );

        Ok(QuizSession {
            questions,
            total: meta.total,
            plan,
        })
    }

    /// Grade picks against the presented questions and record the session.
    ///
    /// `picks[i]` is the chosen index into `questions[i].answers`; `None` or a
    /// missing entry is unanswered and counts as incorrect.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the stats cannot be saved or the bank total
    /// cannot be read.
    pub async fn submit(
        &self,
        questions: &[PresentationQuestion],
        picks: &[Option<usize>],
    ) -> Result<Submission, SessionError> {
        let correctness = grade(questions, picks);
        let numbers: Vec<QuestionNumber> = questions.iter().map(|q| q.number).collect();
        self.record(&numbers, correctness).await
    }

    /// Record already-graded results for a session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Stats` if the inputs differ in length or cannot
    /// be saved, or `SessionError::Quiz` if the bank total cannot be read.
    pub async fn record(
        &self,
        numbers: &[QuestionNumber],
        correctness: Vec<bool>,
    ) -> Result<Submission, SessionError> {
        let stats = self.stats.record_submission(numbers, &correctness).await?;
        let total = self.quiz.total().await?;
        Ok(Submission {
            summary: summarize(&stats, total),
            correctness,
            stats,
        })
    }
}
