use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use quiz_core::model::{PresentationQuestion, QuestionNumber, RawQuestion};
use quiz_core::{RandomSource, present};
use storage::repository::QuestionSource;

use crate::error::QuizServiceError;

/// Total count and every known question number, in bank order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizMeta {
    pub total: usize,
    pub numbers: Vec<QuestionNumber>,
}

/// Presentation-ready questions plus the size of the whole bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionBatch {
    pub questions: Vec<PresentationQuestion>,
    pub total: usize,
}

/// Resolves question numbers against the bank and shuffles answers for presentation.
#[derive(Clone)]
pub struct QuizService {
    questions: Arc<dyn QuestionSource>,
    random: RandomSource,
}

impl QuizService {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionSource>, random: RandomSource) -> Self {
        Self { questions, random }
    }

    /// Total count and all known question numbers.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::SourceUnavailable` if the bank cannot be read.
    pub async fn meta(&self) -> Result<QuizMeta, QuizServiceError> {
        let all = self.questions.list_all().await?;
        Ok(QuizMeta {
            total: all.len(),
            numbers: all.iter().map(|q| q.number).collect(),
        })
    }

    /// Number of questions in the bank.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::SourceUnavailable` if the bank cannot be read.
    pub async fn total(&self) -> Result<usize, QuizServiceError> {
        Ok(self.questions.total().await?)
    }

    /// A uniform random sample of up to `count` questions, without repeats.
    ///
    /// # Errors
    ///
    /// Returns `SourceUnavailable` if the bank cannot be read, or `Malformed`
    /// if a sampled question has no matching correct answer.
    pub async fn random_sample(&self, count: usize) -> Result<QuestionBatch, QuizServiceError> {
        let mut all = self.questions.list_all().await?;
        let total = all.len();

        let mut rng = self.random.rng();
        all.shuffle(&mut rng);
        all.truncate(count);

        let questions = all
            .iter()
            .map(|q| present(q, &mut rng))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(QuestionBatch { questions, total })
    }

    /// Exactly the requested questions, in request order.
    ///
    /// Unknown numbers are skipped and repeated numbers are returned once.
    ///
    /// # Errors
    ///
    /// Returns `EmptyRequest` if `numbers` is empty, `SourceUnavailable` if the
    /// bank cannot be read, or `Malformed` for a corrupt question.
    pub async fn batch(
        &self,
        numbers: &[QuestionNumber],
    ) -> Result<Vec<PresentationQuestion>, QuizServiceError> {
        if numbers.is_empty() {
            return Err(QuizServiceError::EmptyRequest);
        }

        let all = self.questions.list_all().await?;
        let by_number: HashMap<QuestionNumber, &RawQuestion> =
            all.iter().map(|q| (q.number, q)).collect();

        let mut rng = self.random.rng();
        let mut seen = HashSet::with_capacity(numbers.len());
        let mut questions = Vec::with_capacity(numbers.len());
        for number in numbers {
            if !seen.insert(*number) {
                continue;
            }
            match by_number.get(number) {
                Some(raw) => questions.push(present(raw, &mut rng)?),
                None => tracing::debug!(%number, "requested question not in bank"),
            }
        }
        Ok(questions)
    }
}
