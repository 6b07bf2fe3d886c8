use serde::Serialize;

use quiz_core::model::PresentationQuestion;
use quiz_core::{SelectionPlan, Stats, StatsSummary};

/// A started session: the questions to present and how they were chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizSession {
    pub questions: Vec<PresentationQuestion>,
    pub total: usize,
    #[serde(skip)]
    pub plan: SelectionPlan,
}

impl QuizSession {
    /// Number of questions in this session.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Outcome of submitting a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub correctness: Vec<bool>,
    pub stats: Stats,
    pub summary: StatsSummary,
}

impl Submission {
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correctness.iter().filter(|&&c| c).count()
    }
}
