use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::ids::{AnswerId, QuestionNumber};

//
// ─── RAW QUESTION ──────────────────────────────────────────────────────────────
//

/// A question as stored in the question bank.
///
/// Answers are keyed by their bank-assigned id; `correct` names one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuestion {
    pub number: QuestionNumber,
    pub text: String,
    pub answers: BTreeMap<AnswerId, String>,
    pub correct: AnswerId,
}

impl RawQuestion {
    #[must_use]
    pub fn new(
        number: QuestionNumber,
        text: impl Into<String>,
        answers: impl IntoIterator<Item = (AnswerId, String)>,
        correct: AnswerId,
    ) -> Self {
        Self {
            number,
            text: text.into(),
            answers: answers.into_iter().collect(),
            correct,
        }
    }
}

//
// ─── PRESENTATION QUESTION ─────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationAnswer {
    pub id: AnswerId,
    pub text: String,
}

/// A question ready to be shown: answers in shuffled order and the position of
/// the correct one within that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationQuestion {
    pub number: QuestionNumber,
    pub text: String,
    pub answers: Vec<PresentationAnswer>,
    pub correct_index: usize,
}

impl PresentationQuestion {
    /// Whether the pick (an index into `answers`) selects the correct answer.
    ///
    /// Unanswered picks are always incorrect.
    #[must_use]
    pub fn is_correct(&self, pick: Option<usize>) -> bool {
        pick == Some(self.correct_index)
    }

    #[must_use]
    pub fn correct_answer(&self) -> Option<&PresentationAnswer> {
        self.answers.get(self.correct_index)
    }
}

/// Grade a presented session: one flag per question, in presentation order.
///
/// Missing trailing picks count as unanswered.
#[must_use]
pub fn grade(questions: &[PresentationQuestion], picks: &[Option<usize>]) -> Vec<bool> {
    questions
        .iter()
        .enumerate()
        .map(|(idx, q)| q.is_correct(picks.get(idx).copied().flatten()))
        .collect()
}
