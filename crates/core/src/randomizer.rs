use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::model::{AnswerId, PresentationAnswer, PresentationQuestion, QuestionNumber, RawQuestion};

/// A question whose declared correct answer is not among its answers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("question {number} declares correct answer {correct} which is not among its answers")]
pub struct MalformedQuestion {
    pub number: QuestionNumber,
    pub correct: AnswerId,
}

/// Shuffle a question's answers and locate the correct one in the new order.
///
/// The shuffle is an unbiased Fisher-Yates permutation driven by `rng`.
///
/// # Errors
///
/// Returns `MalformedQuestion` if no answer carries the question's correct id.
pub fn present<R: Rng>(
    question: &RawQuestion,
    rng: &mut R,
) -> Result<PresentationQuestion, MalformedQuestion> {
    let mut answers: Vec<PresentationAnswer> = question
        .answers
        .iter()
        .map(|(id, text)| PresentationAnswer {
            id: id.clone(),
            text: text.clone(),
        })
        .collect();
    answers.shuffle(rng);

    let correct_index = answers
        .iter()
        .position(|a| a.id == question.correct)
        .ok_or_else(|| MalformedQuestion {
            number: question.number,
            correct: question.correct.clone(),
        })?;

    Ok(PresentationQuestion {
        number: question.number,
        text: question.text.clone(),
        answers,
        correct_index,
    })
}
