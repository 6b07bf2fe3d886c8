use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::QuestionNumber;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StatsError {
    #[error("submission has {numbers} questions but {flags} correctness flags")]
    LengthMismatch { numbers: usize, flags: usize },
}

//
// ─── STATS ─────────────────────────────────────────────────────────────────────
//

/// Cumulative exposure and accuracy history.
///
/// Values are snapshots: every mutation returns a new `Stats` and leaves the
/// receiver untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    per_question_seen: BTreeMap<QuestionNumber, u32>,
    per_question_correct: BTreeMap<QuestionNumber, u32>,
    total_attempts: u64,
    total_correct: u64,
}

/// Persisted shape of `Stats` where any field may be missing.
///
/// Older or damaged payloads deserialize into this and are completed by
/// [`Stats::normalize`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsRecord {
    pub per_question_seen: Option<BTreeMap<QuestionNumber, u32>>,
    pub per_question_correct: Option<BTreeMap<QuestionNumber, u32>>,
    pub total_attempts: Option<u64>,
    pub total_correct: Option<u64>,
}

impl Stats {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fill missing fields with empty maps and zero totals.
    #[must_use]
    pub fn normalize(record: StatsRecord) -> Self {
        Self {
            per_question_seen: record.per_question_seen.unwrap_or_default(),
            per_question_correct: record.per_question_correct.unwrap_or_default(),
            total_attempts: record.total_attempts.unwrap_or(0),
            total_correct: record.total_correct.unwrap_or(0),
        }
    }

    /// Apply one submitted session.
    ///
    /// `numbers` and `correctness` are parallel, one entry per presented
    /// question. Every question gains one exposure, correct ones gain one
    /// correct answer, and the session counts as a single attempt.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::LengthMismatch` if the slices differ in length.
    pub fn record_submission(
        &self,
        numbers: &[QuestionNumber],
        correctness: &[bool],
    ) -> Result<Self, StatsError> {
        if numbers.len() != correctness.len() {
            return Err(StatsError::LengthMismatch {
                numbers: numbers.len(),
                flags: correctness.len(),
            });
        }

        let mut next = self.clone();
        for (number, &correct) in numbers.iter().zip(correctness) {
            bump(&mut next.per_question_seen, *number);
            if correct {
                bump(&mut next.per_question_correct, *number);
            }
        }

        let correct_count = correctness.iter().filter(|&&c| c).count();
        next.total_attempts = next.total_attempts.saturating_add(1);
        next.total_correct = next
            .total_correct
            .saturating_add(u64::try_from(correct_count).unwrap_or(u64::MAX));
        Ok(next)
    }

    /// Forget exposure counts while keeping correct counts and totals.
    ///
    /// Afterwards a question may report more correct answers than exposures
    /// until it is seen again.
    #[must_use]
    pub fn reset_seen(&self) -> Self {
        Self {
            per_question_seen: BTreeMap::new(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn seen(&self, number: QuestionNumber) -> u32 {
        self.per_question_seen.get(&number).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn correct(&self, number: QuestionNumber) -> u32 {
        self.per_question_correct.get(&number).copied().unwrap_or(0)
    }

    /// Exposures that did not end in a correct answer.
    #[must_use]
    pub fn errors(&self, number: QuestionNumber) -> u32 {
        self.seen(number).saturating_sub(self.correct(number))
    }

    #[must_use]
    pub fn per_question_seen(&self) -> &BTreeMap<QuestionNumber, u32> {
        &self.per_question_seen
    }

    #[must_use]
    pub fn per_question_correct(&self) -> &BTreeMap<QuestionNumber, u32> {
        &self.per_question_correct
    }

    /// Number of submitted sessions.
    #[must_use]
    pub fn total_attempts(&self) -> u64 {
        self.total_attempts
    }

    /// Correct answers summed over all submitted sessions.
    #[must_use]
    pub fn total_correct(&self) -> u64 {
        self.total_correct
    }

    /// Sum of all exposure counts.
    #[must_use]
    pub fn total_answered(&self) -> u64 {
        self.per_question_seen.values().map(|&v| u64::from(v)).sum()
    }
}

impl From<StatsRecord> for Stats {
    fn from(record: StatsRecord) -> Self {
        Self::normalize(record)
    }
}

fn bump(counts: &mut BTreeMap<QuestionNumber, u32>, number: QuestionNumber) {
    let entry = counts.entry(number).or_insert(0);
    *entry = entry.saturating_add(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn q(n: u64) -> QuestionNumber {
        QuestionNumber::new(n)
    }

    #[test]
    fn submission_updates_counts_and_totals() {
        let stats = Stats::empty()
            .record_submission(&[q(10), q(20)], &[true, false])
            .unwrap();

        assert_eq!(stats.seen(q(10)), 1);
        assert_eq!(stats.seen(q(20)), 1);
        assert_eq!(stats.correct(q(10)), 1);
        assert!(!stats.per_question_correct().contains_key(&q(20)));
        assert_eq!(stats.total_attempts(), 1);
        assert_eq!(stats.total_correct(), 1);
    }

    #[test]
    fn submission_leaves_previous_snapshot_untouched() {
        let before = Stats::empty();
        let after = before.record_submission(&[q(1)], &[true]).unwrap();
        assert_eq!(before, Stats::empty());
        assert_ne!(before, after);
    }

    #[test]
    fn mismatched_submission_is_rejected() {
        let err = Stats::empty()
            .record_submission(&[q(1), q(2)], &[true])
            .unwrap_err();
        assert_eq!(err, StatsError::LengthMismatch { numbers: 2, flags: 1 });
    }

    #[test]
    fn reset_seen_keeps_correct_counts_and_totals() {
        let stats = Stats::normalize(StatsRecord {
            per_question_seen: Some(BTreeMap::from([(q(1), 3)])),
            per_question_correct: Some(BTreeMap::from([(q(1), 2)])),
            total_attempts: Some(1),
            total_correct: Some(2),
        });

        let reset = stats.reset_seen();

        assert!(reset.per_question_seen().is_empty());
        assert_eq!(reset.correct(q(1)), 2);
        assert_eq!(reset.total_attempts(), 1);
        assert_eq!(reset.total_correct(), 2);
        // Correct may exceed seen until the question is shown again.
        assert_eq!(reset.errors(q(1)), 0);
    }

    #[test]
    fn normalize_fills_missing_fields() {
        let record: StatsRecord =
            serde_json::from_str(r#"{"perQuestionSeen": {"4": 2}, "totalCorrect": null}"#).unwrap();
        let stats = Stats::normalize(record);
        assert_eq!(stats.seen(q(4)), 2);
        assert!(stats.per_question_correct().is_empty());
        assert_eq!(stats.total_attempts(), 0);
        assert_eq!(stats.total_correct(), 0);
    }

    #[test]
    fn serializes_with_persisted_field_names() {
        let stats = Stats::empty().record_submission(&[q(3)], &[true]).unwrap();
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["perQuestionSeen"]["3"], 1);
        assert_eq!(value["perQuestionCorrect"]["3"], 1);
        assert_eq!(value["totalAttempts"], 1);
        assert_eq!(value["totalCorrect"], 1);
    }

    proptest! {
        #[test]
        fn correct_never_exceeds_seen(
            sessions in prop::collection::vec(
                prop::collection::vec((0_u64..6, any::<bool>()), 0..10),
                0..12,
            )
        ) {
            let mut stats = Stats::empty();
            for session in &sessions {
                let numbers: Vec<QuestionNumber> = session.iter().map(|(n, _)| q(*n)).collect();
                let flags: Vec<bool> = session.iter().map(|(_, c)| *c).collect();
                stats = stats.record_submission(&numbers, &flags).unwrap();
            }

            for (number, correct) in stats.per_question_correct() {
                prop_assert!(*correct <= stats.seen(*number));
            }
            prop_assert_eq!(stats.total_attempts(), sessions.len() as u64);
        }
    }
}
