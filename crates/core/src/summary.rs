use serde::Serialize;

use crate::model::QuestionNumber;
use crate::stats::Stats;

/// Display-ready aggregate metrics derived from `Stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub unique_seen: usize,
    pub total_questions: usize,
    /// Percentage of answered questions that were correct, 0 through 100.
    pub accuracy: u32,
    pub total_attempts: u64,
    pub total_correct: u64,
}

/// Per-question counts for the statistics listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionStatsRow {
    pub number: QuestionNumber,
    pub seen: u32,
    pub correct: u32,
    pub errors: u32,
}

#[must_use]
pub fn summarize(stats: &Stats, total_questions: usize) -> StatsSummary {
    let unique_seen = stats
        .per_question_seen()
        .values()
        .filter(|&&seen| seen > 0)
        .count();

    StatsSummary {
        unique_seen,
        total_questions,
        accuracy: accuracy_percent(stats.total_correct(), stats.total_answered()),
        total_attempts: stats.total_attempts(),
        total_correct: stats.total_correct(),
    }
}

/// Rounded percentage of `correct` over `answered`, half rounding up.
///
/// Clamped to 100: after a seen reset `correct` can exceed `answered`.
fn accuracy_percent(correct: u64, answered: u64) -> u32 {
    if answered == 0 {
        return 0;
    }
    let scaled = correct
        .saturating_mul(200)
        .saturating_add(answered)
        / answered.saturating_mul(2);
    u32::try_from(scaled.min(100)).unwrap_or(100)
}

/// Rows for every known question, in the order given.
#[must_use]
pub fn question_breakdown(
    stats: &Stats,
    numbers: impl IntoIterator<Item = QuestionNumber>,
) -> Vec<QuestionStatsRow> {
    numbers
        .into_iter()
        .map(|number| QuestionStatsRow {
            number,
            seen: stats.seen(number),
            correct: stats.correct(number),
            errors: stats.errors(number),
        })
        .collect()
}

/// Largest exposure count of any question, used to scale per-question bars.
#[must_use]
pub fn max_seen(stats: &Stats) -> u32 {
    stats.per_question_seen().values().copied().max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatsRecord;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn q(n: u64) -> QuestionNumber {
        QuestionNumber::new(n)
    }

    #[test]
    fn empty_stats_summarize_to_zero() {
        let summary = summarize(&Stats::empty(), 256);
        assert_eq!(
            summary,
            StatsSummary {
                unique_seen: 0,
                total_questions: 256,
                accuracy: 0,
                total_attempts: 0,
                total_correct: 0,
            }
        );
    }

    #[test]
    fn accuracy_uses_answered_questions_not_sessions() {
        let stats = Stats::empty()
            .record_submission(&[q(1), q(2), q(3)], &[true, true, false])
            .unwrap();
        let summary = summarize(&stats, 10);
        assert_eq!(summary.unique_seen, 3);
        assert_eq!(summary.total_attempts, 1);
        // 2 of 3 rounds to 67.
        assert_eq!(summary.accuracy, 67);
    }

    #[test]
    fn accuracy_rounds_half_up() {
        assert_eq!(accuracy_percent(1, 8), 13);
        assert_eq!(accuracy_percent(1, 200), 1);
        assert_eq!(accuracy_percent(1, 3), 33);
    }

    #[test]
    fn accuracy_is_clamped_after_seen_reset() {
        let stats = Stats::normalize(StatsRecord {
            per_question_seen: Some(BTreeMap::from([(q(2), 1)])),
            per_question_correct: Some(BTreeMap::from([(q(1), 4), (q(2), 1)])),
            total_attempts: Some(2),
            total_correct: Some(5),
        });
        assert_eq!(summarize(&stats, 2).accuracy, 100);
    }

    #[test]
    fn zero_entries_do_not_count_as_seen() {
        let stats = Stats::normalize(StatsRecord {
            per_question_seen: Some(BTreeMap::from([(q(1), 0), (q(2), 2)])),
            ..StatsRecord::default()
        });
        assert_eq!(summarize(&stats, 2).unique_seen, 1);
    }

    #[test]
    fn breakdown_follows_given_order() {
        let stats = Stats::empty()
            .record_submission(&[q(5), q(5), q(1)], &[true, false, false])
            .unwrap();
        let rows = question_breakdown(&stats, [q(1), q(3), q(5)]);
        assert_eq!(rows[0], QuestionStatsRow { number: q(1), seen: 1, correct: 0, errors: 1 });
        assert_eq!(rows[1], QuestionStatsRow { number: q(3), seen: 0, correct: 0, errors: 0 });
        assert_eq!(rows[2], QuestionStatsRow { number: q(5), seen: 2, correct: 1, errors: 1 });
        assert_eq!(max_seen(&stats), 2);
    }

    proptest! {
        #[test]
        fn accuracy_stays_within_bounds(correct in 0_u64..10_000, answered in 0_u64..10_000) {
            prop_assert!(accuracy_percent(correct, answered) <= 100);
        }
    }
}
