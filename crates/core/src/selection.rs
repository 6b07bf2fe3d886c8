use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::model::QuestionNumber;
use crate::stats::Stats;

/// Default number of questions in one session.
pub const SESSION_SIZE: usize = 20;

/// How a session's questions are prioritized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// Least-seen first, then most-missed, then random.
    #[default]
    Balanced,
    /// Every currently missed question first, backfilled in balanced order.
    #[serde(rename = "missed")]
    MissedFirst,
}

/// Ordering inputs for one question, computed once per selection.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    number: QuestionNumber,
    seen: u32,
    errors: u32,
    rand: f64,
}

impl Candidate {
    fn balanced_cmp(&self, other: &Self) -> Ordering {
        self.seen
            .cmp(&other.seen)
            .then_with(|| other.errors.cmp(&self.errors))
            .then_with(|| self.rand.total_cmp(&other.rand))
    }

    fn missed_cmp(&self, other: &Self) -> Ordering {
        other
            .errors
            .cmp(&self.errors)
            .then_with(|| self.seen.cmp(&other.seen))
            .then_with(|| self.rand.total_cmp(&other.rand))
    }
}

/// Selection result for a session build.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionPlan {
    pub numbers: Vec<QuestionNumber>,
    pub missed_selected: usize,
    pub backfill_selected: usize,
}

impl SelectionPlan {
    /// Total number of questions in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.numbers.len()
    }

    /// Returns true when no questions were selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

/// Orders question numbers for a session according to recorded statistics.
pub struct SelectionBuilder<'a> {
    stats: &'a Stats,
    limit: usize,
}

impl<'a> SelectionBuilder<'a> {
    #[must_use]
    pub fn new(stats: &'a Stats) -> Self {
        Self {
            stats,
            limit: SESSION_SIZE,
        }
    }

    /// Cap the number of selected questions.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Build a selection plan from every known question number.
    ///
    /// - Duplicate numbers are collapsed to their first occurrence.
    /// - An empty input yields an empty plan.
    pub fn build<R: Rng>(
        self,
        policy: SelectionPolicy,
        numbers: impl IntoIterator<Item = QuestionNumber>,
        rng: &mut R,
    ) -> SelectionPlan {
        let candidates = self.candidates(numbers, rng);
        match policy {
            SelectionPolicy::Balanced => self.balanced(candidates),
            SelectionPolicy::MissedFirst => self.missed_first(candidates),
        }
    }

    fn candidates<R: Rng>(
        &self,
        numbers: impl IntoIterator<Item = QuestionNumber>,
        rng: &mut R,
    ) -> Vec<Candidate> {
        let mut unique = HashSet::new();
        numbers
            .into_iter()
            .filter(|n| unique.insert(*n))
            .map(|number| Candidate {
                number,
                seen: self.stats.seen(number),
                errors: self.stats.errors(number),
                rand: rng.random::<f64>(),
            })
            .collect()
    }

    fn balanced(&self, mut candidates: Vec<Candidate>) -> SelectionPlan {
        candidates.sort_by(Candidate::balanced_cmp);
        let numbers: Vec<QuestionNumber> = candidates
            .into_iter()
            .take(self.limit)
            .map(|c| c.number)
            .collect();
        let missed_selected = numbers
            .iter()
            .filter(|&&n| self.stats.errors(n) > 0)
            .count();

        SelectionPlan {
            backfill_selected: numbers.len() - missed_selected,
            missed_selected,
            numbers,
        }
    }

    fn missed_first(&self, candidates: Vec<Candidate>) -> SelectionPlan {
        let mut missed: Vec<Candidate> =
            candidates.iter().filter(|c| c.errors > 0).copied().collect();
        missed.sort_by(Candidate::missed_cmp);

        let mut rest = candidates;
        rest.sort_by(Candidate::balanced_cmp);

        let mut selected_ids = HashSet::new();
        let mut numbers = Vec::with_capacity(self.limit.min(rest.len()));
        for candidate in missed.iter().chain(rest.iter()) {
            if numbers.len() >= self.limit {
                break;
            }
            if selected_ids.insert(candidate.number) {
                numbers.push(candidate.number);
            }
        }

        let missed_selected = missed.len().min(numbers.len());
        SelectionPlan {
            backfill_selected: numbers.len() - missed_selected,
            missed_selected,
            numbers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::fixed_random;
    use crate::stats::StatsRecord;
    use std::collections::BTreeMap;

    fn q(n: u64) -> QuestionNumber {
        QuestionNumber::new(n)
    }

    fn stats_with(seen: &[(u64, u32)], correct: &[(u64, u32)]) -> Stats {
        Stats::normalize(StatsRecord {
            per_question_seen: Some(seen.iter().map(|&(n, c)| (q(n), c)).collect()),
            per_question_correct: Some(correct.iter().map(|&(n, c)| (q(n), c)).collect()),
            total_attempts: None,
            total_correct: None,
        })
    }

    #[test]
    fn balanced_puts_unseen_first() {
        let stats = stats_with(&[(1, 5), (2, 0)], &[(1, 2)]);
        let plan = SelectionBuilder::new(&stats).build(
            SelectionPolicy::Balanced,
            [q(1), q(2)],
            &mut fixed_random().rng(),
        );
        assert_eq!(plan.numbers, vec![q(2), q(1)]);
        assert_eq!(plan.missed_selected, 1);
        assert_eq!(plan.backfill_selected, 1);
    }

    #[test]
    fn balanced_order_is_fixed_when_seen_counts_differ() {
        let stats = stats_with(&[(1, 4), (2, 1), (3, 3), (4, 2)], &[]);
        for seed in 0..16 {
            let plan = SelectionBuilder::new(&stats).build(
                SelectionPolicy::Balanced,
                [q(1), q(2), q(3), q(4), q(5)],
                &mut crate::random::RandomSource::seeded(seed).rng(),
            );
            assert_eq!(plan.numbers, vec![q(5), q(2), q(4), q(3), q(1)]);
        }
    }

    #[test]
    fn balanced_prefers_more_errors_among_equally_seen() {
        let stats = stats_with(&[(1, 3), (2, 3), (3, 3)], &[(1, 3), (2, 0), (3, 2)]);
        let plan = SelectionBuilder::new(&stats).build(
            SelectionPolicy::Balanced,
            [q(1), q(2), q(3)],
            &mut fixed_random().rng(),
        );
        assert_eq!(plan.numbers, vec![q(2), q(3), q(1)]);
    }

    #[test]
    fn balanced_caps_at_session_size() {
        let stats = Stats::empty();
        let plan = SelectionBuilder::new(&stats).build(
            SelectionPolicy::Balanced,
            (1..=50).map(q),
            &mut fixed_random().rng(),
        );
        assert_eq!(plan.total(), SESSION_SIZE);
        let unique: HashSet<_> = plan.numbers.iter().collect();
        assert_eq!(unique.len(), SESSION_SIZE);
    }

    #[test]
    fn empty_input_yields_empty_plan() {
        let stats = Stats::empty();
        for policy in [SelectionPolicy::Balanced, SelectionPolicy::MissedFirst] {
            let plan = SelectionBuilder::new(&stats).build(
                policy,
                Vec::new(),
                &mut fixed_random().rng(),
            );
            assert!(plan.is_empty());
        }
    }

    #[test]
    fn duplicate_numbers_are_collapsed() {
        let stats = Stats::empty();
        let plan = SelectionBuilder::new(&stats).build(
            SelectionPolicy::Balanced,
            [q(1), q(1), q(2)],
            &mut fixed_random().rng(),
        );
        assert_eq!(plan.total(), 2);
    }

    #[test]
    fn missed_first_orders_by_errors_then_backfills() {
        // 3 has two errors, 1 has one error, 2 and 4 have none.
        let stats = stats_with(&[(1, 1), (2, 2), (3, 5), (4, 0)], &[(2, 2), (3, 3)]);
        let plan = SelectionBuilder::new(&stats).build(
            SelectionPolicy::MissedFirst,
            [q(1), q(2), q(3), q(4)],
            &mut fixed_random().rng(),
        );

        assert_eq!(plan.numbers, vec![q(3), q(1), q(4), q(2)]);
        assert_eq!(plan.missed_selected, 2);
        assert_eq!(plan.backfill_selected, 2);
    }

    #[test]
    fn missed_questions_precede_all_others_up_to_cap() {
        let mut seen = BTreeMap::new();
        let mut correct = BTreeMap::new();
        for n in 1..=40_u64 {
            seen.insert(q(n), 2);
            // Every third question has outstanding errors.
            correct.insert(q(n), if n % 3 == 0 { 0 } else { 2 });
        }
        let stats = Stats::normalize(StatsRecord {
            per_question_seen: Some(seen),
            per_question_correct: Some(correct),
            ..StatsRecord::default()
        });

        let plan = SelectionBuilder::new(&stats).build(
            SelectionPolicy::MissedFirst,
            (1..=40).map(q),
            &mut fixed_random().rng(),
        );

        assert_eq!(plan.total(), SESSION_SIZE);
        let first_clean = plan
            .numbers
            .iter()
            .position(|&n| stats.errors(n) == 0)
            .unwrap();
        assert_eq!(first_clean, 13);
        assert!(plan.numbers[first_clean..].iter().all(|&n| stats.errors(n) == 0));
        assert_eq!(plan.missed_selected, 13);
    }

    #[test]
    fn missed_first_respects_limit_when_many_are_missed() {
        let seen: Vec<(u64, u32)> = (1..=30).map(|n| (n, 1)).collect();
        let stats = stats_with(&seen, &[]);
        let plan = SelectionBuilder::new(&stats).with_limit(5).build(
            SelectionPolicy::MissedFirst,
            (1..=30).map(q),
            &mut fixed_random().rng(),
        );
        assert_eq!(plan.total(), 5);
        assert_eq!(plan.missed_selected, 5);
        assert_eq!(plan.backfill_selected, 0);
    }

    #[test]
    fn policy_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&SelectionPolicy::MissedFirst).unwrap(),
            "\"missed\""
        );
        let parsed: SelectionPolicy = serde_json::from_str("\"balanced\"").unwrap();
        assert_eq!(parsed, SelectionPolicy::Balanced);
    }
}
