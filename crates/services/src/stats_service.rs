use std::sync::Arc;

use quiz_core::model::QuestionNumber;
use quiz_core::{
    QuestionStatsRow, Stats, StatsRecord, StatsSummary, question_breakdown, summarize,
};
use storage::repository::{KeyValueStore, STATS_KEY};

use crate::error::StatsServiceError;

/// Loads, updates, and persists the statistics snapshot.
///
/// Every mutation is written back immediately; concurrent writers follow
/// last-write-wins at the store.
#[derive(Clone)]
pub struct StatsService {
    values: Arc<dyn KeyValueStore>,
}

impl StatsService {
    #[must_use]
    pub fn new(values: Arc<dyn KeyValueStore>) -> Self {
        Self { values }
    }

    /// Load the persisted snapshot, or empty stats if it is missing or unreadable.
    pub async fn load(&self) -> Stats {
        let raw = match self.values.get(STATS_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Stats::empty(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stats, starting empty");
                return Stats::empty();
            }
        };

        match serde_json::from_str::<StatsRecord>(&raw) {
            Ok(record) => Stats::normalize(record),
            Err(err) => {
                tracing::warn!(error = %err, "stored stats are unreadable, starting empty");
                Stats::empty()
            }
        }
    }

    /// Persist a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StatsServiceError` if encoding or storage fails.
    pub async fn save(&self, stats: &Stats) -> Result<(), StatsServiceError> {
        let raw = serde_json::to_string(stats)?;
        self.values.set(STATS_KEY, &raw).await?;
        Ok(())
    }

    /// Record one submitted session and persist the result.
    ///
    /// # Errors
    ///
    /// Returns `StatsServiceError::Stats` if the inputs differ in length, or a
    /// storage error if the new snapshot cannot be saved.
    pub async fn record_submission(
        &self,
        numbers: &[QuestionNumber],
        correctness: &[bool],
    ) -> Result<Stats, StatsServiceError> {
        let next = self.load().await.record_submission(numbers, correctness)?;
        self.save(&next).await?;
        tracing::info!(
            questions = numbers.len(),
            correct = correctness.iter().filter(|&&c| c).count(),
            "recorded submission"
        );
        Ok(next)
    }

    /// Clear exposure counts, keeping correct counts and totals, and persist.
    ///
    /// # Errors
    ///
    /// Returns `StatsServiceError` if the new snapshot cannot be saved.
    pub async fn reset_seen(&self) -> Result<Stats, StatsServiceError> {
        let next = self.load().await.reset_seen();
        self.save(&next).await?;
        tracing::info!("reset seen counts");
        Ok(next)
    }

    pub async fn summary(&self, total_questions: usize) -> StatsSummary {
        summarize(&self.load().await, total_questions)
    }

    pub async fn breakdown(&self, numbers: &[QuestionNumber]) -> Vec<QuestionStatsRow> {
        question_breakdown(&self.load().await, numbers.iter().copied())
    }
}
