use async_trait::async_trait;
use quiz_core::model::RawQuestion;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Key holding the serialized statistics snapshot.
pub const STATS_KEY: &str = "quiz_stats_v1";

/// Key holding the theme preference string.
pub const THEME_KEY: &str = "quiz_theme_v1";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persistence port: a flat string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Source of the full, ordered question bank.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Every question in bank order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be read or parsed.
    async fn list_all(&self) -> Result<Vec<RawQuestion>, StorageError>;

    /// Number of questions in the bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be read or parsed.
    async fn total(&self) -> Result<usize, StorageError> {
        Ok(self.list_all().await?.len())
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    values: Arc<Mutex<HashMap<String, String>>>,
    questions: Arc<Mutex<Vec<RawQuestion>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(HashMap::new())),
            questions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Build a repository serving the given question bank.
    #[must_use]
    pub fn with_questions(questions: Vec<RawQuestion>) -> Self {
        Self {
            values: Arc::new(Mutex::new(HashMap::new())),
            questions: Arc::new(Mutex::new(questions)),
        }
    }

    /// Replace the served question bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn replace_questions(&self, questions: Vec<RawQuestion>) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = questions;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for InMemoryRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[async_trait]
impl QuestionSource for InMemoryRepository {
    async fn list_all(&self) -> Result<Vec<RawQuestion>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn total(&self) -> Result<usize, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len())
    }
}

/// Aggregates the persistence and question ports behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub values: Arc<dyn KeyValueStore>,
    pub questions: Arc<dyn QuestionSource>,
}

impl Storage {
    #[must_use]
    pub fn in_memory(questions: Vec<RawQuestion>) -> Self {
        let repo = InMemoryRepository::with_questions(questions);
        let values: Arc<dyn KeyValueStore> = Arc::new(repo.clone());
        let questions: Arc<dyn QuestionSource> = Arc::new(repo);
        Self { values, questions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerId, QuestionNumber};

    fn build_question(n: u64) -> RawQuestion {
        RawQuestion::new(
            QuestionNumber::new(n),
            format!("Q{n}"),
            [(AnswerId::from(1_u64), "A".to_string()), (AnswerId::from(2_u64), "B".to_string())],
            AnswerId::from(1_u64),
        )
    }

    #[tokio::test]
    async fn values_round_trip_and_overwrite() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.get(STATS_KEY).await.unwrap(), None);

        repo.set(STATS_KEY, "{}").await.unwrap();
        repo.set(STATS_KEY, "{\"totalAttempts\":1}").await.unwrap();

        assert_eq!(
            repo.get(STATS_KEY).await.unwrap().as_deref(),
            Some("{\"totalAttempts\":1}")
        );
        assert_eq!(repo.get(THEME_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn serves_questions_in_bank_order() {
        let repo = InMemoryRepository::with_questions(vec![build_question(3), build_question(1)]);
        let all = repo.list_all().await.unwrap();
        assert_eq!(all[0].number, QuestionNumber::new(3));
        assert_eq!(repo.total().await.unwrap(), 2);

        repo.replace_questions(Vec::new()).unwrap();
        assert_eq!(repo.total().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn storage_shares_one_backend() {
        let storage = Storage::in_memory(vec![build_question(1)]);
        storage.values.set(THEME_KEY, "dark").await.unwrap();
        assert_eq!(
            storage.values.get(THEME_KEY).await.unwrap().as_deref(),
            Some("dark")
        );
        assert_eq!(storage.questions.total().await.unwrap(), 1);
    }
}
