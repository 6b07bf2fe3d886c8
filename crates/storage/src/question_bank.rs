use async_trait::async_trait;
use quiz_core::model::RawQuestion;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::repository::{QuestionSource, StorageError};

/// Question bank backed by a JSON array of raw questions on disk.
///
/// The file is re-read on every call so edits are picked up without a restart.
#[derive(Debug, Clone)]
pub struct JsonQuestionBank {
    path: PathBuf,
}

impl JsonQuestionBank {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse a question bank document.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the JSON is invalid or two
/// questions share a number.
pub fn parse_bank(raw: &str) -> Result<Vec<RawQuestion>, StorageError> {
    let questions: Vec<RawQuestion> =
        serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))?;

    let mut numbers = HashSet::with_capacity(questions.len());
    for question in &questions {
        if !numbers.insert(question.number) {
            return Err(StorageError::Serialization(format!(
                "duplicate question number {}",
                question.number
            )));
        }
    }
    Ok(questions)
}

#[async_trait]
impl QuestionSource for JsonQuestionBank {
    async fn list_all(&self) -> Result<Vec<RawQuestion>, StorageError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => StorageError::NotFound,
                _ => StorageError::Connection(format!("{}: {err}", self.path.display())),
            })?;
        let questions = parse_bank(&raw)?;
        tracing::debug!(
            path = %self.path.display(),
            count = questions.len(),
            "loaded question bank"
        );
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerId, QuestionNumber};
    use std::io::Write;

    const BANK: &str = r#"[
        {"number": 1, "text": "First?", "answers": {"1": "a", "2": "b"}, "correct": 2},
        {"number": 2, "text": "Second?", "answers": {"1": "c", "2": "d", "3": "e"}, "correct": "3"}
    ]"#;

    #[test]
    fn parses_integer_and_string_correct_ids() {
        let questions = parse_bank(BANK).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].correct, AnswerId::new("2"));
        assert_eq!(questions[1].correct, AnswerId::new("3"));
        assert_eq!(questions[1].number, QuestionNumber::new(2));
    }

    #[test]
    fn rejects_duplicate_numbers() {
        let raw = r#"[
            {"number": 1, "text": "a", "answers": {"1": "x"}, "correct": 1},
            {"number": 1, "text": "b", "answers": {"1": "y"}, "correct": 1}
        ]"#;
        let err = parse_bank(raw).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            parse_bank("not json"),
            Err(StorageError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn reads_bank_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BANK.as_bytes()).unwrap();

        let bank = JsonQuestionBank::new(file.path());
        assert_eq!(bank.total().await.unwrap(), 2);
        assert_eq!(bank.list_all().await.unwrap()[0].text, "First?");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let bank = JsonQuestionBank::new(dir.path().join("missing.json"));
        assert!(matches!(bank.list_all().await, Err(StorageError::NotFound)));
    }
}
