#![forbid(unsafe_code)]

pub mod question_bank;
pub mod repository;
pub mod sqlite;

pub use question_bank::JsonQuestionBank;
pub use repository::{
    InMemoryRepository, KeyValueStore, QuestionSource, STATS_KEY, Storage, StorageError,
    THEME_KEY,
};
