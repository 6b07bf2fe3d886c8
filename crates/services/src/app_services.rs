use std::path::PathBuf;
use std::sync::Arc;

use quiz_core::RandomSource;
use quiz_core::model::RawQuestion;
use storage::repository::Storage;

use crate::error::AppServicesError;
use crate::quiz_service::QuizService;
use crate::sessions::SessionService;
use crate::stats_service::StatsService;
use crate::theme_service::ThemeService;

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    quiz: Arc<QuizService>,
    stats: Arc<StatsService>,
    sessions: Arc<SessionService>,
    theme: Arc<ThemeService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and a JSON question bank.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(
        db_url: &str,
        bank_path: impl Into<PathBuf>,
        random: RandomSource,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url, bank_path).await?;
        Ok(Self::from_storage(&storage, random))
    }

    /// Build services over a fully in-memory backend.
    #[must_use]
    pub fn in_memory(questions: Vec<RawQuestion>, random: RandomSource) -> Self {
        Self::from_storage(&Storage::in_memory(questions), random)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, random: RandomSource) -> Self {
        let quiz = Arc::new(QuizService::new(Arc::clone(&storage.questions), random));
        let stats = Arc::new(StatsService::new(Arc::clone(&storage.values)));
        let sessions = Arc::new(SessionService::new(
            Arc::clone(&quiz),
            Arc::clone(&stats),
            random,
        ));
        let theme = Arc::new(ThemeService::new(Arc::clone(&storage.values)));

        Self {
            quiz,
            stats,
            sessions,
            theme,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn stats(&self) -> Arc<StatsService> {
        Arc::clone(&self.stats)
    }

    #[must_use]
    pub fn sessions(&self) -> Arc<SessionService> {
        Arc::clone(&self.sessions)
    }

    #[must_use]
    pub fn theme(&self) -> Arc<ThemeService> {
        Arc::clone(&self.theme)
    }
}
