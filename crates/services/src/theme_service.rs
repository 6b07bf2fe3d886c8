use std::sync::Arc;

use quiz_core::model::ThemePreference;
use storage::repository::{KeyValueStore, THEME_KEY};

use crate::error::ThemeServiceError;

#[derive(Clone)]
pub struct ThemeService {
    values: Arc<dyn KeyValueStore>,
}

impl ThemeService {
    #[must_use]
    pub fn new(values: Arc<dyn KeyValueStore>) -> Self {
        Self { values }
    }

    /// Load the stored preference (or `System` if missing, invalid, or unreadable).
    pub async fn load(&self) -> ThemePreference {
        match self.values.get(THEME_KEY).await {
            Ok(raw) => ThemePreference::parse_or_default(raw.as_deref()),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read theme preference");
                ThemePreference::default()
            }
        }
    }

    /// Persist a new preference.
    ///
    /// # Errors
    ///
    /// Returns `ThemeServiceError` on storage failures.
    pub async fn save(&self, preference: ThemePreference) -> Result<(), ThemeServiceError> {
        self.values.set(THEME_KEY, preference.as_str()).await?;
        Ok(())
    }

    /// Advance to the next preference in the cycle and persist it.
    ///
    /// # Errors
    ///
    /// Returns `ThemeServiceError` on storage failures.
    pub async fn cycle(&self) -> Result<ThemePreference, ThemeServiceError> {
        let next = self.load().await.next();
        self.save(next).await?;
        Ok(next)
    }
}
