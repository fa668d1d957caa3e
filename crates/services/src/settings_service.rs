use std::sync::Arc;

use quiz_core::model::QuizSettings;
use storage::repository::SettingsRepository;

use crate::error::SettingsServiceError;

#[derive(Clone)]
pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    #[must_use]
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    /// Load persisted settings (or defaults if missing).
    ///
    /// # Errors
    ///
    /// Returns `SettingsServiceError` on storage failures.
    pub async fn load(&self) -> Result<QuizSettings, SettingsServiceError> {
        let settings = self.repo.get_settings().await?;
        Ok(settings.unwrap_or_default())
    }

    /// Persist new settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsServiceError` if persistence fails.
    pub async fn save(&self, settings: QuizSettings) -> Result<QuizSettings, SettingsServiceError> {
        self.repo.save_settings(&settings).await?;
        tracing::debug!(
            study_mode = settings.study_mode(),
            auto_reveal = settings.auto_reveal(),
            "settings saved"
        );
        Ok(settings)
    }
}
