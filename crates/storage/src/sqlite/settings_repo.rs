use async_trait::async_trait;
use quiz_core::model::QuizSettings;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::ser;
use crate::repository::{SettingsRepository, StorageError};

#[async_trait]
impl SettingsRepository for SqliteRepository {
    async fn get_settings(&self) -> Result<Option<QuizSettings>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT study_mode, auto_reveal
            FROM quiz_settings
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let study_mode: bool = row.try_get("study_mode").map_err(ser)?;
        let auto_reveal: bool = row.try_get("auto_reveal").map_err(ser)?;
        Ok(Some(QuizSettings::new(study_mode, auto_reveal)))
    }

    async fn save_settings(&self, settings: &QuizSettings) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO quiz_settings (id, study_mode, auto_reveal)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                study_mode = excluded.study_mode,
                auto_reveal = excluded.auto_reveal
            ",
        )
        .bind(1_i64)
        .bind(settings.study_mode())
        .bind(settings.auto_reveal())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
