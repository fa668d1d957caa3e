use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Runs the schema migrations for wrong-question books and settings.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: wrong-question books and quiz settings.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS wrong_books (
                    id INTEGER PRIMARY KEY,
                    title TEXT NOT NULL,
                    generated_at TEXT NOT NULL,
                    total_questions INTEGER NOT NULL CHECK (total_questions >= 0)
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS wrong_book_questions (
                    book_id INTEGER NOT NULL,
                    position INTEGER NOT NULL CHECK (position >= 0),
                    display_id INTEGER NOT NULL CHECK (display_id > 0),
                    kind TEXT NOT NULL,
                    content TEXT NOT NULL,
                    options TEXT NOT NULL,
                    user_answer TEXT NOT NULL,
                    correct_answer TEXT NOT NULL,
                    analysis TEXT NOT NULL,
                    PRIMARY KEY (book_id, position),
                    FOREIGN KEY (book_id) REFERENCES wrong_books(id) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS quiz_settings (
                    id INTEGER PRIMARY KEY CHECK (id = 1),
                    study_mode INTEGER NOT NULL CHECK (study_mode IN (0, 1)),
                    auto_reveal INTEGER NOT NULL CHECK (auto_reveal IN (0, 1))
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_wrong_books_generated
                    ON wrong_books (generated_at);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
    }

    Ok(())
}
