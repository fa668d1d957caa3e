use async_trait::async_trait;
use quiz_core::model::WrongQuestion;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{
    decode_strings, display_id_from_i64, encode_strings, parse_question_type, ser, u32_from_i64,
};
use crate::repository::{
    StorageError, WrongBook, WrongBookId, WrongBookRepository, WrongBookSummary,
};

fn map_question_row(row: &sqlx::sqlite::SqliteRow) -> Result<WrongQuestion, StorageError> {
    let display_id = display_id_from_i64(row.try_get::<i64, _>("display_id").map_err(ser)?)?;
    let kind = parse_question_type(&row.try_get::<String, _>("kind").map_err(ser)?)?;
    let options = decode_strings("options", &row.try_get::<String, _>("options").map_err(ser)?)?;
    let user_answer = decode_strings(
        "user_answer",
        &row.try_get::<String, _>("user_answer").map_err(ser)?,
    )?;
    let correct_answer = decode_strings(
        "correct_answer",
        &row.try_get::<String, _>("correct_answer").map_err(ser)?,
    )?;

    Ok(WrongQuestion {
        display_id,
        kind,
        content: row.try_get("content").map_err(ser)?,
        options,
        user_answer,
        correct_answer,
        analysis: row.try_get("analysis").map_err(ser)?,
    })
}

#[async_trait]
impl WrongBookRepository for SqliteRepository {
    async fn append_wrong_book(&self, book: &WrongBook) -> Result<WrongBookId, StorageError> {
        let total = i64::try_from(book.total_questions())
            .map_err(|_| StorageError::Serialization("total_questions overflow".into()))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let res = sqlx::query(
            r"
                INSERT INTO wrong_books (title, generated_at, total_questions)
                VALUES (?1, ?2, ?3)
            ",
        )
        .bind(&book.title)
        .bind(book.generated_at)
        .bind(total)
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;
        let book_id = res.last_insert_rowid();

        for (position, question) in book.questions.iter().enumerate() {
            let position = i64::try_from(position)
                .map_err(|_| StorageError::Serialization("position overflow".into()))?;
            sqlx::query(
                r"
                    INSERT INTO wrong_book_questions (
                        book_id, position, display_id, kind, content,
                        options, user_answer, correct_answer, analysis
                    )
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ",
            )
            .bind(book_id)
            .bind(position)
            .bind(i64::from(question.display_id.value()))
            .bind(question.kind.as_str())
            .bind(&question.content)
            .bind(encode_strings(&question.options)?)
            .bind(encode_strings(&question.user_answer)?)
            .bind(encode_strings(&question.correct_answer)?)
            .bind(&question.analysis)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(book_id)
    }

    async fn get_wrong_book(&self, id: WrongBookId) -> Result<WrongBook, StorageError> {
        let row = sqlx::query(
            r"
                SELECT title, generated_at
                FROM wrong_books
                WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .ok_or(StorageError::NotFound)?;

        let title: String = row.try_get("title").map_err(ser)?;
        let generated_at = row.try_get("generated_at").map_err(ser)?;

        let rows = sqlx::query(
            r"
                SELECT
                    display_id, kind, content, options,
                    user_answer, correct_answer, analysis
                FROM wrong_book_questions
                WHERE book_id = ?1
                ORDER BY position ASC
            ",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut questions = Vec::with_capacity(rows.len());
        for row in &rows {
            questions.push(map_question_row(row)?);
        }

        Ok(WrongBook {
            title,
            generated_at,
            questions,
        })
    }

    async fn list_wrong_books(&self, limit: u32) -> Result<Vec<WrongBookSummary>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, title, generated_at, total_questions
                FROM wrong_books
                ORDER BY generated_at DESC, id DESC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(WrongBookSummary {
                id: row.try_get("id").map_err(ser)?,
                title: row.try_get("title").map_err(ser)?,
                generated_at: row.try_get("generated_at").map_err(ser)?,
                total_questions: u32_from_i64(
                    "total_questions",
                    row.try_get::<i64, _>("total_questions").map_err(ser)?,
                )?,
            });
        }
        Ok(out)
    }
}
