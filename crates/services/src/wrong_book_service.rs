//! Persists wrongly answered questions as a review book.

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use quiz_core::model::{Question, WrongBookRequest, WrongQuestion};
use storage::repository::{
    DEFAULT_WRONG_BOOK_TITLE, WrongBook, WrongBookId, WrongBookRepository, WrongBookSummary,
};

use crate::Clock;
use crate::error::WrongBookError;

/// Timestamp layout of exported books.
const EXPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Serialize)]
struct ExportedBook<'a> {
    title: &'a str,
    generated_at: String,
    total_questions: usize,
    questions: Vec<ExportedQuestion<'a>>,
}

/// Question entry in bank-file shape, keyed by display id.
#[derive(Serialize)]
struct ExportedQuestion<'a> {
    id: u32,
    #[serde(rename = "type")]
    kind: &'static str,
    content: &'a str,
    options: &'a [String],
    user_answer: &'a [String],
    correct_answer: &'a [String],
    analysis: &'a str,
}

impl<'a> From<&'a WrongQuestion> for ExportedQuestion<'a> {
    fn from(question: &'a WrongQuestion) -> Self {
        Self {
            id: question.display_id.value(),
            kind: question.kind.label(),
            content: &question.content,
            options: &question.options,
            user_answer: &question.user_answer,
            correct_answer: &question.correct_answer,
            analysis: &question.analysis,
        }
    }
}

#[derive(Clone)]
pub struct WrongBookService {
    clock: Clock,
    repo: Arc<dyn WrongBookRepository>,
    title: String,
}

impl WrongBookService {
    #[must_use]
    pub fn new(clock: Clock, repo: Arc<dyn WrongBookRepository>) -> Self {
        Self {
            clock,
            repo,
            title: DEFAULT_WRONG_BOOK_TITLE.to_owned(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Resolve the requested display ids against `questions` and persist them.
    ///
    /// Ids that do not map to a session question are skipped.
    ///
    /// # Errors
    ///
    /// Returns `WrongBookError::NothingToSave` if no id resolves to a question,
    /// or `WrongBookError::Storage` if the book cannot be stored.
    pub async fn generate(
        &self,
        questions: &[Question],
        request: &WrongBookRequest,
    ) -> Result<WrongBookId, WrongBookError> {
        let entries = resolve_entries(questions, request);
        if entries.is_empty() {
            return Err(WrongBookError::NothingToSave);
        }

        let book = WrongBook {
            title: self.title.clone(),
            generated_at: self.clock.now(),
            questions: entries,
        };
        let id = self.repo.append_wrong_book(&book).await?;
        tracing::info!(id, total = book.total_questions(), "wrong book saved");
        Ok(id)
    }

    /// Saved books, newest first.
    ///
    /// # Errors
    ///
    /// Returns `WrongBookError::Storage` on read failures.
    pub async fn list(&self, limit: u32) -> Result<Vec<WrongBookSummary>, WrongBookError> {
        Ok(self.repo.list_wrong_books(limit).await?)
    }

    /// # Errors
    ///
    /// Returns `WrongBookError::Storage` if the book is missing or unreadable.
    pub async fn get(&self, id: WrongBookId) -> Result<WrongBook, WrongBookError> {
        Ok(self.repo.get_wrong_book(id).await?)
    }

    /// Write a saved book to `path` as pretty-printed JSON:
    /// `{title, generated_at, total_questions, questions}`.
    ///
    /// # Errors
    ///
    /// Returns `WrongBookError::Storage` if the book is missing, and
    /// `WrongBookError::Io` if the file cannot be written.
    pub async fn export(&self, id: WrongBookId, path: &Path) -> Result<(), WrongBookError> {
        let book = self.repo.get_wrong_book(id).await?;
        let exported = ExportedBook {
            title: &book.title,
            generated_at: book.generated_at.format(EXPORT_TIME_FORMAT).to_string(),
            total_questions: book.total_questions(),
            questions: book.questions.iter().map(ExportedQuestion::from).collect(),
        };
        let json = serde_json::to_string_pretty(&exported)?;
        std::fs::write(path, json)?;
        tracing::info!(id, path = %path.display(), "wrong book exported");
        Ok(())
    }
}

fn resolve_entries(questions: &[Question], request: &WrongBookRequest) -> Vec<WrongQuestion> {
    let mut entries = Vec::with_capacity(request.wrong_ids.len());
    for &display_id in &request.wrong_ids {
        let Some(question) = display_id.to_index().and_then(|index| questions.get(index)) else {
            tracing::warn!(%display_id, "wrong question id outside the session; skipped");
            continue;
        };
        let user_answer = request
            .user_answers
            .get(&display_id)
            .cloned()
            .unwrap_or_default();
        entries.push(WrongQuestion::from_question(display_id, question, user_answer));
    }
    entries
}
