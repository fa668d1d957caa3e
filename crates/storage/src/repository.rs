use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{Question, QuizSettings, WrongQuestion};
use std::sync::{Arc, Mutex};
use thiserror::Error;

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

    #[error("invalid question bank path: {0}")]
    InvalidPath(String),

    #[error("io error: {0}")]
    Io(String),
}

/// Storage identifier for a persisted wrong-question book.
///
/// NOTE: This is `i64` to match `SQLite` row IDs.
pub type WrongBookId = i64;

/// Default title for generated wrong-question books.
pub const DEFAULT_WRONG_BOOK_TITLE: &str = "错题本";

/// A saved collection of wrongly answered questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrongBook {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub questions: Vec<WrongQuestion>,
}

impl WrongBook {
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }
}

/// Listing entry for saved wrong-question books.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrongBookSummary {
    pub id: WrongBookId,
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub total_questions: u32,
}

/// Source of questions for extraction.
#[async_trait]
pub trait QuestionBankRepository: Send + Sync {
    /// All questions of the loaded bank, in bank order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be read.
    async fn list_questions(&self) -> Result<Vec<Question>, StorageError>;
}

/// Sink for generated wrong-question books.
#[async_trait]
pub trait WrongBookRepository: Send + Sync {
    /// Persist a wrong-question book and return its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the book cannot be stored.
    async fn append_wrong_book(&self, book: &WrongBook) -> Result<WrongBookId, StorageError>;

    /// Fetch a book by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_wrong_book(&self, id: WrongBookId) -> Result<WrongBook, StorageError>;

    /// List saved books, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn list_wrong_books(&self, limit: u32) -> Result<Vec<WrongBookSummary>, StorageError>;
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Load persisted settings, `None` if never saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn get_settings(&self) -> Result<Option<QuizSettings>, StorageError>;

    /// Persist settings, replacing previous ones.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on write failures.
    async fn save_settings(&self, settings: &QuizSettings) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<Vec<Question>>>,
    wrong_books: Arc<Mutex<Vec<WrongBook>>>,
    settings: Arc<Mutex<Option<QuizSettings>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_questions(questions: Vec<Question>) -> Self {
        Self {
            questions: Arc::new(Mutex::new(questions)),
            ..Self::default()
        }
    }

    /// Replace the question bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn set_questions(&self, questions: Vec<Question>) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = questions;
        Ok(())
    }
}

fn book_id(position: usize) -> Result<WrongBookId, StorageError> {
    WrongBookId::try_from(position + 1)
        .map_err(|_| StorageError::Serialization("wrong book id overflow".into()))
}

#[async_trait]
impl QuestionBankRepository for InMemoryRepository {
    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl WrongBookRepository for InMemoryRepository {
    async fn append_wrong_book(&self, book: &WrongBook) -> Result<WrongBookId, StorageError> {
        let mut guard = self
            .wrong_books
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(book.clone());
        book_id(guard.len() - 1)
    }

    async fn get_wrong_book(&self, id: WrongBookId) -> Result<WrongBook, StorageError> {
        let guard = self
            .wrong_books
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let position = usize::try_from(id)
            .ok()
            .and_then(|id| id.checked_sub(1))
            .ok_or(StorageError::NotFound)?;
        guard.get(position).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_wrong_books(&self, limit: u32) -> Result<Vec<WrongBookSummary>, StorageError> {
        let guard = self
            .wrong_books
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        let mut items = Vec::with_capacity(guard.len());
        for (position, book) in guard.iter().enumerate() {
            items.push(WrongBookSummary {
                id: book_id(position)?,
                title: book.title.clone(),
                generated_at: book.generated_at,
                total_questions: u32::try_from(book.total_questions()).unwrap_or(u32::MAX),
            });
        }
        items.sort_by(|a, b| b.generated_at.cmp(&a.generated_at).then(b.id.cmp(&a.id)));
        items.truncate(limit);
        Ok(items)
    }
}

#[async_trait]
impl SettingsRepository for InMemoryRepository {
    async fn get_settings(&self) -> Result<Option<QuizSettings>, StorageError> {
        let guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(*guard)
    }

    async fn save_settings(&self, settings: &QuizSettings) -> Result<(), StorageError> {
        let mut guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(*settings);
        Ok(())
    }
}

/// Aggregates persistence repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub wrong_books: Arc<dyn WrongBookRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}
