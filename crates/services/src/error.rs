//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuestionType, SessionStateError};
use storage::repository::StorageError;

/// Input rejected before any state changes; the message is meant for the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error(transparent)]
    InvalidIndex(#[from] SessionStateError),
    #[error("{kind} count cannot be negative (got {requested})")]
    NegativeCount { kind: QuestionType, requested: i64 },
    #[error("{kind} count cannot exceed the available {available} questions (got {requested})")]
    CountExceedsAvailable {
        kind: QuestionType,
        requested: i64,
        available: usize,
    },
    #[error("select at least one question type")]
    NoTypeSelected,
}

/// Errors emitted by the question-bank provider (`ExtractionService`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `WrongBookService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WrongBookError {
    #[error("no wrong questions to save")]
    NothingToSave,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to write wrong book: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode wrong book: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors emitted by `SettingsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the quiz loop orchestration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    WrongBook(#[from] WrongBookError),
    #[error(transparent)]
    Settings(#[from] SettingsServiceError),
}
