#![forbid(unsafe_code)]

pub mod error;
pub mod extraction;
pub mod sessions;
pub mod settings_service;
pub mod wrong_book_service;

pub use quiz_core::Clock;

pub use error::{ProviderError, QuizError, SettingsServiceError, ValidationError, WrongBookError};
pub use extraction::{BankStats, Extraction, ExtractionRequest, ExtractionService};
pub use settings_service::SettingsService;
pub use wrong_book_service::WrongBookService;

pub use sessions::{QuestionView, QuizLoopService, QuizNavigator, SelectOutcome};
