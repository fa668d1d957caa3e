use std::sync::Arc;

use quiz_core::model::{QuizResult, QuizSession, QuizSettings};
use storage::repository::{QuestionBankRepository, SettingsRepository, WrongBookId, WrongBookRepository};

use super::navigator::QuizNavigator;
use crate::Clock;
use crate::error::QuizError;
use crate::extraction::{BankStats, ExtractionRequest, ExtractionService};
use crate::settings_service::SettingsService;
use crate::wrong_book_service::WrongBookService;

/// Orchestrates a quiz from extraction to the saved wrong-question book.
///
/// Restarting is dropping the navigator and calling [`start_quiz`] again.
///
/// [`start_quiz`]: QuizLoopService::start_quiz
#[derive(Clone)]
pub struct QuizLoopService {
    extraction: ExtractionService,
    settings: SettingsService,
    wrong_books: WrongBookService,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        bank: Arc<dyn QuestionBankRepository>,
        wrong_books: Arc<dyn WrongBookRepository>,
        settings: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            extraction: ExtractionService::new(bank),
            settings: SettingsService::new(settings),
            wrong_books: WrongBookService::new(clock, wrong_books),
        }
    }

    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.extraction = self.extraction.with_shuffle(shuffle);
        self
    }

    #[must_use]
    pub fn settings_service(&self) -> &SettingsService {
        &self.settings
    }

    #[must_use]
    pub fn wrong_book_service(&self) -> &WrongBookService {
        &self.wrong_books
    }

    /// # Errors
    ///
    /// Returns `QuizError::Provider` if the bank cannot be read.
    pub async fn bank_stats(&self) -> Result<BankStats, QuizError> {
        Ok(self.extraction.bank_stats().await?)
    }

    /// Extract questions and start navigating them with the persisted settings.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Provider` for invalid requests or bank failures, and
    /// `QuizError::Settings` if settings cannot be loaded.
    pub async fn start_quiz(&self, request: &ExtractionRequest) -> Result<QuizNavigator, QuizError> {
        let settings = self.settings.load().await?;
        self.start_quiz_with_settings(request, settings).await
    }

    /// Like [`QuizLoopService::start_quiz`] with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Provider` for invalid requests or bank failures.
    pub async fn start_quiz_with_settings(
        &self,
        request: &ExtractionRequest,
        settings: QuizSettings,
    ) -> Result<QuizNavigator, QuizError> {
        let extraction = self.extraction.extract(request).await?;
        tracing::info!(
            questions = extraction.count,
            study_mode = settings.study_mode(),
            auto_reveal = settings.auto_reveal(),
            "quiz started"
        );
        Ok(QuizNavigator::new(
            QuizSession::new(extraction.questions),
            settings,
        ))
    }

    /// Grade the quiz. The session is left untouched and may be submitted again.
    #[must_use]
    pub fn submit(&self, navigator: &QuizNavigator) -> QuizResult {
        let result = navigator.submit();
        tracing::info!(
            score = result.score(),
            correct = result.correct_count(),
            total = result.total_questions(),
            "quiz submitted"
        );
        result
    }

    /// Save the wrong questions of `result` as a new book.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::WrongBook` when there is nothing to save or the
    /// book cannot be stored.
    pub async fn save_wrong_book(
        &self,
        navigator: &QuizNavigator,
        result: &QuizResult,
    ) -> Result<WrongBookId, QuizError> {
        let request = result.wrong_book_request();
        Ok(self
            .wrong_books
            .generate(navigator.session().questions(), &request)
            .await?)
    }
}
