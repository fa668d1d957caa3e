//! Random extraction of a quiz from the loaded question bank.

use rand::rng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use std::sync::Arc;

use quiz_core::model::{Question, QuestionType};
use storage::repository::QuestionBankRepository;

use crate::error::{ProviderError, ValidationError};

/// Requested number of questions per type.
///
/// Counts are kept as `i64` so negative user input reaches validation
/// instead of being lost in a parse step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionRequest {
    counts: BTreeMap<QuestionType, i64>,
}

impl ExtractionRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_count(mut self, kind: QuestionType, count: i64) -> Self {
        self.set_count(kind, count);
        self
    }

    pub fn set_count(&mut self, kind: QuestionType, count: i64) {
        self.counts.insert(kind, count);
    }

    #[must_use]
    pub fn counts(&self) -> &BTreeMap<QuestionType, i64> {
        &self.counts
    }
}

/// Questions drawn for a new session.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub questions: Vec<Question>,
    pub count: usize,
}

/// Per-type availability of the loaded bank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BankStats {
    pub total: usize,
    pub by_type: BTreeMap<QuestionType, usize>,
}

impl BankStats {
    #[must_use]
    pub fn from_questions(questions: &[Question]) -> Self {
        let mut by_type = BTreeMap::new();
        for question in questions {
            *by_type.entry(question.kind()).or_insert(0) += 1;
        }
        Self {
            total: questions.len(),
            by_type,
        }
    }

    #[must_use]
    pub fn available(&self, kind: QuestionType) -> usize {
        self.by_type.get(&kind).copied().unwrap_or(0)
    }
}

/// Draws questions from a bank according to per-type counts.
#[derive(Clone)]
pub struct ExtractionService {
    bank: Arc<dyn QuestionBankRepository>,
    shuffle: bool,
}

impl ExtractionService {
    #[must_use]
    pub fn new(bank: Arc<dyn QuestionBankRepository>) -> Self {
        Self {
            bank,
            shuffle: true,
        }
    }

    /// Disable shuffling to take the first questions of each type in bank order.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Per-type counts of the loaded bank.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Storage` if the bank cannot be read.
    pub async fn bank_stats(&self) -> Result<BankStats, ProviderError> {
        let questions = self.bank.list_questions().await?;
        Ok(BankStats::from_questions(&questions))
    }

    /// Draw a new quiz.
    ///
    /// Questions are grouped by type in display order; within a type they are
    /// sampled without replacement.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Validation` for negative counts, counts above
    /// availability, or a request with no positive count, and
    /// `ProviderError::Storage` if the bank cannot be read.
    pub async fn extract(&self, request: &ExtractionRequest) -> Result<Extraction, ProviderError> {
        let bank = self.bank.list_questions().await?;
        let stats = BankStats::from_questions(&bank);
        let counts = validate_counts(request, &stats)?;

        let questions = sample(&bank, &counts, self.shuffle);
        tracing::info!(
            requested = counts.values().sum::<usize>(),
            extracted = questions.len(),
            shuffle = self.shuffle,
            "questions extracted"
        );
        Ok(Extraction {
            count: questions.len(),
            questions,
        })
    }
}

/// Check a request against bank availability and drop zero counts.
///
/// # Errors
///
/// Returns the first failing type's `ValidationError`, checked in display order.
pub fn validate_counts(
    request: &ExtractionRequest,
    stats: &BankStats,
) -> Result<BTreeMap<QuestionType, usize>, ValidationError> {
    let mut counts = BTreeMap::new();
    for (&kind, &requested) in request.counts() {
        let available = stats.available(kind);
        let Ok(count) = usize::try_from(requested) else {
            return Err(ValidationError::NegativeCount { kind, requested });
        };
        if count > available {
            return Err(ValidationError::CountExceedsAvailable {
                kind,
                requested,
                available,
            });
        }
        if count > 0 {
            counts.insert(kind, count);
        }
    }

    if counts.is_empty() {
        return Err(ValidationError::NoTypeSelected);
    }
    Ok(counts)
}

fn sample(bank: &[Question], counts: &BTreeMap<QuestionType, usize>, shuffle: bool) -> Vec<Question> {
    let mut rng = rng();
    let mut selected = Vec::with_capacity(counts.values().sum());

    for kind in QuestionType::ALL {
        let Some(&count) = counts.get(&kind) else {
            continue;
        };
        let mut pool: Vec<&Question> = bank.iter().filter(|q| q.kind() == kind).collect();
        if shuffle {
            pool.shuffle(&mut rng);
        }
        selected.extend(pool.into_iter().take(count).cloned());
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use storage::repository::InMemoryRepository;

    fn question(kind: QuestionType, content: &str) -> Question {
        Question::new(kind, content, Vec::new(), vec!["A".into()], "").unwrap()
    }

    fn bank() -> Vec<Question> {
        vec![
            question(QuestionType::FillBlank, "f1"),
            question(QuestionType::SingleChoice, "s1"),
            question(QuestionType::SingleChoice, "s2"),
            question(QuestionType::TrueFalse, "t1"),
            question(QuestionType::SingleChoice, "s3"),
            question(QuestionType::FillBlank, "f2"),
        ]
    }

    fn service(shuffle: bool) -> ExtractionService {
        ExtractionService::new(Arc::new(InMemoryRepository::with_questions(bank())))
            .with_shuffle(shuffle)
    }

    #[tokio::test]
    async fn stats_count_each_type() {
        let stats = service(true).bank_stats().await.unwrap();
        assert_eq!(stats.total, 6);
        assert_eq!(stats.available(QuestionType::SingleChoice), 3);
        assert_eq!(stats.available(QuestionType::FillBlank), 2);
        assert_eq!(stats.available(QuestionType::Definition), 0);
    }

    #[tokio::test]
    async fn extraction_groups_types_in_display_order() {
        let request = ExtractionRequest::new()
            .with_count(QuestionType::FillBlank, 2)
            .with_count(QuestionType::SingleChoice, 2)
            .with_count(QuestionType::TrueFalse, 0);

        let extraction = service(true).extract(&request).await.unwrap();
        assert_eq!(extraction.count, 4);
        let kinds: Vec<_> = extraction.questions.iter().map(Question::kind).collect();
        assert_eq!(
            kinds,
            vec![
                QuestionType::SingleChoice,
                QuestionType::SingleChoice,
                QuestionType::FillBlank,
                QuestionType::FillBlank
            ]
        );

        let singles: BTreeSet<_> = extraction.questions[..2]
            .iter()
            .map(|q| q.content().to_owned())
            .collect();
        assert_eq!(singles.len(), 2, "sampled without replacement");
    }

    #[tokio::test]
    async fn unshuffled_extraction_keeps_bank_order() {
        let request = ExtractionRequest::new().with_count(QuestionType::SingleChoice, 2);
        let extraction = service(false).extract(&request).await.unwrap();
        let contents: Vec<_> = extraction.questions.iter().map(Question::content).collect();
        assert_eq!(contents, vec!["s1", "s2"]);
    }

    #[tokio::test]
    async fn rejects_counts_above_availability() {
        let request = ExtractionRequest::new().with_count(QuestionType::TrueFalse, 2);
        let err = service(true).extract(&request).await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Validation(ValidationError::CountExceedsAvailable {
                kind: QuestionType::TrueFalse,
                requested: 2,
                available: 1,
            })
        ));
    }

    #[tokio::test]
    async fn rejects_negative_counts_and_empty_requests() {
        let negative = ExtractionRequest::new().with_count(QuestionType::SingleChoice, -1);
        assert!(matches!(
            service(true).extract(&negative).await,
            Err(ProviderError::Validation(ValidationError::NegativeCount { .. }))
        ));

        let zeros = ExtractionRequest::new()
            .with_count(QuestionType::SingleChoice, 0)
            .with_count(QuestionType::FillBlank, 0);
        assert!(matches!(
            service(true).extract(&zeros).await,
            Err(ProviderError::Validation(ValidationError::NoTypeSelected))
        ));
    }

    #[test]
    fn missing_types_have_nothing_available() {
        let stats = BankStats::from_questions(&bank());
        let request = ExtractionRequest::new().with_count(QuestionType::Definition, 1);
        assert_eq!(
            validate_counts(&request, &stats),
            Err(ValidationError::CountExceedsAvailable {
                kind: QuestionType::Definition,
                requested: 1,
                available: 0,
            })
        );
    }
}
