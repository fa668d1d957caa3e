use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::model::question::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStateError {
    #[error("invalid question index {index} (session has {len} questions)")]
    InvalidIndex { index: usize, len: usize },
}

/// Live state of a single quiz attempt.
///
/// Holds the extracted questions (fixed for the session's lifetime), the
/// current position, and sparse per-index answer / viewed records. Absent
/// answers read as an empty sequence and absent viewed flags read as `false`.
///
/// Every write is bounds-checked, so `answers` and `viewed` only ever hold
/// indices in `0..questions.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    answers: BTreeMap<usize, Vec<String>>,
    viewed: BTreeSet<usize>,
}

impl QuizSession {
    /// Start a session over an extracted question list.
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            current: 0,
            answers: BTreeMap::new(),
            viewed: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Fails with `InvalidIndex` unless `index` addresses a question.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::InvalidIndex` when out of range.
    pub fn check_index(&self, index: usize) -> Result<(), SessionStateError> {
        if index < self.questions.len() {
            Ok(())
        } else {
            Err(SessionStateError::InvalidIndex {
                index,
                len: self.questions.len(),
            })
        }
    }

    /// Jump to a question.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::InvalidIndex` when out of range; the
    /// current position is left untouched.
    pub fn set_current_index(&mut self, index: usize) -> Result<(), SessionStateError> {
        self.check_index(index)?;
        self.current = index;
        Ok(())
    }

    /// Move the current position by `delta`, clamped to the question range.
    ///
    /// Returns the new current index. An empty session stays at `0`.
    pub fn advance(&mut self, delta: isize) -> usize {
        let Some(last) = self.questions.len().checked_sub(1) else {
            return self.current;
        };
        self.current = self.current.saturating_add_signed(delta).min(last);
        self.current
    }

    /// Store the answer for a question, replacing any previous one.
    ///
    /// The shape of `answer` is not validated.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::InvalidIndex` when out of range.
    pub fn set_answer(&mut self, index: usize, answer: Vec<String>) -> Result<(), SessionStateError> {
        self.check_index(index)?;
        self.answers.insert(index, answer);
        Ok(())
    }

    /// Stored answer for a question; empty when unanswered or out of range.
    #[must_use]
    pub fn answer(&self, index: usize) -> &[String] {
        self.answers.get(&index).map(Vec::as_slice).unwrap_or_default()
    }

    /// Mark a question's answer as revealed. Never reverts.
    ///
    /// Returns `true` if the question was not viewed before.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::InvalidIndex` when out of range.
    pub fn mark_viewed(&mut self, index: usize) -> Result<bool, SessionStateError> {
        self.check_index(index)?;
        Ok(self.viewed.insert(index))
    }

    #[must_use]
    pub fn is_viewed(&self, index: usize) -> bool {
        self.viewed.contains(&index)
    }

    /// Number of questions with a stored (possibly blank) answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.values().filter(|answer| !answer.is_empty()).count()
    }

    #[must_use]
    pub fn viewed_count(&self) -> usize {
        self.viewed.len()
    }
}
