use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question content cannot be empty")]
    EmptyContent,

    #[error("unknown question type: {0}")]
    UnknownType(String),
}

//
// ─── QUESTION TYPE ─────────────────────────────────────────────────────────────
//

/// Bank label of the untyped "choice" question, resolved on load.
pub const GENERIC_CHOICE_LABEL: &str = "选择题";

/// How answers of a question type are compared.
///
/// - `Selection`: an unordered multiset of chosen option labels.
/// - `Text`: a position-aligned sequence of free-text values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerClass {
    Selection,
    Text,
}

/// Kind of a question, in answer-sheet display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    TrueFalse,
    FillBlank,
    ShortAnswer,
    Definition,
}

impl QuestionType {
    /// All question types in their fixed display order.
    pub const ALL: [QuestionType; 6] = [
        QuestionType::SingleChoice,
        QuestionType::MultipleChoice,
        QuestionType::TrueFalse,
        QuestionType::FillBlank,
        QuestionType::ShortAnswer,
        QuestionType::Definition,
    ];

    #[must_use]
    pub fn answer_class(self) -> AnswerClass {
        match self {
            QuestionType::SingleChoice | QuestionType::MultipleChoice | QuestionType::TrueFalse => {
                AnswerClass::Selection
            }
            QuestionType::FillBlank | QuestionType::ShortAnswer | QuestionType::Definition => {
                AnswerClass::Text
            }
        }
    }

    /// Whether answers are a set of toggled options rather than one slot per field.
    #[must_use]
    pub fn is_multi_select(self) -> bool {
        matches!(self, QuestionType::MultipleChoice)
    }

    /// Stable machine key used by storage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::SingleChoice => "single_choice",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::TrueFalse => "true_false",
            QuestionType::FillBlank => "fill_blank",
            QuestionType::ShortAnswer => "short_answer",
            QuestionType::Definition => "definition",
        }
    }

    /// Label used by question-bank files.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            QuestionType::SingleChoice => "单选题",
            QuestionType::MultipleChoice => "多选题",
            QuestionType::TrueFalse => "判断题",
            QuestionType::FillBlank => "填空题",
            QuestionType::ShortAnswer => "简答题",
            QuestionType::Definition => "释义题",
        }
    }

    /// Parse either a bank label or a machine key.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::UnknownType` for anything else, including the
    /// generic choice label (see [`QuestionType::resolve_generic_choice`]).
    pub fn from_label(raw: &str) -> Result<Self, QuestionError> {
        let raw = raw.trim();
        QuestionType::ALL
            .into_iter()
            .find(|kind| kind.label() == raw || kind.as_str() == raw)
            .ok_or_else(|| QuestionError::UnknownType(raw.to_owned()))
    }

    /// Pick single or multiple choice for a generic choice question.
    ///
    /// More than one non-blank correct answer means multiple choice.
    #[must_use]
    pub fn resolve_generic_choice(correct_answer: &[String]) -> Self {
        let populated = correct_answer
            .iter()
            .filter(|value| !value.trim().is_empty())
            .count();
        if populated > 1 {
            QuestionType::MultipleChoice
        } else {
            QuestionType::SingleChoice
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for QuestionType {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A question selected into a quiz session. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: Option<QuestionId>,
    kind: QuestionType,
    content: String,
    options: Vec<String>,
    correct_answer: Vec<String>,
    analysis: String,
}

impl Question {
    /// Build a question.
    ///
    /// `correct_answer` may be empty: a bank entry without one is still
    /// playable, it just never grades as correct unless the answer is empty too.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyContent` if `content` is blank.
    pub fn new(
        kind: QuestionType,
        content: impl Into<String>,
        options: Vec<String>,
        correct_answer: Vec<String>,
        analysis: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(QuestionError::EmptyContent);
        }

        Ok(Self {
            id: None,
            kind,
            content,
            options,
            correct_answer,
            analysis: analysis.into(),
        })
    }

    #[must_use]
    pub fn with_id(mut self, id: QuestionId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<QuestionId> {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> QuestionType {
        self.kind
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &[String] {
        &self.correct_answer
    }

    #[must_use]
    pub fn analysis(&self) -> &str {
        &self.analysis
    }
}
