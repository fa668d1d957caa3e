use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::ids::DisplayId;
use crate::model::question::{Question, QuestionType};

/// A question graded as not correct, as reported after submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrongQuestion {
    pub display_id: DisplayId,
    pub kind: QuestionType,
    pub content: String,
    pub options: Vec<String>,
    pub user_answer: Vec<String>,
    pub correct_answer: Vec<String>,
    pub analysis: String,
}

impl WrongQuestion {
    #[must_use]
    pub fn from_question(display_id: DisplayId, question: &Question, user_answer: Vec<String>) -> Self {
        Self {
            display_id,
            kind: question.kind(),
            content: question.content().to_owned(),
            options: question.options().to_vec(),
            user_answer,
            correct_answer: question.correct_answer().to_vec(),
            analysis: question.analysis().to_owned(),
        }
    }
}

/// Final graded outcome of a quiz session. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    score: f64,
    correct_count: usize,
    total_questions: usize,
    wrong_questions: Vec<WrongQuestion>,
}

impl QuizResult {
    #[must_use]
    pub fn new(
        score: f64,
        correct_count: usize,
        total_questions: usize,
        wrong_questions: Vec<WrongQuestion>,
    ) -> Self {
        Self {
            score,
            correct_count,
            total_questions,
            wrong_questions,
        }
    }

    /// Percentage of correct answers, rounded to one decimal place.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    /// Wrong questions in original session order.
    #[must_use]
    pub fn wrong_questions(&self) -> &[WrongQuestion] {
        &self.wrong_questions
    }

    /// Request payload for the wrong-question book built from this result.
    #[must_use]
    pub fn wrong_book_request(&self) -> WrongBookRequest {
        WrongBookRequest {
            wrong_ids: self.wrong_questions.iter().map(|q| q.display_id).collect(),
            user_answers: self
                .wrong_questions
                .iter()
                .map(|q| (q.display_id, q.user_answer.clone()))
                .collect(),
        }
    }
}

/// What the wrong-question book needs: which questions and what was answered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WrongBookRequest {
    pub wrong_ids: Vec<DisplayId>,
    pub user_answers: BTreeMap<DisplayId, Vec<String>>,
}

impl WrongBookRequest {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wrong_ids.is_empty()
    }
}

/// Live tally over attempted questions only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttemptStats {
    pub attempted: usize,
    pub correct: usize,
    pub wrong: usize,
}
