use quiz_core::model::Question;

/// Presentation-agnostic state of the question currently on screen.
///
/// `correct_answer` is empty until the question is viewed; the analysis is
/// only exposed through [`QuestionView::analysis`] once viewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub index: usize,
    pub question: Question,
    pub user_answer: Vec<String>,
    pub is_viewed: bool,
    pub correct_answer: Vec<String>,
}

impl QuestionView {
    #[must_use]
    pub fn analysis(&self) -> Option<&str> {
        self.is_viewed.then(|| self.question.analysis())
    }
}

/// What an answer input did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The question is locked (viewed, or study mode); nothing changed.
    Ignored,
    Saved,
    /// Saved, then revealed because auto-reveal is on.
    SavedAndRevealed,
}
