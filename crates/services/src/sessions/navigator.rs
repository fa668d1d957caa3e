use quiz_core::answer_sheet::AnswerSheet;
use quiz_core::model::{
    AttemptStats, Question, QuizResult, QuizSession, QuizSettings, SessionStateError,
};
use quiz_core::scoring;

use super::view::{QuestionView, SelectOutcome};
use crate::error::ValidationError;

/// Drives a quiz session: position, per-question view state, answer input
/// and answer reveal.
///
/// Study mode and auto-reveal come from the `QuizSettings` given at
/// construction and stay fixed for the navigator's lifetime.
#[derive(Debug, Clone)]
pub struct QuizNavigator {
    session: QuizSession,
    settings: QuizSettings,
    view: Option<QuestionView>,
}

impl QuizNavigator {
    /// Wrap a session and load the view of its current question.
    ///
    /// An empty session has no view; every input then fails with
    /// `ValidationError::InvalidIndex`.
    #[must_use]
    pub fn new(session: QuizSession, settings: QuizSettings) -> Self {
        let mut navigator = Self {
            session,
            settings,
            view: None,
        };
        if !navigator.session.is_empty() {
            let index = navigator.session.current_index();
            if let Err(err) = navigator.load_question_view(index) {
                tracing::warn!(%err, "failed to load the first question");
            }
        }
        navigator
    }

    // ─── Accessors ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn settings(&self) -> QuizSettings {
        self.settings
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.session.current_index()
    }

    /// View of the current question, `None` for an empty session.
    #[must_use]
    pub fn current_view(&self) -> Option<&QuestionView> {
        self.view.as_ref()
    }

    // ─── Navigation ────────────────────────────────────────────────────────────

    /// Make `index` the current question and rebuild its view.
    ///
    /// Stored answers are restored; a missing answer gets one empty slot
    /// unless the question is multiple choice. In study mode an unviewed
    /// question is revealed first.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidIndex` when out of range; position and
    /// view are left unchanged.
    pub fn load_question_view(&mut self, index: usize) -> Result<&QuestionView, ValidationError> {
        self.session.set_current_index(index)?;
        if self.settings.study_mode() && self.session.mark_viewed(index)? {
            tracing::debug!(index, "answer revealed on load");
        }
        let view = self.build_view(index)?;
        Ok(&*self.view.insert(view))
    }

    /// Jump to a question, typically from the answer sheet.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidIndex` when out of range.
    pub fn jump_to(&mut self, index: usize) -> Result<&QuestionView, ValidationError> {
        self.load_question_view(index)
    }

    /// Move by `delta` questions, stopping at either end.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidIndex` for an empty session.
    pub fn advance(&mut self, delta: isize) -> Result<&QuestionView, ValidationError> {
        let before = self.session.current_index();
        let index = self.session.advance(delta);
        if index != before || self.view.is_none() {
            self.load_question_view(index)?;
        }
        self.view.as_ref().ok_or_else(|| self.missing_view())
    }

    /// # Errors
    ///
    /// Returns `ValidationError::InvalidIndex` for an empty session.
    pub fn next(&mut self) -> Result<&QuestionView, ValidationError> {
        self.advance(1)
    }

    /// # Errors
    ///
    /// Returns `ValidationError::InvalidIndex` for an empty session.
    pub fn prev(&mut self) -> Result<&QuestionView, ValidationError> {
        self.advance(-1)
    }

    // ─── Answer input ──────────────────────────────────────────────────────────

    /// Replace the answer of the current question with `value`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidIndex` for an empty session.
    pub fn select_single(
        &mut self,
        value: impl Into<String>,
    ) -> Result<SelectOutcome, ValidationError> {
        let index = self.session.current_index();
        if self.is_locked(index) {
            return Ok(SelectOutcome::Ignored);
        }
        let answer = {
            let view = self.view_mut()?;
            view.user_answer = vec![value.into()];
            view.user_answer.clone()
        };
        self.save_selection(index, answer)
    }

    /// Add `value` to the current answer, or remove it if already present.
    /// Insertion order is kept.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidIndex` for an empty session.
    pub fn toggle_multiple(
        &mut self,
        value: impl Into<String>,
    ) -> Result<SelectOutcome, ValidationError> {
        let index = self.session.current_index();
        if self.is_locked(index) {
            return Ok(SelectOutcome::Ignored);
        }
        let answer = {
            let view = self.view_mut()?;
            let value = value.into();
            match view.user_answer.iter().position(|existing| *existing == value) {
                Some(position) => {
                    view.user_answer.remove(position);
                }
                None => view.user_answer.push(value),
            }
            view.user_answer.clone()
        };
        self.save_selection(index, answer)
    }

    /// Store the text answer of the current question as-is.
    ///
    /// Ignored in study mode. Unlike selections, text stays editable after
    /// the answer was revealed and never triggers auto-reveal.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidIndex` for an empty session.
    pub fn set_text(&mut self, values: Vec<String>) -> Result<SelectOutcome, ValidationError> {
        let index = self.session.current_index();
        if self.settings.study_mode() {
            return Ok(SelectOutcome::Ignored);
        }
        self.view_mut()?.user_answer.clone_from(&values);
        self.session.set_answer(index, values)?;
        Ok(SelectOutcome::Saved)
    }

    // ─── Reveal ────────────────────────────────────────────────────────────────

    /// Mark a question as viewed and return its correct answer.
    ///
    /// Revealing is permanent; revealing twice is harmless.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidIndex` when out of range.
    pub fn reveal(&mut self, index: usize) -> Result<&[String], ValidationError> {
        if self.session.mark_viewed(index)? {
            tracing::debug!(index, "answer revealed");
        }
        let correct = self
            .session
            .question(index)
            .map(|question| question.correct_answer().to_vec())
            .unwrap_or_default();
        if let Some(view) = self.view.as_mut().filter(|view| view.index == index) {
            view.is_viewed = true;
            view.correct_answer = correct;
        }
        Ok(self
            .session
            .question(index)
            .map(Question::correct_answer)
            .unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns `ValidationError::InvalidIndex` for an empty session.
    pub fn reveal_current(&mut self) -> Result<&[String], ValidationError> {
        self.reveal(self.session.current_index())
    }

    // ─── Summaries ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn answer_sheet(&self) -> AnswerSheet {
        AnswerSheet::build(&self.session)
    }

    /// Grade the session without changing it.
    #[must_use]
    pub fn submit(&self) -> QuizResult {
        scoring::submit(&self.session)
    }

    #[must_use]
    pub fn stats(&self) -> AttemptStats {
        scoring::attempt_stats(&self.session)
    }

    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        scoring::progress_percent(&self.session)
    }

    // ─── Internals ─────────────────────────────────────────────────────────────

    fn is_locked(&self, index: usize) -> bool {
        self.settings.study_mode() || self.session.is_viewed(index)
    }

    fn save_selection(
        &mut self,
        index: usize,
        answer: Vec<String>,
    ) -> Result<SelectOutcome, ValidationError> {
        self.session.set_answer(index, answer)?;
        if self.settings.auto_reveal() {
            self.reveal(index)?;
            return Ok(SelectOutcome::SavedAndRevealed);
        }
        Ok(SelectOutcome::Saved)
    }

    fn build_view(&self, index: usize) -> Result<QuestionView, ValidationError> {
        let question = self
            .session
            .question(index)
            .ok_or(SessionStateError::InvalidIndex {
                index,
                len: self.session.len(),
            })?;

        let stored = self.session.answer(index);
        let user_answer = if stored.is_empty() && !question.kind().is_multi_select() {
            vec![String::new()]
        } else {
            stored.to_vec()
        };
        let is_viewed = self.session.is_viewed(index);
        let correct_answer = if is_viewed {
            question.correct_answer().to_vec()
        } else {
            Vec::new()
        };

        Ok(QuestionView {
            index,
            question: question.clone(),
            user_answer,
            is_viewed,
            correct_answer,
        })
    }

    fn view_mut(&mut self) -> Result<&mut QuestionView, ValidationError> {
        let missing = self.missing_view();
        self.view.as_mut().ok_or(missing)
    }

    fn missing_view(&self) -> ValidationError {
        ValidationError::InvalidIndex(SessionStateError::InvalidIndex {
            index: self.session.current_index(),
            len: self.session.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::answer_sheet::AnswerStatus;
    use quiz_core::model::QuestionType;

    fn question(kind: QuestionType, correct: &[&str]) -> Question {
        Question::new(
            kind,
            format!("{kind} question"),
            vec!["A. one".into(), "B. two".into(), "C. three".into()],
            correct.iter().map(|value| (*value).to_owned()).collect(),
            "analysis",
        )
        .unwrap()
    }

    fn session() -> QuizSession {
        QuizSession::new(vec![
            question(QuestionType::SingleChoice, &["A"]),
            question(QuestionType::MultipleChoice, &["A", "C"]),
            question(QuestionType::FillBlank, &["Paris", "France"]),
            question(QuestionType::TrueFalse, &["对"]),
        ])
    }

    fn navigator(settings: QuizSettings) -> QuizNavigator {
        QuizNavigator::new(session(), settings)
    }

    #[test]
    fn views_seed_single_slots_except_multiple_choice() {
        let mut nav = navigator(QuizSettings::default());
        let view = nav.current_view().unwrap();
        assert_eq!(view.index, 0);
        assert_eq!(view.user_answer, vec![String::new()]);
        assert!(!view.is_viewed);
        assert!(view.correct_answer.is_empty());
        assert_eq!(view.analysis(), None);

        assert!(nav.next().unwrap().user_answer.is_empty());
        assert_eq!(nav.next().unwrap().user_answer, vec![String::new()]);

        // Seeding only affects the view, not the stored answer.
        assert!(nav.session().answer(2).is_empty());
    }

    #[test]
    fn answers_survive_navigation() {
        let mut nav = navigator(QuizSettings::default());
        assert_eq!(nav.select_single("B").unwrap(), SelectOutcome::Saved);
        assert_eq!(nav.select_single("A").unwrap(), SelectOutcome::Saved);

        nav.next().unwrap();
        let view = nav.prev().unwrap();
        assert_eq!(view.user_answer, vec!["A".to_string()]);
        assert_eq!(nav.session().answer(0), ["A".to_string()]);
    }

    #[test]
    fn toggles_keep_insertion_order() {
        let mut nav = navigator(QuizSettings::default());
        nav.jump_to(1).unwrap();

        nav.toggle_multiple("C").unwrap();
        nav.toggle_multiple("A").unwrap();
        nav.toggle_multiple("B").unwrap();
        nav.toggle_multiple("A").unwrap();

        let expected = vec!["C".to_string(), "B".to_string()];
        assert_eq!(nav.current_view().unwrap().user_answer, expected);
        assert_eq!(nav.session().answer(1), expected.as_slice());
    }

    #[test]
    fn reveal_locks_selection_but_not_text() {
        let mut nav = navigator(QuizSettings::default());
        nav.select_single("B").unwrap();

        assert_eq!(nav.reveal_current().unwrap(), ["A".to_string()]);
        let view = nav.current_view().unwrap();
        assert!(view.is_viewed);
        assert_eq!(view.correct_answer, vec!["A".to_string()]);
        assert_eq!(view.analysis(), Some("analysis"));

        assert_eq!(nav.select_single("A").unwrap(), SelectOutcome::Ignored);
        assert_eq!(nav.session().answer(0), ["B".to_string()]);

        nav.jump_to(2).unwrap();
        nav.reveal(2).unwrap();
        let outcome = nav
            .set_text(vec!["Paris".into(), "France".into()])
            .unwrap();
        assert_eq!(outcome, SelectOutcome::Saved);
        assert!(nav.session().is_viewed(2));
    }

    #[test]
    fn auto_reveal_fires_after_a_selection() {
        let mut nav = navigator(QuizSettings::default().with_auto_reveal(true));
        assert_eq!(nav.select_single("A").unwrap(), SelectOutcome::SavedAndRevealed);
        assert!(nav.current_view().unwrap().is_viewed);
        assert_eq!(nav.select_single("B").unwrap(), SelectOutcome::Ignored);

        nav.jump_to(2).unwrap();
        assert_eq!(
            nav.set_text(vec!["Paris".into()]).unwrap(),
            SelectOutcome::Saved
        );
        assert!(!nav.session().is_viewed(2));
    }

    #[test]
    fn study_mode_reveals_on_load_and_blocks_input() {
        let mut nav = navigator(QuizSettings::default().with_study_mode(true));
        let view = nav.current_view().unwrap();
        assert!(view.is_viewed);
        assert_eq!(view.correct_answer, vec!["A".to_string()]);

        assert_eq!(nav.select_single("A").unwrap(), SelectOutcome::Ignored);
        assert_eq!(
            nav.set_text(vec!["x".into()]).unwrap(),
            SelectOutcome::Ignored
        );
        assert!(nav.session().answer(0).is_empty());

        nav.jump_to(3).unwrap();
        assert_eq!(nav.session().viewed_count(), 2);
        assert!(!nav.session().is_viewed(1));
    }

    #[test]
    fn invalid_jump_leaves_view_unchanged() {
        let mut nav = navigator(QuizSettings::default());
        nav.jump_to(2).unwrap();

        let err = nav.jump_to(9).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidIndex(SessionStateError::InvalidIndex { index: 9, len: 4 })
        );
        assert_eq!(nav.current_index(), 2);
        assert_eq!(nav.current_view().unwrap().index, 2);
        assert!(nav.reveal(4).is_err());
    }

    #[test]
    fn navigation_stops_at_both_ends() {
        let mut nav = navigator(QuizSettings::default());
        assert_eq!(nav.prev().unwrap().index, 0);
        assert_eq!(nav.advance(10).unwrap().index, 3);
        assert_eq!(nav.next().unwrap().index, 3);
        assert!((nav.progress_percent() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_session_rejects_input() {
        let mut nav = QuizNavigator::new(QuizSession::new(Vec::new()), QuizSettings::default());
        assert!(nav.current_view().is_none());
        assert!(nav.next().is_err());
        assert!(nav.select_single("A").is_err());
        assert!(nav.reveal_current().is_err());

        let result = nav.submit();
        assert_eq!(result.total_questions(), 0);
        assert!(result.score().abs() < f64::EPSILON);
    }

    #[test]
    fn summaries_follow_session_state() {
        let mut nav = navigator(QuizSettings::default());
        nav.select_single("A").unwrap();
        nav.jump_to(1).unwrap();
        nav.toggle_multiple("A").unwrap();
        nav.reveal_current().unwrap();

        let stats = nav.stats();
        assert_eq!((stats.attempted, stats.correct, stats.wrong), (2, 1, 1));

        let sheet = nav.answer_sheet();
        assert_eq!(sheet.entry_for_index(0).unwrap().status(), AnswerStatus::Answered);
        assert_eq!(sheet.entry_for_index(1).unwrap().status(), AnswerStatus::Viewed);
        assert_eq!(sheet.entry_for_index(2).unwrap().status(), AnswerStatus::Untouched);

        let result = nav.submit();
        assert_eq!(result.correct_count(), 1);
        assert!((result.score() - 25.0).abs() < f64::EPSILON);
        assert_eq!(result, nav.submit());
    }
}
