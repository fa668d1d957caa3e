use crate::model::{QuestionType, QuizSession};

/// Three-way completion status of a question on the answer sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerStatus {
    /// The answer has been revealed (takes precedence over answered).
    Viewed,
    /// An answer is stored but not revealed.
    Answered,
    Untouched,
}

/// One question on the answer sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSheetEntry {
    /// 0-based session index, used to jump to the question.
    pub index: usize,
    pub kind: QuestionType,
    pub is_answered: bool,
    pub is_viewed: bool,
    /// 1-based number, sequential across all groups.
    pub display_number: usize,
}

impl AnswerSheetEntry {
    #[must_use]
    pub fn status(&self) -> AnswerStatus {
        if self.is_viewed {
            AnswerStatus::Viewed
        } else if self.is_answered {
            AnswerStatus::Answered
        } else {
            AnswerStatus::Untouched
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSheetGroup {
    pub kind: QuestionType,
    pub entries: Vec<AnswerSheetEntry>,
}

/// Navigation overview of a session, grouped by question type.
///
/// Derived on demand; it holds no reference to the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnswerSheet {
    pub groups: Vec<AnswerSheetGroup>,
}

impl AnswerSheet {
    /// Build the sheet: groups follow [`QuestionType::ALL`], empty groups are
    /// dropped, and display numbers continue across groups.
    #[must_use]
    pub fn build(session: &QuizSession) -> Self {
        let mut groups = Vec::new();
        let mut next_number = 1_usize;

        for kind in QuestionType::ALL {
            let mut entries = Vec::new();
            for (index, question) in session.questions().iter().enumerate() {
                if question.kind() != kind {
                    continue;
                }
                entries.push(AnswerSheetEntry {
                    index,
                    kind,
                    is_answered: !session.answer(index).is_empty(),
                    is_viewed: session.is_viewed(index),
                    display_number: next_number,
                });
                next_number += 1;
            }
            if !entries.is_empty() {
                groups.push(AnswerSheetGroup { kind, entries });
            }
        }

        Self { groups }
    }

    pub fn entries(&self) -> impl Iterator<Item = &AnswerSheetEntry> {
        self.groups.iter().flat_map(|group| group.entries.iter())
    }

    #[must_use]
    pub fn entry_for_index(&self, index: usize) -> Option<&AnswerSheetEntry> {
        self.entries().find(|entry| entry.index == index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;

    fn question(kind: QuestionType) -> Question {
        Question::new(kind, "content", Vec::new(), vec!["x".into()], "").unwrap()
    }

    #[test]
    fn numbering_follows_group_order() {
        let session = QuizSession::new(vec![
            question(QuestionType::SingleChoice),
            question(QuestionType::FillBlank),
            question(QuestionType::SingleChoice),
        ]);

        let sheet = AnswerSheet::build(&session);
        assert_eq!(sheet.groups.len(), 2);
        assert_eq!(sheet.groups[0].kind, QuestionType::SingleChoice);
        assert_eq!(sheet.groups[1].kind, QuestionType::FillBlank);

        assert_eq!(sheet.entry_for_index(0).unwrap().display_number, 1);
        assert_eq!(sheet.entry_for_index(2).unwrap().display_number, 2);
        assert_eq!(sheet.entry_for_index(1).unwrap().display_number, 3);
    }

    #[test]
    fn group_order_ignores_session_order() {
        let session = QuizSession::new(vec![
            question(QuestionType::Definition),
            question(QuestionType::TrueFalse),
            question(QuestionType::MultipleChoice),
        ]);

        let kinds: Vec<_> = AnswerSheet::build(&session)
            .groups
            .iter()
            .map(|g| g.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                QuestionType::MultipleChoice,
                QuestionType::TrueFalse,
                QuestionType::Definition
            ]
        );
    }

    #[test]
    fn statuses_reflect_session_state() {
        let mut session = QuizSession::new(vec![
            question(QuestionType::SingleChoice),
            question(QuestionType::SingleChoice),
            question(QuestionType::SingleChoice),
        ]);
        session.set_answer(0, vec!["A".into()]).unwrap();
        session.set_answer(1, vec!["A".into()]).unwrap();
        session.mark_viewed(1).unwrap();

        let sheet = AnswerSheet::build(&session);
        let statuses: Vec<_> = sheet.entries().map(AnswerSheetEntry::status).collect();
        assert_eq!(
            statuses,
            vec![
                AnswerStatus::Answered,
                AnswerStatus::Viewed,
                AnswerStatus::Untouched
            ]
        );
    }

    #[test]
    fn empty_session_has_no_groups() {
        let sheet = AnswerSheet::build(&QuizSession::new(Vec::new()));
        assert!(sheet.groups.is_empty());
        assert_eq!(sheet.entries().count(), 0);
    }
}
