//! Answer comparison rules.
//!
//! Selection answers are compared as multisets of trimmed labels: both sides
//! are trimmed, sorted with the default string ordering and compared
//! element-wise, so duplicates must match in number too. Text answers are
//! compared position by position after trimming and must have equal length.

use crate::model::{AnswerClass, QuestionType};

/// Decide whether `user_answer` matches `correct_answer` for a question type.
///
/// Never fails: length mismatches and empty correct answers simply grade as
/// not correct (unless both sides are empty).
#[must_use]
pub fn is_correct(kind: QuestionType, user_answer: &[String], correct_answer: &[String]) -> bool {
    match kind.answer_class() {
        AnswerClass::Selection => selection_matches(user_answer, correct_answer),
        AnswerClass::Text => text_matches(user_answer, correct_answer),
    }
}

/// An answer counts as attempted when at least one value is non-blank.
#[must_use]
pub fn is_attempted(answer: &[String]) -> bool {
    answer.iter().any(|value| !value.trim().is_empty())
}

fn sorted_trimmed(values: &[String]) -> Vec<&str> {
    let mut out: Vec<&str> = values.iter().map(|v| v.trim()).collect();
    out.sort_unstable();
    out
}

fn selection_matches(user_answer: &[String], correct_answer: &[String]) -> bool {
    user_answer.len() == correct_answer.len()
        && sorted_trimmed(user_answer) == sorted_trimmed(correct_answer)
}

fn text_matches(user_answer: &[String], correct_answer: &[String]) -> bool {
    user_answer.len() == correct_answer.len()
        && user_answer
            .iter()
            .zip(correct_answer)
            .all(|(user, correct)| user.trim() == correct.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn multiple_choice_ignores_toggle_order() {
        assert!(is_correct(
            QuestionType::MultipleChoice,
            &strings(&["C", "A"]),
            &strings(&["A", "C"])
        ));
    }

    #[test]
    fn selection_requires_exact_membership() {
        let correct = strings(&["A", "C"]);
        assert!(!is_correct(QuestionType::MultipleChoice, &strings(&["A"]), &correct));
        assert!(!is_correct(
            QuestionType::MultipleChoice,
            &strings(&["A", "B", "C"]),
            &correct
        ));
        assert!(!is_correct(QuestionType::MultipleChoice, &[], &correct));
    }

    #[test]
    fn selection_trims_labels() {
        assert!(is_correct(
            QuestionType::SingleChoice,
            &strings(&[" B "]),
            &strings(&["B"])
        ));
    }

    #[test]
    fn selection_duplicates_are_counted() {
        // Multiset semantics: a repeated label only matches the same repetition.
        assert!(!is_correct(
            QuestionType::MultipleChoice,
            &strings(&["A", "A"]),
            &strings(&["A"])
        ));
        assert!(!is_correct(
            QuestionType::MultipleChoice,
            &strings(&["A", "A", "C"]),
            &strings(&["A", "C", "C"])
        ));
        assert!(is_correct(
            QuestionType::MultipleChoice,
            &strings(&["A", "A"]),
            &strings(&["A", "A"])
        ));
    }

    #[test]
    fn text_is_position_aligned_and_trimmed() {
        let correct = strings(&["Paris", "France"]);
        assert!(is_correct(
            QuestionType::FillBlank,
            &strings(&["Paris ", " France"]),
            &correct
        ));
        assert!(!is_correct(
            QuestionType::FillBlank,
            &strings(&["France", "Paris"]),
            &correct
        ));
        assert!(!is_correct(QuestionType::FillBlank, &strings(&["Paris"]), &correct));
    }

    #[test]
    fn text_is_case_sensitive() {
        assert!(!is_correct(
            QuestionType::ShortAnswer,
            &strings(&["paris"]),
            &strings(&["Paris"])
        ));
    }

    #[test]
    fn unanswered_text_against_blank_answer_is_not_correct() {
        assert!(!is_correct(QuestionType::Definition, &[], &strings(&[""])));
    }

    #[test]
    fn empty_against_empty_is_correct() {
        assert!(is_correct(QuestionType::SingleChoice, &[], &[]));
        assert!(is_correct(QuestionType::FillBlank, &[], &[]));
    }

    #[test]
    fn attempted_requires_non_blank_value() {
        assert!(!is_attempted(&[]));
        assert!(!is_attempted(&strings(&["", "  "])));
        assert!(is_attempted(&strings(&["", "x"])));
    }

    fn selection_kind() -> impl Strategy<Value = QuestionType> {
        prop_oneof![
            Just(QuestionType::SingleChoice),
            Just(QuestionType::MultipleChoice),
            Just(QuestionType::TrueFalse),
        ]
    }

    proptest! {
        #[test]
        fn selection_grading_is_permutation_invariant(
            kind in selection_kind(),
            answer in prop::collection::vec("[A-F ]{0,2}", 0..6),
            correct in prop::collection::vec("[A-F]", 0..4),
            seed in any::<u64>(),
        ) {
            let mut permuted = answer.clone();
            let len = permuted.len();
            if len > 1 {
                permuted.rotate_left(usize::try_from(seed % len as u64).unwrap_or(0));
                permuted.reverse();
            }
            prop_assert_eq!(
                is_correct(kind, &answer, &correct),
                is_correct(kind, &permuted, &correct)
            );
        }

        #[test]
        fn selection_accepts_any_order_of_the_correct_answer(
            kind in selection_kind(),
            correct in prop::collection::vec("[A-F]", 0..5),
        ) {
            let mut reversed = correct.clone();
            reversed.reverse();
            prop_assert!(is_correct(kind, &reversed, &correct));
        }
    }
}
