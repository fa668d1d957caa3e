use crate::grading::{is_attempted, is_correct};
use crate::model::{AttemptStats, DisplayId, QuizResult, QuizSession, WrongQuestion};

/// Grade every question of a session.
///
/// Read-only and deterministic: repeated calls on an unchanged session
/// produce identical results. Unanswered questions are graded against an
/// empty answer, so they count as wrong unless their correct answer is empty.
#[must_use]
pub fn submit(session: &QuizSession) -> QuizResult {
    let total = session.len();
    let mut correct_count = 0_usize;
    let mut wrong_questions = Vec::new();

    for (index, question) in session.questions().iter().enumerate() {
        let user_answer = session.answer(index);
        if is_correct(question.kind(), user_answer, question.correct_answer()) {
            correct_count += 1;
        } else {
            wrong_questions.push(WrongQuestion::from_question(
                DisplayId::from_index(index),
                question,
                user_answer.to_vec(),
            ));
        }
    }

    QuizResult::new(
        score_percent(correct_count, total),
        correct_count,
        total,
        wrong_questions,
    )
}

/// Correct / wrong tally restricted to attempted questions.
#[must_use]
pub fn attempt_stats(session: &QuizSession) -> AttemptStats {
    let mut stats = AttemptStats::default();
    for (index, question) in session.questions().iter().enumerate() {
        let user_answer = session.answer(index);
        if !is_attempted(user_answer) {
            continue;
        }
        stats.attempted += 1;
        if is_correct(question.kind(), user_answer, question.correct_answer()) {
            stats.correct += 1;
        } else {
            stats.wrong += 1;
        }
    }
    stats
}

/// `correct / total` as a percentage with one decimal place; `0.0` when empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn score_percent(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let ratio = correct as f64 / total as f64;
    (ratio * 1000.0).round() / 10.0
}

/// Position of the current question as a percentage of the session.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn progress_percent(session: &QuizSession) -> f64 {
    if session.is_empty() {
        return 0.0;
    }
    (session.current_index() + 1) as f64 / session.len() as f64 * 100.0
}
