//! Line-oriented quiz front end over any reader/writer pair.

use std::io::{self, BufRead, Write};

use quiz_core::answer_sheet::{AnswerSheet, AnswerStatus};
use quiz_core::model::QuizResult;
use services::{QuestionView, QuizNavigator, SelectOutcome, ValidationError};

enum Step {
    Moved,
    Answered(SelectOutcome),
}

/// How an interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Submitted,
    Quit,
}

const HELP: &str = "\
commands:
  n | next            next question
  p | prev            previous question
  j | jump <no>       go to question number <no>
  s | select <value>  answer a single choice or true/false question
  t | toggle <value>  add/remove an option of a multiple choice question
  text <a> | <b> ...  answer a text question, one value per blank
  r | reveal          show the correct answer
  sheet               answer sheet
  stats               attempted / correct / wrong so far
  submit              grade the quiz
  q | quit            leave without grading";

/// Read commands until the quiz is submitted, quit, or input ends.
///
/// # Errors
///
/// Returns I/O errors from `input` or `output`.
pub fn run(
    navigator: &mut QuizNavigator,
    input: impl BufRead,
    mut output: impl Write,
) -> io::Result<Exit> {
    writeln!(output, "{HELP}")?;
    if let Some(view) = navigator.current_view() {
        render_view(&mut output, view, navigator.session().len())?;
    }

    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim_start();
        let (command, raw_rest) = trimmed
            .split_once(char::is_whitespace)
            .unwrap_or((trimmed.trim_end(), ""));
        let rest = raw_rest.trim();

        let step = match command {
            "" => continue,
            "n" | "next" => navigator.next().map(|_| Step::Moved),
            "p" | "prev" => navigator.prev().map(|_| Step::Moved),
            "j" | "jump" => match rest.parse::<usize>() {
                Ok(number) if number > 0 => navigator.jump_to(number - 1).map(|_| Step::Moved),
                _ => {
                    writeln!(output, "usage: jump <question number>")?;
                    continue;
                }
            },
            "s" | "select" => navigator.select_single(rest).map(Step::Answered),
            "t" | "toggle" => navigator.toggle_multiple(rest).map(Step::Answered),
            "text" => navigator
                .set_text(split_text_values(raw_rest))
                .map(Step::Answered),
            "r" | "reveal" => navigator.reveal_current().map(|_| Step::Moved),
            "sheet" => {
                render_sheet(&mut output, &navigator.answer_sheet())?;
                continue;
            }
            "stats" => {
                let stats = navigator.stats();
                writeln!(
                    output,
                    "attempted {} / correct {} / wrong {} ({:.0}% through the quiz)",
                    stats.attempted,
                    stats.correct,
                    stats.wrong,
                    navigator.progress_percent()
                )?;
                continue;
            }
            "submit" => return Ok(Exit::Submitted),
            "q" | "quit" => return Ok(Exit::Quit),
            "h" | "help" => {
                writeln!(output, "{HELP}")?;
                continue;
            }
            other => {
                writeln!(output, "unknown command: {other} (type help)")?;
                continue;
            }
        };

        match step {
            Ok(Step::Moved | Step::Answered(SelectOutcome::SavedAndRevealed)) => {
                if let Some(view) = navigator.current_view() {
                    render_view(&mut output, view, navigator.session().len())?;
                }
            }
            Ok(Step::Answered(SelectOutcome::Ignored)) => {
                writeln!(output, "answer is locked for this question")?;
            }
            Ok(Step::Answered(_)) => {}
            Err(err) => report_error(&mut output, &err)?,
        }
    }

    Ok(Exit::Quit)
}

fn report_error(output: &mut impl Write, err: &ValidationError) -> io::Result<()> {
    tracing::debug!(%err, "command rejected");
    writeln!(output, "error: {err}")
}

fn render_view(output: &mut impl Write, view: &QuestionView, total: usize) -> io::Result<()> {
    let question = &view.question;
    writeln!(output)?;
    writeln!(output, "[{}/{}] {}", view.index + 1, total, question.kind())?;
    writeln!(output, "{}", question.content())?;
    for option in question.options() {
        writeln!(output, "  {option}")?;
    }
    writeln!(output, "your answer: {}", format_answer(&view.user_answer))?;
    if view.is_viewed {
        writeln!(output, "correct answer: {}", format_answer(&view.correct_answer))?;
        if let Some(analysis) = view.analysis().filter(|text| !text.trim().is_empty()) {
            writeln!(output, "analysis: {analysis}")?;
        }
    }
    Ok(())
}

fn render_sheet(output: &mut impl Write, sheet: &AnswerSheet) -> io::Result<()> {
    for group in &sheet.groups {
        write!(output, "{}:", group.kind)?;
        for entry in &group.entries {
            let marker = match entry.status() {
                AnswerStatus::Viewed => "*",
                AnswerStatus::Answered => "+",
                AnswerStatus::Untouched => "",
            };
            write!(output, " {}{marker}", entry.display_number)?;
        }
        writeln!(output)?;
    }
    writeln!(output, "(+ answered, * answer shown)")
}

/// Print the graded result.
///
/// # Errors
///
/// Returns I/O errors from `output`.
pub fn render_result(output: &mut impl Write, result: &QuizResult) -> io::Result<()> {
    writeln!(
        output,
        "score: {:.1} ({} of {} correct)",
        result.score(),
        result.correct_count(),
        result.total_questions()
    )?;
    for wrong in result.wrong_questions() {
        writeln!(output)?;
        writeln!(output, "#{} {} {}", wrong.display_id, wrong.kind, wrong.content)?;
        writeln!(output, "  your answer:    {}", format_answer(&wrong.user_answer))?;
        writeln!(output, "  correct answer: {}", format_answer(&wrong.correct_answer))?;
        if !wrong.analysis.trim().is_empty() {
            writeln!(output, "  analysis: {}", wrong.analysis)?;
        }
    }
    Ok(())
}

/// Split `a | b` into values, dropping only the one space on each side of a separator.
fn split_text_values(raw: &str) -> Vec<String> {
    let pieces: Vec<&str> = raw.split('|').collect();
    let last = pieces.len() - 1;
    pieces
        .into_iter()
        .enumerate()
        .map(|(position, piece)| {
            let piece = if position > 0 {
                piece.strip_prefix(' ').unwrap_or(piece)
            } else {
                piece
            };
            let piece = if position < last {
                piece.strip_suffix(' ').unwrap_or(piece)
            } else {
                piece
            };
            piece.to_owned()
        })
        .collect()
}

fn format_answer(values: &[String]) -> String {
    if values.iter().all(|value| value.trim().is_empty()) {
        return "-".to_owned();
    }
    values.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, QuestionType, QuizSession, QuizSettings};

    fn navigator(settings: QuizSettings) -> QuizNavigator {
        let questions = vec![
            Question::new(
                QuestionType::SingleChoice,
                "2 + 2 = ?",
                vec!["A. 3".into(), "B. 4".into()],
                vec!["B".into()],
                "basic arithmetic",
            )
            .unwrap(),
            Question::new(
                QuestionType::FillBlank,
                "___ and ___ are primes",
                Vec::new(),
                vec!["2".into(), "3".into()],
                "",
            )
            .unwrap(),
        ];
        QuizNavigator::new(QuizSession::new(questions), settings)
    }

    fn drive(nav: &mut QuizNavigator, script: &str) -> (Exit, String) {
        let mut output = Vec::new();
        let exit = run(nav, script.as_bytes(), &mut output).unwrap();
        (exit, String::from_utf8(output).unwrap())
    }

    #[test]
    fn scripted_quiz_is_submitted() {
        let mut nav = navigator(QuizSettings::default());
        let (exit, output) = drive(&mut nav, "select B\nnext\ntext 2 | 3\nsheet\nsubmit\n");

        assert_eq!(exit, Exit::Submitted);
        assert!(output.contains("[1/2] 单选题"));
        assert!(output.contains("[2/2] 填空题"));
        assert!(output.contains("单选题: 1+"));
        assert_eq!(nav.session().answer(1), ["2".to_string(), "3".to_string()]);
        assert!((nav.submit().score() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn text_answers_keep_user_spacing() {
        let mut nav = navigator(QuizSettings::default());
        drive(&mut nav, "next\ntext  Paris  |  France \n");
        assert_eq!(
            nav.session().answer(1),
            [" Paris ".to_string(), " France ".to_string()]
        );

        assert_eq!(split_text_values("2|3"), vec!["2", "3"]);
        assert_eq!(split_text_values(""), vec![""]);
    }

    #[test]
    fn reveal_and_lock_are_reported() {
        let mut nav = navigator(QuizSettings::default().with_auto_reveal(true));
        let (exit, output) = drive(&mut nav, "s A\ns B\njump 5\nfly\n");

        assert_eq!(exit, Exit::Quit);
        assert!(output.contains("correct answer: B"));
        assert!(output.contains("analysis: basic arithmetic"));
        assert!(output.contains("answer is locked"));
        assert!(output.contains("error: invalid question index 4"));
        assert!(output.contains("unknown command: fly"));
        assert_eq!(nav.session().answer(0), ["A".to_string()]);
    }

    #[test]
    fn result_lists_wrong_questions() {
        let nav = navigator(QuizSettings::default());
        let mut output = Vec::new();
        render_result(&mut output, &nav.submit()).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("score: 0.0 (0 of 2 correct)"));
        assert!(output.contains("#1 单选题 2 + 2 = ?"));
        assert!(output.contains("#2 填空题"));
        assert!(output.contains("your answer:    -"));
    }
}
