use std::sync::Arc;

use quiz_core::model::{DisplayId, QuestionType, QuizSettings};
use quiz_core::time::{fixed_clock, fixed_now};
use services::{
    ExtractionRequest, ProviderError, QuizError, QuizLoopService, SelectOutcome, ValidationError,
    WrongBookError,
};
use storage::JsonQuestionBank;
use storage::repository::{InMemoryRepository, SettingsRepository};

const BANK: &str = r#"[
    {"id": 1, "type": "单选题", "content": "2 + 2 = ?", "options": ["A. 3", "B. 4"], "correct_answer": ["B"], "analysis": "basic arithmetic"},
    {"id": 2, "type": "选择题", "content": "Pick the primes", "options": ["A. 2", "B. 4", "C. 5"], "correct_answer": ["A", "C"]},
    {"id": 3, "type": "判断题", "content": "The earth is flat", "options": ["对", "错"], "correct_answer": ["错"]},
    {"id": 4, "type": "填空题", "content": "___ is the capital of France", "correct_answer": ["Paris"]}
]"#;

fn service(repo: &InMemoryRepository) -> QuizLoopService {
    let bank = JsonQuestionBank::from_json_str(BANK).unwrap();
    QuizLoopService::new(
        fixed_clock(),
        Arc::new(bank),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    )
    .with_shuffle(false)
}

fn full_request() -> ExtractionRequest {
    ExtractionRequest::new()
        .with_count(QuestionType::SingleChoice, 1)
        .with_count(QuestionType::MultipleChoice, 1)
        .with_count(QuestionType::TrueFalse, 1)
        .with_count(QuestionType::FillBlank, 1)
}

#[tokio::test]
async fn quiz_loop_grades_and_saves_wrong_book() {
    let repo = InMemoryRepository::new();
    let quiz = service(&repo);

    let stats = quiz.bank_stats().await.unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.available(QuestionType::MultipleChoice), 1);

    let mut nav = quiz.start_quiz(&full_request()).await.unwrap();
    assert_eq!(nav.session().len(), 4);

    assert_eq!(nav.select_single("B").unwrap(), SelectOutcome::Saved);
    nav.next().unwrap();
    nav.toggle_multiple("C").unwrap();
    nav.toggle_multiple("A").unwrap();
    nav.next().unwrap();
    nav.select_single("对").unwrap();
    nav.next().unwrap();
    nav.set_text(vec![" Paris ".into()]).unwrap();

    let stats = nav.stats();
    assert_eq!((stats.attempted, stats.correct, stats.wrong), (4, 3, 1));

    let result = quiz.submit(&nav);
    assert_eq!(result.correct_count(), 3);
    assert!((result.score() - 75.0).abs() < f64::EPSILON);
    assert_eq!(result.wrong_questions().len(), 1);
    assert_eq!(result.wrong_questions()[0].display_id, DisplayId::new(3));

    let id = quiz.save_wrong_book(&nav, &result).await.unwrap();
    let book = quiz.wrong_book_service().get(id).await.unwrap();
    assert_eq!(book.generated_at, fixed_now());
    assert_eq!(book.questions.len(), 1);
    assert_eq!(book.questions[0].content, "The earth is flat");
    assert_eq!(book.questions[0].user_answer, vec!["对".to_string()]);
}

#[tokio::test]
async fn persisted_settings_drive_new_quizzes() {
    let repo = InMemoryRepository::new();
    repo.save_settings(&QuizSettings::new(true, false))
        .await
        .unwrap();
    let quiz = service(&repo);

    let request = ExtractionRequest::new().with_count(QuestionType::SingleChoice, 1);
    let mut nav = quiz.start_quiz(&request).await.unwrap();
    assert!(nav.settings().study_mode());
    assert!(nav.current_view().unwrap().is_viewed);
    assert_eq!(nav.select_single("B").unwrap(), SelectOutcome::Ignored);

    let result = quiz.submit(&nav);
    assert_eq!(result.correct_count(), 0);

    let explicit = quiz
        .start_quiz_with_settings(&request, QuizSettings::default())
        .await
        .unwrap();
    assert!(!explicit.current_view().unwrap().is_viewed);
}

#[tokio::test]
async fn perfect_quiz_has_nothing_to_save() {
    let repo = InMemoryRepository::new();
    let quiz = service(&repo);

    let request = ExtractionRequest::new().with_count(QuestionType::FillBlank, 1);
    let mut nav = quiz.start_quiz(&request).await.unwrap();
    nav.set_text(vec!["Paris".into()]).unwrap();

    let result = quiz.submit(&nav);
    assert!((result.score() - 100.0).abs() < f64::EPSILON);
    assert!(matches!(
        quiz.save_wrong_book(&nav, &result).await,
        Err(QuizError::WrongBook(WrongBookError::NothingToSave))
    ));
}

#[tokio::test]
async fn invalid_requests_are_reported() {
    let repo = InMemoryRepository::new();
    let quiz = service(&repo);

    let request = ExtractionRequest::new().with_count(QuestionType::ShortAnswer, 1);
    let err = quiz.start_quiz(&request).await.unwrap_err();
    assert!(matches!(
        err,
        QuizError::Provider(ProviderError::Validation(
            ValidationError::CountExceedsAvailable { available: 0, .. }
        ))
    ));
}
