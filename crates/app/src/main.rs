mod args;
mod repl;

use std::io::Write;
use std::sync::Arc;

use quiz_core::model::QuizSettings;
use services::{Clock, QuizLoopService, SettingsService, WrongBookError, WrongBookService};
use storage::JsonQuestionBank;
use storage::repository::Storage;
use tracing_subscriber::EnvFilter;

use args::{Args, ArgsError, Command, print_usage};
use repl::Exit;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);

    let cmd = match argv.next() {
        None => {
            print_usage();
            return Ok(());
        }
        Some(first) if first == "--help" || first == "-h" => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(&first).ok_or_else(|| {
            print_usage();
            ArgsError::UnknownCommand(first.clone())
        })?,
    };

    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    match cmd {
        Command::Files => list_files(&parsed),
        Command::Stats => show_stats(&parsed),
        Command::Run => run_quiz(&parsed).await,
        Command::Books => show_books(&parsed).await,
        Command::Settings => update_settings(&parsed).await,
    }
}

fn list_files(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let files = JsonQuestionBank::available_files(&args.bank_dir)?;
    if files.is_empty() {
        println!("no question banks in {}", args.bank_dir.display());
    }
    for file in files {
        println!("{file}");
    }
    Ok(())
}

fn show_stats(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let bank = JsonQuestionBank::open(&args.bank_dir, args.require_bank()?)?;
    let stats = bank.stats();
    println!("{}: {} questions", bank.path().display(), bank.questions().len());
    for (kind, count) in stats {
        println!("  {kind}: {count}");
    }
    Ok(())
}

async fn open_storage(args: &Args) -> Result<Storage, Box<dyn std::error::Error>> {
    // Open + migrate SQLite here so core/services stay free of I/O setup.
    prepare_sqlite_file(&args.db_url)?;
    Ok(Storage::sqlite(&args.db_url).await?)
}

async fn effective_settings(
    args: &Args,
    settings: &SettingsService,
) -> Result<QuizSettings, Box<dyn std::error::Error>> {
    let mut effective = settings.load().await?;
    if let Some(study_mode) = args.study_mode {
        effective = effective.with_study_mode(study_mode);
    }
    if let Some(auto_reveal) = args.auto_reveal {
        effective = effective.with_auto_reveal(auto_reveal);
    }
    Ok(effective)
}

async fn run_quiz(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let bank = JsonQuestionBank::open(&args.bank_dir, args.require_bank()?)?;
    let storage = open_storage(args).await?;
    let quiz = QuizLoopService::new(
        Clock::system(),
        Arc::new(bank),
        Arc::clone(&storage.wrong_books),
        Arc::clone(&storage.settings),
    )
    .with_shuffle(args.shuffle);

    let settings = effective_settings(args, quiz.settings_service()).await?;
    let mut navigator = quiz.start_quiz_with_settings(&args.request, settings).await?;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let exit = repl::run(&mut navigator, stdin.lock(), &mut stdout)?;
    if exit == Exit::Quit {
        println!("quiz abandoned");
        return Ok(());
    }

    let result = quiz.submit(&navigator);
    repl::render_result(&mut stdout, &result)?;
    stdout.flush()?;

    match quiz.save_wrong_book(&navigator, &result).await {
        Ok(id) => println!("wrong questions saved as book #{id}"),
        Err(services::QuizError::WrongBook(WrongBookError::NothingToSave)) => {
            println!("no wrong questions, nothing to save");
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

async fn show_books(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let storage = open_storage(args).await?;
    let books = WrongBookService::new(Clock::system(), Arc::clone(&storage.wrong_books));

    if let Some((id, path)) = &args.export {
        books.export(*id, path).await?;
        println!("book #{id} exported to {}", path.display());
        return Ok(());
    }

    if let Some(id) = args.show {
        let book = books.get(id).await?;
        println!(
            "{} ({}, {} questions)",
            book.title,
            book.generated_at.format("%Y-%m-%d %H:%M"),
            book.total_questions()
        );
        for question in &book.questions {
            println!();
            println!("#{} {} {}", question.display_id, question.kind, question.content);
            for option in &question.options {
                println!("  {option}");
            }
            println!("  your answer:    {}", question.user_answer.join(" | "));
            println!("  correct answer: {}", question.correct_answer.join(" | "));
            if !question.analysis.trim().is_empty() {
                println!("  analysis: {}", question.analysis);
            }
        }
        return Ok(());
    }

    let summaries = books.list(args.limit).await?;
    if summaries.is_empty() {
        println!("no wrong-question books yet");
    }
    for summary in summaries {
        println!(
            "#{} {} {} ({} questions)",
            summary.id,
            summary.generated_at.format("%Y-%m-%d %H:%M"),
            summary.title,
            summary.total_questions
        );
    }
    Ok(())
}

async fn update_settings(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let storage = open_storage(args).await?;
    let service = SettingsService::new(Arc::clone(&storage.settings));

    let mut settings = effective_settings(args, &service).await?;
    if args.study_mode.is_some() || args.auto_reveal.is_some() {
        settings = service.save(settings).await?;
    }
    println!("study mode:  {}", on_off(settings.study_mode()));
    println!("auto reveal: {}", on_off(settings.auto_reveal()));
    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
