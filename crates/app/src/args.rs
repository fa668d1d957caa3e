use std::fmt;
use std::path::PathBuf;

use quiz_core::model::QuestionType;
use services::ExtractionRequest;

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    MissingBank,
    InvalidCount { raw: String },
    InvalidNumber { flag: &'static str, raw: String },
    InvalidToggle { flag: &'static str, raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::MissingBank => write!(f, "--bank <file.json> is required"),
            ArgsError::InvalidCount { raw } => {
                write!(f, "invalid --count value: {raw} (expected <type>=<n>)")
            }
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidToggle { flag, raw } => {
                write!(f, "invalid {flag} value: {raw} (expected on or off)")
            }
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Stats,
    Files,
    Run,
    Books,
    Settings,
}

impl Command {
    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "stats" => Some(Self::Stats),
            "files" => Some(Self::Files),
            "run" => Some(Self::Run),
            "books" => Some(Self::Books),
            "settings" => Some(Self::Settings),
            _ => None,
        }
    }
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- files    [--dir <path>]");
    eprintln!("  cargo run -p app -- stats    --bank <file.json> [--dir <path>]");
    eprintln!("  cargo run -p app -- run      --bank <file.json> [--dir <path>] [--db <sqlite_url>]");
    eprintln!("                               [--count <type>=<n>]... [--study on|off]");
    eprintln!("                               [--auto-reveal on|off] [--no-shuffle]");
    eprintln!("  cargo run -p app -- books    [--db <sqlite_url>] [--limit <n>] [--show <id>]");
    eprintln!("                               [--export <id> <file.json>]");
    eprintln!("  cargo run -p app -- settings [--db <sqlite_url>] [--study on|off] [--auto-reveal on|off]");
    eprintln!();
    eprintln!("Question types for --count: 单选题 多选题 判断题 填空题 简答题 释义题");
    eprintln!("  (or single_choice, multiple_choice, true_false, fill_blank, short_answer, definition)");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --dir .");
    eprintln!("  --db sqlite://quiz.sqlite3");
    eprintln!("  --limit 20");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_BANK_DIR, QUIZ_DB_URL, RUST_LOG");
}

pub struct Args {
    pub bank_dir: PathBuf,
    pub bank_file: Option<String>,
    pub db_url: String,
    pub request: ExtractionRequest,
    pub study_mode: Option<bool>,
    pub auto_reveal: Option<bool>,
    pub shuffle: bool,
    pub limit: u32,
    pub show: Option<i64>,
    pub export: Option<(i64, PathBuf)>,
}

impl Args {
    pub fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            bank_dir: std::env::var("QUIZ_BANK_DIR")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map_or_else(|| PathBuf::from("."), PathBuf::from),
            bank_file: None,
            db_url: std::env::var("QUIZ_DB_URL")
                .ok()
                .map_or_else(|| "sqlite://quiz.sqlite3".into(), normalize_sqlite_url),
            request: ExtractionRequest::new(),
            study_mode: None,
            auto_reveal: None,
            shuffle: true,
            limit: 20,
            show: None,
            export: None,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--dir" => parsed.bank_dir = PathBuf::from(require_value(args, "--dir")?),
                "--bank" => parsed.bank_file = Some(require_value(args, "--bank")?),
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    parsed.db_url = normalize_sqlite_url(value);
                }
                "--count" => {
                    let (kind, count) = parse_count(&require_value(args, "--count")?)?;
                    parsed.request.set_count(kind, count);
                }
                "--study" => {
                    let value = require_value(args, "--study")?;
                    parsed.study_mode = Some(parse_toggle("--study", value)?);
                }
                "--auto-reveal" => {
                    let value = require_value(args, "--auto-reveal")?;
                    parsed.auto_reveal = Some(parse_toggle("--auto-reveal", value)?);
                }
                "--no-shuffle" => parsed.shuffle = false,
                "--limit" => {
                    let value = require_value(args, "--limit")?;
                    parsed.limit = value.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--limit",
                        raw: value.clone(),
                    })?;
                }
                "--show" => {
                    let value = require_value(args, "--show")?;
                    let id = value.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--show",
                        raw: value.clone(),
                    })?;
                    parsed.show = Some(id);
                }
                "--export" => {
                    let value = require_value(args, "--export")?;
                    let id = value.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--export",
                        raw: value.clone(),
                    })?;
                    let file = require_value(args, "--export")?;
                    parsed.export = Some((id, PathBuf::from(file)));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    pub fn require_bank(&self) -> Result<&str, ArgsError> {
        self.bank_file.as_deref().ok_or(ArgsError::MissingBank)
    }
}

fn parse_count(raw: &str) -> Result<(QuestionType, i64), ArgsError> {
    let invalid = || ArgsError::InvalidCount {
        raw: raw.to_owned(),
    };
    let (kind, count) = raw.split_once('=').ok_or_else(invalid)?;
    let kind = QuestionType::from_label(kind).map_err(|_| invalid())?;
    let count = count.trim().parse::<i64>().map_err(|_| invalid())?;
    Ok((kind, count))
}

fn parse_toggle(flag: &'static str, raw: String) -> Result<bool, ArgsError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(ArgsError::InvalidToggle { flag, raw }),
    }
}

pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}
