//! Question banks stored as JSON files.
//!
//! A bank file is a JSON array of objects:
//!
//! ```json
//! [{ "id": 1, "type": "单选题", "content": "...", "options": ["A. ..", "B. .."],
//!    "correct_answer": ["B"], "analysis": "..." }]
//! ```
//!
//! Only `.json` files directly inside the configured base directory can be opened.

use async_trait::async_trait;
use quiz_core::model::{GENERIC_CHOICE_LABEL, Question, QuestionId, QuestionType};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::repository::{QuestionBankRepository, StorageError};

#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    options: Option<Vec<String>>,
    #[serde(default)]
    correct_answer: Option<Vec<String>>,
    #[serde(default)]
    analysis: Option<String>,
}

/// A question bank loaded from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonQuestionBank {
    path: PathBuf,
    questions: Vec<Question>,
}

impl JsonQuestionBank {
    /// Open `file_name` inside `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidPath` for names that are not plain `.json`
    /// file names or that resolve outside `base_dir`, `StorageError::NotFound`
    /// if the file is missing, and `StorageError::Serialization` for malformed JSON.
    pub fn open(base_dir: &Path, file_name: &str) -> Result<Self, StorageError> {
        let path = resolve_bank_path(base_dir, file_name)?;
        let raw = std::fs::read_to_string(&path).map_err(io_error)?;
        let questions = parse_bank(&raw)?;
        tracing::info!(
            path = %path.display(),
            questions = questions.len(),
            "question bank loaded"
        );
        Ok(Self { path, questions })
    }

    /// Parse a bank from an in-memory JSON document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for malformed JSON.
    pub fn from_json_str(raw: &str) -> Result<Self, StorageError> {
        Ok(Self {
            path: PathBuf::new(),
            questions: parse_bank(raw)?,
        })
    }

    /// Names of the `.json` files in `base_dir`, sorted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be read.
    pub fn available_files(base_dir: &Path) -> Result<Vec<String>, StorageError> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(base_dir).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            let path = entry.path();
            if !path.is_file() || !has_json_extension(&path) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                files.push(name.to_owned());
            }
        }
        files.sort();
        Ok(files)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Number of questions per type.
    #[must_use]
    pub fn stats(&self) -> BTreeMap<QuestionType, usize> {
        let mut stats = BTreeMap::new();
        for question in &self.questions {
            *stats.entry(question.kind()).or_insert(0) += 1;
        }
        stats
    }
}

#[async_trait]
impl QuestionBankRepository for JsonQuestionBank {
    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        Ok(self.questions.clone())
    }
}

fn io_error(err: std::io::Error) -> StorageError {
    if err.kind() == std::io::ErrorKind::NotFound {
        StorageError::NotFound
    } else {
        StorageError::Io(err.to_string())
    }
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn resolve_bank_path(base_dir: &Path, file_name: &str) -> Result<PathBuf, StorageError> {
    let name = Path::new(file_name);
    let mut components = name.components();
    let is_plain_name = matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none();
    if !is_plain_name {
        return Err(StorageError::InvalidPath(file_name.to_owned()));
    }
    if !has_json_extension(name) {
        return Err(StorageError::InvalidPath(format!(
            "{file_name}: only .json question banks can be loaded"
        )));
    }

    let base = base_dir.canonicalize().map_err(io_error)?;
    let path = base.join(name).canonicalize().map_err(io_error)?;
    if !path.starts_with(&base) {
        return Err(StorageError::InvalidPath(file_name.to_owned()));
    }
    Ok(path)
}

fn parse_bank(raw: &str) -> Result<Vec<Question>, StorageError> {
    let entries: Vec<RawQuestion> =
        serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))?;

    let mut questions = Vec::with_capacity(entries.len());
    for (position, entry) in entries.into_iter().enumerate() {
        if let Some(question) = convert_entry(position, entry) {
            questions.push(question);
        }
    }
    Ok(questions)
}

fn convert_entry(position: usize, entry: RawQuestion) -> Option<Question> {
    let correct_answer = entry.correct_answer.unwrap_or_else(|| {
        tracing::warn!(position, "question has no correct_answer; it can never grade as correct");
        Vec::new()
    });

    let Some(raw_kind) = entry.kind else {
        tracing::warn!(position, "skipping question without a type");
        return None;
    };
    let kind = if raw_kind.trim() == GENERIC_CHOICE_LABEL {
        QuestionType::resolve_generic_choice(&correct_answer)
    } else {
        match QuestionType::from_label(&raw_kind) {
            Ok(kind) => kind,
            Err(err) => {
                tracing::warn!(position, %err, "skipping question");
                return None;
            }
        }
    };

    let question = Question::new(
        kind,
        entry.content.unwrap_or_default(),
        entry.options.unwrap_or_default(),
        correct_answer,
        entry.analysis.unwrap_or_default(),
    );
    match question {
        Ok(question) => Some(match entry.id {
            Some(id) => question.with_id(QuestionId::new(id)),
            None => question,
        }),
        Err(err) => {
            tracing::warn!(position, %err, "skipping question");
            None
        }
    }
}
