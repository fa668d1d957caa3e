use quiz_core::model::{DisplayId, QuestionType};

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn encode_strings(values: &[String]) -> Result<String, StorageError> {
    serde_json::to_string(values).map_err(ser)
}

pub(crate) fn decode_strings(field: &'static str, raw: &str) -> Result<Vec<String>, StorageError> {
    serde_json::from_str(raw)
        .map_err(|e| StorageError::Serialization(format!("invalid {field}: {e}")))
}

pub(crate) fn parse_question_type(s: &str) -> Result<QuestionType, StorageError> {
    QuestionType::from_label(s).map_err(ser)
}

pub(crate) fn display_id_from_i64(v: i64) -> Result<DisplayId, StorageError> {
    u32::try_from(v)
        .map(DisplayId::new)
        .map_err(|_| StorageError::Serialization(format!("invalid display_id: {v}")))
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}
