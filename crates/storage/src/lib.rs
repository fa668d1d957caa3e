#![forbid(unsafe_code)]

pub mod json_bank;
pub mod repository;
pub mod sqlite;

pub use json_bank::JsonQuestionBank;
pub use repository::{Storage, StorageError};
