#![forbid(unsafe_code)]

pub mod answer_sheet;
pub mod grading;
pub mod model;
pub mod scoring;
pub mod time;

pub use time::Clock;
