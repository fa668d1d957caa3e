use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier assigned to a question by its question bank.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(u64);

impl QuestionId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// 1-based position of a question inside a quiz session.
///
/// This is the number shown to the user in results and wrong-question books;
/// it is derived from the 0-based session index as `index + 1`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DisplayId(u32);

impl DisplayId {
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Display id for the question at the given 0-based session index.
    ///
    /// Saturates at `u32::MAX` for absurdly large sessions.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        let id = u32::try_from(index.saturating_add(1)).unwrap_or(u32::MAX);
        Self(id)
    }

    /// The 0-based session index this id refers to, or `None` for `0`.
    #[must_use]
    pub fn to_index(self) -> Option<usize> {
        let index = self.0.checked_sub(1)?;
        usize::try_from(index).ok()
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Debug for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DisplayId({})", self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for parsing an id from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for QuestionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(QuestionId::new)
            .map_err(|_| ParseIdError { kind: "QuestionId" })
    }
}

impl FromStr for DisplayId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(DisplayId::new)
            .map_err(|_| ParseIdError { kind: "DisplayId" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_id_is_one_based() {
        assert_eq!(DisplayId::from_index(0), DisplayId::new(1));
        assert_eq!(DisplayId::from_index(9).value(), 10);
        assert_eq!(DisplayId::new(3).to_index(), Some(2));
        assert_eq!(DisplayId::new(0).to_index(), None);
    }

    #[test]
    fn display_id_from_str() {
        let id: DisplayId = " 12 ".parse().unwrap();
        assert_eq!(id, DisplayId::new(12));
        assert!("twelve".parse::<DisplayId>().is_err());
    }

    #[test]
    fn question_id_display() {
        assert_eq!(QuestionId::new(42).to_string(), "42");
        assert_eq!("7".parse::<QuestionId>().unwrap(), QuestionId::new(7));
    }
}
