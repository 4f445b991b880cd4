//! Common types used across the COBie workspace

use serde::{Deserialize, Serialize};

/// How row positions are numbered in reported errors.
///
/// `RowOne` reports the first data row as position 0; `RowTwo` reports it as
/// position 1, matching a spreadsheet whose first row holds column headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IndexingBase {
    RowOne,
    #[default]
    RowTwo,
}

impl IndexingBase {
    /// Offset added to a zero-based row position
    pub fn offset(self) -> usize {
        match self {
            IndexingBase::RowOne => 0,
            IndexingBase::RowTwo => 1,
        }
    }

    /// Reported position for a zero-based row index
    pub fn position(self, zero_based: usize) -> usize {
        zero_based + self.offset()
    }
}

impl std::str::FromStr for IndexingBase {
    type Err = crate::CobieError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "row_one" | "one" | "1" => Ok(IndexingBase::RowOne),
            "row_two" | "two" | "2" => Ok(IndexingBase::RowTwo),
            _ => Err(crate::CobieError::parse(format!(
                "Invalid indexing base: {} (expected row_one or row_two)",
                s
            ))),
        }
    }
}

impl std::fmt::Display for IndexingBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexingBase::RowOne => write!(f, "row_one"),
            IndexingBase::RowTwo => write!(f, "row_two"),
        }
    }
}

/// Severity of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorLevel {
    Warning,
    Error,
}

impl std::fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorLevel::Warning => write!(f, "warning"),
            ErrorLevel::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_indexing_base_offsets() {
        assert_eq!(IndexingBase::RowOne.position(0), 0);
        assert_eq!(IndexingBase::RowTwo.position(0), 1);
        assert_eq!(IndexingBase::RowTwo.position(41), 42);
        assert_eq!(IndexingBase::default(), IndexingBase::RowTwo);
    }

    #[test]
    fn test_indexing_base_from_str() {
        assert_eq!("row_one".parse::<IndexingBase>().unwrap(), IndexingBase::RowOne);
        assert_eq!("Row-Two".parse::<IndexingBase>().unwrap(), IndexingBase::RowTwo);
        assert_eq!("1".parse::<IndexingBase>().unwrap(), IndexingBase::RowOne);
        assert!("three".parse::<IndexingBase>().is_err());
    }

    #[test]
    fn test_error_level_ordering() {
        assert!(ErrorLevel::Warning < ErrorLevel::Error);
        assert_eq!(ErrorLevel::Error.to_string(), "error");
    }
}
