//! Error types for COBie federation
//!
//! Only structural failures live here. Duplicate rows and validation findings
//! are data carried on the workbook, never errors.

use thiserror::Error;

/// Result type alias for COBie operations
pub type Result<T> = std::result::Result<T, CobieError>;

/// Main error type for COBie federation
#[derive(Error, Debug)]
pub enum CobieError {
    /// A sheet name that is not part of the closed sheet registry
    #[error("Unknown sheet kind: '{0}'")]
    UnknownSheetKind(String),

    /// Malformed input detected before any merge work starts
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl CobieError {
    /// Create a precondition error
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// True for the errors that reject a run before merging begins
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::UnknownSheetKind(_) | Self::Precondition(_))
    }
}
