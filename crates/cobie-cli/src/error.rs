//! Error types for the cobie CLI
//!
//! Every variant carries a message meant for the person at the terminal.

use cobie_common::CobieError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// The engine refused the run
    #[error("Federation failed: {0}")]
    Federation(#[from] CobieError),

    #[error("File not found: '{0}'. Verify the file path exists and you have read permissions.")]
    FileNotFound(String),

    /// A workbook document that parsed as JSON but does not describe a workbook
    #[error("Invalid workbook '{path}': {message}")]
    InvalidDocument { path: String, message: String },

    #[error("Unknown sheet '{0}'. Run 'cobie schema' to list the sheet kinds.")]
    UnknownSheet(String),

    #[error("Validation reported {0} error(s)")]
    ValidationFailed(usize),

    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}. Check the file syntax.")]
    JsonParse(#[from] serde_json::Error),

    #[error("Configuration error: {0}. Check your environment variables or config file.")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_document(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_errors_keep_their_message() {
        let err: CliError = CobieError::UnknownSheetKind("Widgets".into()).into();
        assert_eq!(
            err.to_string(),
            "Federation failed: Unknown sheet kind: 'Widgets'"
        );
    }

    #[test]
    fn test_invalid_document_message() {
        let err = CliError::invalid_document("a.json", "sheet Floor row 0: unknown column Colour");
        assert_eq!(
            err.to_string(),
            "Invalid workbook 'a.json': sheet Floor row 0: unknown column Colour"
        );
    }
}
