//! Error types for null-annotator
//!
//! Provides unified error handling across the crate.

use thiserror::Error;

/// Main error type for annotation analysis operations
#[derive(Debug, Error)]
pub enum AnnotatorError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error (malformed JSON input)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Analysis error (corrupt or inconsistent analysis input)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AnnotatorError {
    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        AnnotatorError::Parse(msg.into())
    }

    /// Create an internal error (alias for analysis error)
    pub fn internal(msg: impl Into<String>) -> Self {
        AnnotatorError::Analysis(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        AnnotatorError::Config(msg.into())
    }
}

impl From<serde_json::Error> for AnnotatorError {
    fn from(err: serde_json::Error) -> Self {
        AnnotatorError::Parse(err.to_string())
    }
}

/// Result type alias for annotator operations
pub type Result<T> = std::result::Result<T, AnnotatorError>;
