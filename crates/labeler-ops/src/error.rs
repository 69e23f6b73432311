//! Error types for the operations layer.

use std::path::PathBuf;
use thiserror::Error;

use labeler_core::ParseOptionError;

/// Result type for operations.
pub type OpsResult<T> = Result<T, OpsError>;

/// Errors that can occur during operations.
///
/// Vocabulary load failures never surface here: the store substitutes the
/// built-in vocabulary instead.
#[derive(Debug, Error)]
pub enum OpsError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A string did not name a known option.
    #[error("Invalid {kind}: {value}")]
    InvalidArgument { kind: String, value: String },

    /// Writing an exported vocabulary failed.
    #[error("Failed to export to {path}: {message}")]
    Export { path: PathBuf, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl OpsError {
    /// Create an invalid-argument error.
    pub fn invalid(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidArgument {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

impl From<ParseOptionError> for OpsError {
    fn from(err: ParseOptionError) -> Self {
        OpsError::InvalidArgument {
            kind: err.kind.to_string(),
            value: err.value,
        }
    }
}
