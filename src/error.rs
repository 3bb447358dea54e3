//! Centralized error types for mailthread.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the mailthread library.
#[derive(Error, Debug)]
pub enum MailError {
    /// I/O error with the associated file path.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The input is structurally incomplete (e.g. a message without a part tree).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The requested thread does not exist in the provider.
    #[error("Thread not found: {0}")]
    ThreadNotFound(String),

    /// The requested attachment does not exist in the provider.
    #[error("Attachment '{attachment_id}' not found in message '{message_id}'")]
    AttachmentNotFound {
        message_id: String,
        attachment_id: String,
    },

    /// A provider payload file could not be deserialized.
    #[error("Malformed payload in '{path}': {source}")]
    Payload {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Binary content could not be decoded.
    #[error("Decoding error: {0}")]
    Decode(String),

    /// An export operation failed.
    #[error("Export error: {0}")]
    ExportError(String),

    /// An invalid path was provided.
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Convenience alias for `Result<T, MailError>`.
pub type Result<T> = std::result::Result<T, MailError>;

impl MailError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Allow `?` on `std::io::Error` when no path context is available
/// (rare; prefer `MailError::io`).
impl From<std::io::Error> for MailError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<unknown>"),
            source,
        }
    }
}
