//! Error types for the portfix-core library.
//!
//! The conflict engine itself never fails; these errors come from the
//! ambient operations around it (configuration, compose-file I/O).

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for portfix operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, fixing, or saving compose files.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The input could not be treated as a compose document.
    #[error("Invalid document {}: {reason}", path.display())]
    InvalidDocument { path: PathBuf, reason: String },

    /// No document was supplied.
    #[error("No input: pass a compose file path or pipe a document on stdin")]
    NoInput,
}
