//! Action execution error types

use thiserror::Error;

/// Errors raised while carrying out an activated item's action
#[derive(Debug, Error)]
pub enum ActionError {
    /// The action carried an empty path
    #[error("Cannot open an empty path")]
    EmptyPath,

    /// The path to open does not exist
    #[error("Path '{0}' does not exist")]
    MissingPath(String),

    /// The desktop opener failed
    #[error("Failed to open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The clipboard could not be reached or written
    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

impl From<arboard::Error> for ActionError {
    fn from(err: arboard::Error) -> Self {
        Self::Clipboard(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
