//! Fuzzy finder - find files and directories with `fd` and `fzf`
//!
//! This library implements a launcher extension: the traversal tool lists
//! every path below a base directory, `fzf --filter` ranks them against the
//! user's query, and the best matches come back as actionable items.
//!
//! The [`extension::Extension`] type is the entry point. It is driven either
//! by the JSON-lines [`protocol`] or by the `fuzzy-finder` CLI.

use thiserror::Error;

pub mod actions;
pub mod binaries;
pub mod cli;
pub mod completions;
pub mod config;
pub mod extension;
pub mod logging;
pub mod preferences;
pub mod protocol;
pub mod results;
pub mod search;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum FinderError {
    /// Invalid preference value
    #[error("Preference error: {0}")]
    PreferenceError(#[from] preferences::PreferenceError),
    /// Search pipeline error
    #[error("Search error: {0}")]
    SearchError(#[from] search::SearchError),
    /// Action execution error
    #[error("Action error: {0}")]
    ActionError(#[from] actions::ActionError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Response encoding error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
