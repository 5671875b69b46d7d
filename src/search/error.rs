//! Search pipeline error types
//!
//! Errors that can occur while running the traversal tool piped into the
//! filter tool.
//!
//! # Error Types
//!
//! - **`CommandFailed`**: the filter process exited with a nonzero status. The
//!   caller inspects `command` and `code` to tell "no match" apart from a
//!   genuine failure.
//! - **`Spawn`**: one of the executables could not be started
//! - **`Io`**: waiting for a process or reading its output failed
//! - **`InvalidOutput`**: the filter printed something that is not UTF-8

use std::path::Path;
use thiserror::Error;

/// Exit status `fzf --filter` uses when nothing matched the query
pub const FILTER_NO_MATCH_EXIT_CODE: i32 = 1;

/// Search-specific errors
#[derive(Debug, Error)]
pub enum SearchError {
    /// A command was given without a program to run
    #[error("Empty command line")]
    EmptyCommand,

    /// The process could not be started
    #[error("Failed to start '{command}': {source}")]
    Spawn {
        /// Program that failed to start
        command: String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// The process ran but exited unsuccessfully
    #[error("Command '{command}' exited with {}", describe_exit(.code))]
    CommandFailed {
        /// Program that failed, as it was invoked
        command: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
    },

    /// I/O error while waiting on the pipeline
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The filter output is not valid UTF-8
    #[error("Filter output is not valid UTF-8: {0}")]
    InvalidOutput(#[from] std::string::FromUtf8Error),
}

impl SearchError {
    /// Whether this is the filter tool reporting that nothing matched
    #[must_use]
    pub fn is_no_match(&self, filter: &Path) -> bool {
        matches!(
            self,
            Self::CommandFailed { command, code: Some(FILTER_NO_MATCH_EXIT_CODE) }
                if Path::new(command) == filter
        )
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    code.map_or_else(
        || "termination by signal".to_string(),
        |code| format!("status code {code}"),
    )
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
