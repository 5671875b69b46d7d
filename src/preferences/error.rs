//! Preference validation errors
//!
//! Every variant renders as the exact sentence shown to the user in the
//! launcher, so the `Display` strings are part of the extension's contract.

use thiserror::Error;

/// A single invalid preference value
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PreferenceError {
    /// `base_dir` does not name an existing directory
    #[error("Base directory '{0}' is not a directory.")]
    BaseDirNotDirectory(String),

    /// `ignore_file` does not name an existing regular file
    #[error("Ignore file '{0}' is not a file.")]
    IgnoreFileNotFile(String),

    /// `result_limit` is not an integer
    #[error("Result limit must be an integer.")]
    ResultLimitNotInteger,

    /// `result_limit` is zero or negative
    #[error("Result limit must be greater than 0.")]
    ResultLimitNotPositive,

    /// An enumerated preference carries an unknown code
    #[error("Preference '{key}' has unrecognized value '{value}'.")]
    InvalidChoice {
        /// Preference key
        key: &'static str,
        /// Raw value as received
        value: String,
    },

    /// A boolean preference is not an integer flag
    #[error("Preference '{key}' must be 0 or 1, got '{value}'.")]
    InvalidFlag {
        /// Preference key
        key: &'static str,
        /// Raw value as received
        value: String,
    },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
