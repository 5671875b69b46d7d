//! Command-line interface definitions and parsing
//!
//! This module defines the CLI of the `fuzzy-finder` binary using `clap`.
//!
//! # Commands
//!
//! - **query**: run a single query and print the result list
//! - **serve**: answer JSON-lines requests from a launcher host on stdin
//! - **config**: create or locate the configuration file
//! - **completions**: print shell completions
//!
//! # Examples
//!
//! ```bash
//! fuzzy-finder query readme --set search_type=1 --set result_limit=5
//! fuzzy-finder query readme --select 1 --alt
//! fuzzy-finder serve
//! ```

use crate::preferences::{DEFAULTS, RawPreferences};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "fuzzy-finder")]
#[command(about = "Find files and directories with fd and fzf", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Read base preferences from this file instead of the default location
    #[arg(short = 'c', long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a single query and print the results
    #[command(visible_alias = "q")]
    Query {
        /// Text to filter paths with
        #[arg(value_name = "QUERY")]
        query: Option<String>,

        /// Override a preference for this query (can specify multiple)
        #[arg(short = 's', long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,

        /// Print the result list as JSON
        #[arg(long = "json")]
        json: bool,

        /// Activate the N-th result (1-based)
        #[arg(long = "select", value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
        select: Option<u64>,

        /// Use the alternate action of the selected result
        #[arg(long = "alt", requires = "select")]
        alt: bool,
    },

    /// Answer launcher requests on stdin (one JSON object per line)
    Serve,

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Print shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short = 'f', long = "force")]
        force: bool,
    },

    /// Print the configuration file location
    Path,
}

impl Cli {
    /// Parse command-line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Commands {
    /// Preference overrides given with `--set`
    #[must_use]
    pub fn overrides(&self) -> RawPreferences {
        match self {
            Self::Query { set, .. } => set.iter().cloned().collect(),
            _ => RawPreferences::new(),
        }
    }
}

/// Parse a `KEY=VALUE` preference assignment
///
/// # Errors
///
/// Returns a message if the `=` is missing or the key is not a known
/// preference.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();

    if !DEFAULTS.iter().any(|(name, _)| *name == key) {
        let known: Vec<&str> = DEFAULTS.iter().map(|(name, _)| *name).collect();
        return Err(format!(
            "unknown preference '{key}' (expected one of: {})",
            known.join(", ")
        ));
    }

    Ok((key.to_string(), value.to_string()))
}
