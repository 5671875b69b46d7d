//! Query execution through `fd` and `fzf`
//!
//! A search is a two-process pipeline: the traversal tool lists every
//! candidate below the base directory and its standard output is connected
//! straight to the standard input of `fzf --filter <query>`, which ranks the
//! candidates non-interactively. Only the filter's output is read back.
//!
//! The pipe between the two processes is an OS pipe, so arbitrarily large
//! trees stream through without being buffered in this process.

pub mod error;

pub use error::{FILTER_NO_MATCH_EXIT_CODE, SearchError};

use crate::binaries::Executables;
use crate::preferences::{Preferences, SearchType};
use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::{Child, Command, Stdio};

/// Build the traversal command line for the given preferences
///
/// The result starts with the executable itself:
/// `<fd> . <base_dir> [--type f|--type d] [--hidden] [--follow] [--ignore-file <path>]`
#[must_use]
pub fn traversal_command(fd_bin: &Path, preferences: &Preferences) -> Vec<OsString> {
    let mut cmd: Vec<OsString> = vec![
        fd_bin.as_os_str().to_owned(),
        OsString::from("."),
        preferences.base_dir.as_os_str().to_owned(),
    ];

    match preferences.search_type {
        SearchType::Files => cmd.extend(["--type", "f"].map(OsString::from)),
        SearchType::Dirs => cmd.extend(["--type", "d"].map(OsString::from)),
        SearchType::Both => {}
    }

    if preferences.allow_hidden {
        cmd.push(OsString::from("--hidden"));
    }

    if preferences.follow_symlinks {
        cmd.push(OsString::from("--follow"));
    }

    if let Some(ignore_file) = &preferences.ignore_file {
        cmd.push(OsString::from("--ignore-file"));
        cmd.push(ignore_file.as_os_str().to_owned());
    }

    cmd
}

/// Build the filter command line for `query`
#[must_use]
pub fn filter_command(fzf_bin: &Path, query: &str) -> Vec<OsString> {
    vec![
        fzf_bin.as_os_str().to_owned(),
        OsString::from("--filter"),
        OsString::from(query),
    ]
}

/// Run the search pipeline and return at most `result_limit` paths
///
/// Paths keep the order the filter ranked them in.
///
/// # Errors
///
/// Returns `SearchError::CommandFailed` if the filter exits unsuccessfully
/// (exit code 1 meaning "no match"), `SearchError::Spawn` if either program
/// cannot be started, and `SearchError::Io`/`SearchError::InvalidOutput` if
/// the filter output cannot be collected.
pub fn search(
    query: &str,
    preferences: &Preferences,
    executables: &Executables,
) -> Result<Vec<String>, SearchError> {
    tracing::debug!(query, "Finding results");

    let fd_cmd = traversal_command(&executables.traversal, preferences);
    let fzf_cmd = filter_command(&executables.filter, query);
    let output = run_pipeline(&fd_cmd, &fzf_cmd)?;

    let results: Vec<String> = output
        .lines()
        .take(preferences.result_limit)
        .map(str::to_string)
        .collect();
    tracing::info!(count = results.len(), ?results, "Found results");

    Ok(results)
}

/// Run `producer | consumer` and return the consumer's standard output
///
/// Only the consumer's exit status is checked. The producer is reaped once
/// the consumer has finished and its status is only logged.
///
/// # Errors
///
/// See [`search`].
pub fn run_pipeline(producer: &[OsString], consumer: &[OsString]) -> Result<String, SearchError> {
    let (producer_program, producer_args) =
        producer.split_first().ok_or(SearchError::EmptyCommand)?;
    let (consumer_program, consumer_args) =
        consumer.split_first().ok_or(SearchError::EmptyCommand)?;

    tracing::debug!(command = ?producer, "Starting traversal");
    let mut producer_child = Command::new(producer_program)
        .args(producer_args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|source| SearchError::Spawn {
            command: command_name(producer_program),
            source,
        })?;

    let Some(pipe) = producer_child.stdout.take() else {
        reap(&mut producer_child, true);
        return Err(SearchError::Io(std::io::Error::other(
            "traversal output was not captured",
        )));
    };

    tracing::debug!(command = ?consumer, "Starting filter");
    let consumer_output = Command::new(consumer_program)
        .args(consumer_args)
        .stdin(Stdio::from(pipe))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .and_then(Child::wait_with_output);

    let output = match consumer_output {
        Ok(output) => output,
        Err(source) => {
            reap(&mut producer_child, true);
            return Err(SearchError::Spawn {
                command: command_name(consumer_program),
                source,
            });
        }
    };

    reap(&mut producer_child, !output.status.success());

    if !output.status.success() {
        let command = command_name(consumer_program);
        tracing::debug!(
            command,
            code = ?output.status.code(),
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "Subprocess failed"
        );
        return Err(SearchError::CommandFailed {
            command,
            code: output.status.code(),
        });
    }

    Ok(String::from_utf8(output.stdout)?)
}

fn command_name(program: &OsStr) -> String {
    program.to_string_lossy().into_owned()
}

/// Wait for the producer, killing it first when its output is no longer wanted
fn reap(child: &mut Child, kill: bool) {
    if kill {
        let _ = child.kill();
    }
    match child.wait() {
        Ok(status) if !status.success() && !kill => {
            tracing::debug!(code = ?status.code(), "Traversal exited unsuccessfully");
        }
        Ok(_) => {}
        Err(e) => tracing::debug!(error = %e, "Failed to reap traversal process"),
    }
}
