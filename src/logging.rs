//! Logging setup
//!
//! Everything is logged to stderr; stdout carries protocol responses and
//! query output. The filter is read from `FUZZY_FINDER_LOG`, then
//! `RUST_LOG`, and defaults to `warn` (`debug` with `--verbose`).

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "FUZZY_FINDER_LOG";

/// Pick the filter directive from the environment values and verbosity
#[must_use]
pub fn filter_directive(app_log: Option<String>, rust_log: Option<String>, verbose: bool) -> String {
    app_log
        .or(rust_log)
        .filter(|directive| !directive.trim().is_empty())
        .unwrap_or_else(|| if verbose { "debug" } else { "warn" }.to_string())
}

/// Install the global subscriber
///
/// Calling this more than once leaves the first subscriber in place.
pub fn init(verbose: bool) {
    let directive = filter_directive(
        std::env::var(LOG_ENV).ok(),
        std::env::var("RUST_LOG").ok(),
        verbose,
    );
    let env_filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(filter = %directive, "Logging initialized");
    }
}
