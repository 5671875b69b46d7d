//! Configuration module for fuzzy-finder
//!
//! Base preferences are layered, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. `config.toml` in the user's config directory (or `--config <path>`)
//! 3. `FUZZY_FINDER_<KEY>` environment variables
//!
//! Per-query values from the host or `--set` flags are applied on top by the
//! caller. All values end up as strings and are validated per query.

use crate::preferences::{
    ALLOW_HIDDEN, DEFAULTS, FOLLOW_SYMLINKS, RawPreferences, TRIM_DISPLAY_PATH,
};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of preference environment variables
pub const ENV_PREFIX: &str = "FUZZY_FINDER";

const FLAG_KEYS: [&str; 3] = [ALLOW_HIDDEN, FOLLOW_SYMLINKS, TRIM_DISPLAY_PATH];

/// Contents written by `config init`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// 0 opens the containing directory, 1 copies the path
    pub alt_enter_action: i64,
    /// 0 both, 1 files only, 2 directories only
    pub search_type: i64,
    pub allow_hidden: bool,
    pub follow_symlinks: bool,
    pub trim_display_path: bool,
    pub result_limit: i64,
    pub base_dir: String,
    pub ignore_file: String,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            alt_enter_action: 0,
            search_type: 0,
            allow_hidden: false,
            follow_symlinks: false,
            trim_display_path: false,
            result_limit: 15,
            base_dir: "~".to_string(),
            ignore_file: String::new(),
        }
    }
}

/// Get the path to the default config file
///
/// # Errors
///
/// Returns `ConfigError` if the system config directory cannot be determined.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

    Ok(config_dir.join("fuzzy-finder").join("config.toml"))
}

/// Load base preferences
///
/// An explicit `path` must exist; the default config file is optional.
///
/// # Errors
///
/// Returns `ConfigError` if a file cannot be read or parsed, or a value is
/// not a scalar.
pub fn load(path: Option<&Path>) -> Result<RawPreferences, ConfigError> {
    match path {
        Some(path) => load_from(Some(path), true, None),
        None => {
            let default_path = config_path().ok();
            load_from(default_path.as_deref(), false, None)
        }
    }
}

/// Load base preferences from `file` and the environment
///
/// `env` replaces the process environment when given.
///
/// # Errors
///
/// See [`load`].
pub fn load_from(
    file: Option<&Path>,
    required: bool,
    env: Option<config::Map<String, String>>,
) -> Result<RawPreferences, ConfigError> {
    let mut builder = Config::builder();
    for (key, value) in DEFAULTS {
        builder = builder.set_default(key, value)?;
    }

    if let Some(file) = file {
        tracing::debug!(path = %file.display(), required, "Reading config file");
        builder = builder.add_source(
            File::from(file)
                .format(FileFormat::Toml)
                .required(required),
        );
    }

    let settings = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).source(env))
        .build()?;

    let mut raw = RawPreferences::new();
    for (key, _) in DEFAULTS {
        let value = settings.get_string(key)?;
        raw.insert(key.to_string(), normalize(key, value));
    }
    tracing::debug!(?raw, "Loaded base preferences");
    Ok(raw)
}

/// Flags may be written as TOML booleans; the host encodes them as 0/1
fn normalize(key: &str, value: String) -> String {
    if !FLAG_KEYS.contains(&key) {
        return value;
    }
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => "1".to_string(),
        "false" => "0".to_string(),
        _ => value,
    }
}

/// Write the default configuration to `path`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists and `force` is not set, or the
/// file cannot be written.
pub fn save_defaults(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::Message(format!(
            "Config file '{}' already exists (use --force to overwrite)",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
    }

    let toml_string = toml::to_string_pretty(&ConfigFile::default())
        .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

    fs::write(path, toml_string)
        .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

    tracing::info!(path = %path.display(), "Wrote default config");
    Ok(())
}
