//! User preferences for the fuzzy finder extension
//!
//! The host hands preferences over as a flat map of strings (numbers and
//! flags are integer-coded, paths may start with `~`). This module turns that
//! map into a typed [`Preferences`] value and validates it.
//!
//! Validation never stops at the first problem: every invalid value produces
//! its own [`PreferenceError`], so a user with three misconfigured settings
//! sees three messages in a single response.

pub mod error;

pub use error::PreferenceError;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Raw preference values keyed by preference name
pub type RawPreferences = BTreeMap<String, String>;

pub const ALT_ENTER_ACTION: &str = "alt_enter_action";
pub const SEARCH_TYPE: &str = "search_type";
pub const ALLOW_HIDDEN: &str = "allow_hidden";
pub const FOLLOW_SYMLINKS: &str = "follow_symlinks";
pub const TRIM_DISPLAY_PATH: &str = "trim_display_path";
pub const RESULT_LIMIT: &str = "result_limit";
pub const BASE_DIR: &str = "base_dir";
pub const IGNORE_FILE: &str = "ignore_file";

/// Default raw value for every known preference
pub const DEFAULTS: [(&str, &str); 8] = [
    (ALT_ENTER_ACTION, "0"),
    (SEARCH_TYPE, "0"),
    (ALLOW_HIDDEN, "0"),
    (FOLLOW_SYMLINKS, "0"),
    (TRIM_DISPLAY_PATH, "0"),
    (RESULT_LIMIT, "15"),
    (BASE_DIR, "~"),
    (IGNORE_FILE, ""),
];

/// Raw preferences populated with [`DEFAULTS`]
#[must_use]
pub fn default_raw_preferences() -> RawPreferences {
    DEFAULTS
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}

/// What the alternate activation (alt+enter) of a result does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AltEnterAction {
    /// Open the directory containing the result (or the result itself if it is a directory)
    #[default]
    OpenPath,
    /// Copy the result's path to the clipboard
    CopyPath,
}

impl AltEnterAction {
    /// Decode the integer code used by the host
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::OpenPath),
            1 => Some(Self::CopyPath),
            _ => None,
        }
    }
}

/// Which kinds of filesystem entries the traversal should emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    /// Files and directories
    #[default]
    Both,
    /// Regular files only
    Files,
    /// Directories only
    Dirs,
}

impl SearchType {
    /// Decode the integer code used by the host
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Both),
            1 => Some(Self::Files),
            2 => Some(Self::Dirs),
            _ => None,
        }
    }
}

/// Validated, normalized preferences for one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub alt_enter_action: AltEnterAction,
    pub search_type: SearchType,
    pub allow_hidden: bool,
    pub follow_symlinks: bool,
    pub trim_display_path: bool,
    /// Maximum number of results shown, always greater than zero
    pub result_limit: usize,
    /// Directory the traversal starts from, `~` already expanded
    pub base_dir: PathBuf,
    /// Extra ignore-pattern file handed to the traversal tool
    pub ignore_file: Option<PathBuf>,
}

impl Preferences {
    /// Preferences with default values searching below `base_dir`
    #[must_use]
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            alt_enter_action: AltEnterAction::default(),
            search_type: SearchType::default(),
            allow_hidden: false,
            follow_symlinks: false,
            trim_display_path: false,
            result_limit: 15,
            base_dir: base_dir.into(),
            ignore_file: None,
        }
    }
}

/// Expand a leading `~` against `home`
///
/// An empty string means "not set" and yields `None`.
#[must_use]
pub fn expand_path(raw: &str, home: Option<&Path>) -> Option<PathBuf> {
    if raw.is_empty() {
        return None;
    }
    let expanded: Cow<'_, str> = shellexpand::tilde_with_context(raw, || home);
    Some(PathBuf::from(expanded.as_ref()))
}

/// Parse and validate preferences using the current user's home directory
///
/// # Errors
///
/// Returns every `PreferenceError` found; see [`get_preferences_with_home`].
pub fn get_preferences(raw: &RawPreferences) -> Result<Preferences, Vec<PreferenceError>> {
    let home = dirs::home_dir();
    get_preferences_with_home(raw, home.as_deref())
}

/// Parse and validate preferences, expanding `~` against `home`
///
/// Keys missing from `raw` take their value from [`DEFAULTS`].
///
/// # Errors
///
/// Returns all validation failures at once when any value is invalid:
/// a base directory that is not a directory, an ignore file that is not a
/// file, a non-integer or non-positive result limit, or an unrecognized
/// enum/flag code.
pub fn get_preferences_with_home(
    raw: &RawPreferences,
    home: Option<&Path>,
) -> Result<Preferences, Vec<PreferenceError>> {
    tracing::debug!("Validating user preferences");
    let mut errors = Vec::new();

    let base_dir = expand_path(value(raw, BASE_DIR), home)
        .or_else(|| home.map(Path::to_path_buf))
        .unwrap_or_default();
    if !base_dir.is_dir() {
        errors.push(PreferenceError::BaseDirNotDirectory(
            base_dir.display().to_string(),
        ));
    }

    let ignore_file = expand_path(value(raw, IGNORE_FILE), home);
    if let Some(file) = ignore_file.as_ref().filter(|file| !file.is_file()) {
        errors.push(PreferenceError::IgnoreFileNotFile(file.display().to_string()));
    }

    let result_limit = parse_result_limit(value(raw, RESULT_LIMIT), &mut errors);

    let alt_enter_action = parse_choice(raw, ALT_ENTER_ACTION, AltEnterAction::from_code, &mut errors);
    let search_type = parse_choice(raw, SEARCH_TYPE, SearchType::from_code, &mut errors);
    let allow_hidden = parse_flag(raw, ALLOW_HIDDEN, &mut errors);
    let follow_symlinks = parse_flag(raw, FOLLOW_SYMLINKS, &mut errors);
    let trim_display_path = parse_flag(raw, TRIM_DISPLAY_PATH, &mut errors);

    match (
        alt_enter_action,
        search_type,
        allow_hidden,
        follow_symlinks,
        trim_display_path,
        result_limit,
    ) {
        (
            Some(alt_enter_action),
            Some(search_type),
            Some(allow_hidden),
            Some(follow_symlinks),
            Some(trim_display_path),
            Some(result_limit),
        ) if errors.is_empty() => {
            tracing::debug!("User preferences validated");
            Ok(Preferences {
                alt_enter_action,
                search_type,
                allow_hidden,
                follow_symlinks,
                trim_display_path,
                result_limit,
                base_dir,
                ignore_file,
            })
        }
        _ => Err(errors),
    }
}

fn value<'a>(raw: &'a RawPreferences, key: &str) -> &'a str {
    raw.get(key).map_or_else(
        || {
            DEFAULTS
                .iter()
                .find(|(name, _)| *name == key)
                .map_or("", |(_, default)| *default)
        },
        String::as_str,
    )
}

fn parse_int(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Any optionally signed run of digits is an integer, however long
///
/// Positive limits beyond `usize::MAX` saturate.
fn parse_result_limit(raw: &str, errors: &mut Vec<PreferenceError>) -> Option<usize> {
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        errors.push(PreferenceError::ResultLimitNotInteger);
        return None;
    }

    if negative || digits.bytes().all(|b| b == b'0') {
        errors.push(PreferenceError::ResultLimitNotPositive);
        return None;
    }

    Some(digits.parse().unwrap_or(usize::MAX))
}

fn parse_choice<T>(
    raw: &RawPreferences,
    key: &'static str,
    decode: fn(i64) -> Option<T>,
    errors: &mut Vec<PreferenceError>,
) -> Option<T> {
    let value = value(raw, key);
    let decoded = parse_int(value).and_then(decode);
    if decoded.is_none() {
        errors.push(PreferenceError::InvalidChoice {
            key,
            value: value.to_string(),
        });
    }
    decoded
}

fn parse_flag(
    raw: &RawPreferences,
    key: &'static str,
    errors: &mut Vec<PreferenceError>,
) -> Option<bool> {
    let value = value(raw, key);
    let flag = parse_int(value).map(|code| code != 0);
    if flag.is_none() {
        errors.push(PreferenceError::InvalidFlag {
            key,
            value: value.to_string(),
        });
    }
    flag
}
