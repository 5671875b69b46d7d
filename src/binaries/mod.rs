//! Discovery of the external traversal and filter executables
//!
//! The extension never walks the filesystem or ranks matches itself. It shells
//! out to `fd` (packaged as `fdfind` on Debian derivatives) and `fzf`, so every
//! query starts by checking that both can be found on `PATH`.
//!
//! Lookups go through the [`ExecutableLookup`] trait so tests can substitute
//! a scripted environment for the real `PATH`.

mod cache;

pub use cache::BinaryCache;

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Logical role an external executable plays in the query pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Walks the base directory and emits candidate paths (`fd`)
    Traversal,
    /// Ranks candidate paths against the query (`fzf`)
    Filter,
}

impl Role {
    /// Executable names to probe, in order of preference
    #[must_use]
    pub const fn candidates(self) -> &'static [&'static str] {
        match self {
            Self::Traversal => &["fd", "fdfind"],
            Self::Filter => &["fzf"],
        }
    }

    /// Name of the package the user has to install
    #[must_use]
    pub const fn dependency_name(self) -> &'static str {
        match self {
            Self::Traversal => "fd",
            Self::Filter => "fzf",
        }
    }

    /// User-facing message for an unresolved role
    #[must_use]
    pub fn missing_message(self) -> String {
        let name = self.dependency_name();
        format!("Missing dependency {name}. Please install {name}.")
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dependency_name())
    }
}

/// Failure of a single executable probe
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// The name does not resolve to an executable
    #[error("'{0}' not found")]
    NotFound(String),

    /// The probe itself failed (unreadable `PATH`, no working directory, ...)
    #[error("lookup of '{name}' failed: {reason}")]
    Environment {
        /// Name that was being probed
        name: String,
        /// Underlying failure description
        reason: String,
    },
}

/// Strategy for turning an executable name into a runnable path
pub trait ExecutableLookup {
    /// Resolve `name` to an executable path
    ///
    /// # Errors
    ///
    /// Returns `LookupError` if the name cannot be resolved. Callers treat
    /// every variant as "not installed".
    fn find(&self, name: &str) -> Result<PathBuf, LookupError>;
}

/// Lookup against the process `PATH` using the `which` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct PathLookup;

impl ExecutableLookup for PathLookup {
    fn find(&self, name: &str) -> Result<PathBuf, LookupError> {
        match which::which(name) {
            Ok(path) => Ok(path),
            Err(which::Error::CannotFindBinaryPath) => Err(LookupError::NotFound(name.to_string())),
            Err(e) => Err(LookupError::Environment {
                name: name.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

/// Executables found for each role; a role that did not resolve is `None`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutableSet {
    /// `fd` or `fdfind`, if found
    pub traversal: Option<PathBuf>,
    /// `fzf`, if found
    pub filter: Option<PathBuf>,
}

impl ExecutableSet {
    /// Path resolved for `role`, if any
    #[must_use]
    pub const fn get(&self, role: Role) -> Option<&PathBuf> {
        match role {
            Role::Traversal => self.traversal.as_ref(),
            Role::Filter => self.filter.as_ref(),
        }
    }

    /// Roles that could not be resolved, filter first
    #[must_use]
    pub fn missing(&self) -> Vec<Role> {
        [Role::Filter, Role::Traversal]
            .into_iter()
            .filter(|role| self.get(*role).is_none())
            .collect()
    }

    /// Both executables, if both resolved
    #[must_use]
    pub fn complete(&self) -> Option<Executables> {
        Some(Executables {
            traversal: self.traversal.clone()?,
            filter: self.filter.clone()?,
        })
    }
}

impl From<Executables> for ExecutableSet {
    fn from(value: Executables) -> Self {
        Self {
            traversal: Some(value.traversal),
            filter: Some(value.filter),
        }
    }
}

/// Fully resolved executables, ready to be run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Executables {
    /// Program listing candidate paths
    pub traversal: PathBuf,
    /// Program ranking candidates against the query
    pub filter: PathBuf,
}

/// Resolve the first candidate name that the lookup can find
///
/// Lookup failures of any kind are treated as "not found" and the next
/// candidate is tried.
pub fn resolve(lookup: &dyn ExecutableLookup, candidates: &[&str]) -> Option<PathBuf> {
    candidates.iter().find_map(|name| match lookup.find(name) {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::debug!(candidate = name, error = %e, "executable candidate not usable");
            None
        }
    })
}

/// Resolve both roles and describe every role that is missing
///
/// Returns the (possibly partial) set together with one
/// `"Missing dependency ..."` message per unresolved role.
pub fn get_binaries(lookup: &dyn ExecutableLookup) -> (ExecutableSet, Vec<String>) {
    tracing::debug!("Checking and getting binaries for dependencies");

    let set = ExecutableSet {
        filter: resolve(lookup, Role::Filter.candidates()),
        traversal: resolve(lookup, Role::Traversal.candidates()),
    };

    let errors: Vec<String> = set.missing().into_iter().map(Role::missing_message).collect();

    if errors.is_empty() {
        tracing::debug!(
            fd = %display_opt(set.traversal.as_ref()),
            fzf = %display_opt(set.filter.as_ref()),
            "Using binaries"
        );
    }

    (set, errors)
}

fn display_opt(path: Option<&PathBuf>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Scripted lookup that records every probed name
    struct ScriptedLookup {
        answers: HashMap<&'static str, Result<PathBuf, LookupError>>,
        calls: RefCell<Vec<String>>,
    }

    impl ScriptedLookup {
        fn new(answers: Vec<(&'static str, Result<PathBuf, LookupError>)>) -> Self {
            Self {
                answers: answers.into_iter().collect(),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl ExecutableLookup for ScriptedLookup {
        fn find(&self, name: &str) -> Result<PathBuf, LookupError> {
            self.calls.borrow_mut().push(name.to_string());
            self.answers
                .get(name)
                .cloned()
                .unwrap_or_else(|| Err(LookupError::NotFound(name.to_string())))
        }
    }

    fn env_failure(name: &str) -> LookupError {
        LookupError::Environment {
            name: name.to_string(),
            reason: "probe exited with status 1".to_string(),
        }
    }

    #[test]
    fn test_get_binaries() {
        let lookup = ScriptedLookup::new(vec![
            ("fzf", Ok(PathBuf::from("/usr/bin/fzf"))),
            ("fd", Ok(PathBuf::from("/usr/bin/fd"))),
        ]);

        let (set, errors) = get_binaries(&lookup);

        assert!(errors.is_empty());
        assert_eq!(set.filter, Some(PathBuf::from("/usr/bin/fzf")));
        assert_eq!(set.traversal, Some(PathBuf::from("/usr/bin/fd")));
        assert_eq!(lookup.calls(), vec!["fzf", "fd"]);
    }

    #[test]
    fn test_get_binaries_uses_fdfind_when_no_fd() {
        let lookup = ScriptedLookup::new(vec![
            ("fzf", Ok(PathBuf::from("/usr/bin/fzf"))),
            ("fd", Err(env_failure("fd"))),
            ("fdfind", Ok(PathBuf::from("/usr/bin/fdfind"))),
        ]);

        let (set, errors) = get_binaries(&lookup);

        assert!(errors.is_empty());
        assert_eq!(set.traversal, Some(PathBuf::from("/usr/bin/fdfind")));
        assert_eq!(lookup.calls(), vec!["fzf", "fd", "fdfind"]);
    }

    #[test]
    fn test_missing_fzf() {
        let lookup = ScriptedLookup::new(vec![
            ("fzf", Err(env_failure("fzf"))),
            ("fd", Ok(PathBuf::from("/usr/bin/fd"))),
        ]);

        let (set, errors) = get_binaries(&lookup);

        assert_eq!(errors, vec!["Missing dependency fzf. Please install fzf."]);
        assert!(set.filter.is_none());
        assert!(set.complete().is_none());
        assert_eq!(lookup.calls(), vec!["fzf", "fd"]);
    }

    #[test]
    fn test_missing_fd() {
        let lookup = ScriptedLookup::new(vec![("fzf", Ok(PathBuf::from("/usr/bin/fzf")))]);

        let (set, errors) = get_binaries(&lookup);

        assert_eq!(errors, vec!["Missing dependency fd. Please install fd."]);
        assert!(set.traversal.is_none());
        assert_eq!(lookup.calls(), vec!["fzf", "fd", "fdfind"]);
    }

    #[test]
    fn test_missing_both_reports_filter_first() {
        let lookup = ScriptedLookup::new(Vec::new());

        let (set, errors) = get_binaries(&lookup);

        assert_eq!(set.missing(), vec![Role::Filter, Role::Traversal]);
        assert_eq!(
            errors,
            vec![
                "Missing dependency fzf. Please install fzf.",
                "Missing dependency fd. Please install fd.",
            ]
        );
    }

    #[test]
    fn test_resolve_environment_error_is_not_found() {
        let lookup = ScriptedLookup::new(vec![("cmd", Err(env_failure("cmd")))]);
        assert_eq!(resolve(&lookup, &["cmd"]), None);
    }

    #[test]
    fn test_resolve_returns_resolved_form() {
        let lookup = ScriptedLookup::new(vec![("cmd", Ok(PathBuf::from("/usr/bin/cmd")))]);
        assert_eq!(resolve(&lookup, &["cmd"]), Some(PathBuf::from("/usr/bin/cmd")));
    }

    #[test]
    fn test_complete_requires_both_roles() {
        let set = ExecutableSet {
            traversal: Some(PathBuf::from("fd")),
            filter: Some(PathBuf::from("fzf")),
        };
        let complete = set.complete().unwrap();
        assert_eq!(complete.traversal, PathBuf::from("fd"));
        assert_eq!(complete.filter, PathBuf::from("fzf"));
        assert_eq!(ExecutableSet::from(complete), set);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Traversal.to_string(), "fd");
        assert_eq!(Role::Filter.to_string(), "fzf");
    }
}
