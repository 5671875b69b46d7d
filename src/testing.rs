//! Testing utilities for fuzzy-finder
//!
//! This module provides helpers for tests that need stand-in executables:
//! small shell scripts that impersonate `fd` and `fzf`, plus a lock that
//! serializes every test spawning them.
//!
//! Only available when compiled with `cfg(test)`.

use crate::binaries::{ExecutableLookup, LookupError};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

static PROCESS_LOCK: Mutex<()> = Mutex::new(());

/// Serialize tests that write and then execute scripts
///
/// Writing an executable while another thread forks can leave the file
/// descriptor open in the child, making `exec` of that file fail with
/// `ETXTBSY`. Holding this guard for the whole test avoids the race.
pub fn process_lock() -> MutexGuard<'static, ()> {
    PROCESS_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Write an executable shell script named `name` into `dir`
///
/// # Panics
/// Panics if the script cannot be written or made executable.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, body).expect("Failed to write test script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make test script executable");
    path
}

/// Write a plain file with `content`, creating parent directories
///
/// # Panics
/// Panics if the file cannot be written.
pub fn write_file(path: impl AsRef<Path>, content: &str) -> PathBuf {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(path, content).expect("Failed to write test file");
    path.to_path_buf()
}

/// Executable lookup answering from a fixed table instead of `PATH`
#[derive(Debug, Default, Clone)]
pub struct StaticLookup {
    found: HashMap<String, PathBuf>,
}

impl StaticLookup {
    /// Make `name` resolve to `path`
    #[must_use]
    pub fn with(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.found.insert(name.to_string(), path.into());
        self
    }
}

impl ExecutableLookup for StaticLookup {
    fn find(&self, name: &str) -> Result<PathBuf, LookupError> {
        self.found
            .get(name)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    #[cfg(unix)]
    fn test_write_script_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let _guard = process_lock();
        let dir = TempDir::new().unwrap();
        let script = write_script(dir.path(), "fd", "#!/bin/sh\necho hi\n");

        let mode = fs::metadata(&script).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);

        let output = std::process::Command::new(&script).output().unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout), "hi\n");
    }

    #[test]
    fn test_write_file_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path().join("a/b/c.txt"), "content");
        assert_eq!(fs::read_to_string(path).unwrap(), "content");
    }

    #[test]
    fn test_static_lookup() {
        let lookup = StaticLookup::default().with("fzf", "/opt/fzf");
        assert_eq!(lookup.find("fzf").unwrap(), PathBuf::from("/opt/fzf"));
        assert!(matches!(lookup.find("fd"), Err(LookupError::NotFound(_))));
    }
}
