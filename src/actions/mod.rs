//! Execution of item actions
//!
//! Normally the host carries out the action attached to an activated item.
//! The standalone CLI and the `item_activated` protocol event run them here
//! instead, through the [`ActionRunner`] seam so tests never touch the
//! desktop or the clipboard.

pub mod error;

pub use error::ActionError;

use crate::results::Action;
use std::path::Path;

/// Performs the side effects behind an [`Action`]
pub trait ActionRunner {
    /// Open `path` with the default handler
    ///
    /// # Errors
    /// Returns `ActionError` if the handler cannot be launched.
    fn open(&self, path: &Path) -> Result<(), ActionError>;

    /// Replace the clipboard contents with `text`
    ///
    /// # Errors
    /// Returns `ActionError::Clipboard` if the clipboard is unavailable.
    fn copy(&self, text: &str) -> Result<(), ActionError>;
}

/// Desktop implementation using `open` and `arboard`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemActions;

impl ActionRunner for SystemActions {
    fn open(&self, path: &Path) -> Result<(), ActionError> {
        open::that(path).map_err(|source| ActionError::Open {
            path: path.display().to_string(),
            source,
        })
    }

    fn copy(&self, text: &str) -> Result<(), ActionError> {
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }
}

/// Run `action` with `runner`
///
/// # Errors
/// Returns `ActionError::EmptyPath` or `ActionError::MissingPath` for an open
/// action whose target is unusable, and any error raised by the runner.
pub fn execute_with(runner: &dyn ActionRunner, action: &Action) -> Result<(), ActionError> {
    match action {
        Action::Open { path } => {
            if path.is_empty() {
                return Err(ActionError::EmptyPath);
            }
            let target = Path::new(path);
            if !target.exists() {
                return Err(ActionError::MissingPath(path.clone()));
            }
            tracing::debug!(path = %target.display(), "Opening path");
            runner.open(target)
        }
        Action::CopyToClipboard { text } => {
            tracing::debug!(text, "Copying to clipboard");
            runner.copy(text)
        }
        Action::DoNothing => Ok(()),
    }
}

/// Run `action` against the desktop
///
/// # Errors
/// See [`execute_with`].
pub fn execute(action: &Action) -> Result<(), ActionError> {
    execute_with(&SystemActions, action)
}

#[cfg(test)]
pub mod recording {
    //! An [`ActionRunner`] that records calls instead of performing them

    use super::{ActionError, ActionRunner};
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Open(PathBuf),
        Copy(String),
    }

    #[derive(Debug, Default, Clone)]
    pub struct RecordingActions {
        pub calls: Arc<Mutex<Vec<Call>>>,
        pub fail_clipboard: bool,
    }

    impl RecordingActions {
        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ActionRunner for RecordingActions {
        fn open(&self, path: &Path) -> Result<(), ActionError> {
            self.calls.lock().unwrap().push(Call::Open(path.to_path_buf()));
            Ok(())
        }

        fn copy(&self, text: &str) -> Result<(), ActionError> {
            if self.fail_clipboard {
                return Err(ActionError::Clipboard("no clipboard".to_string()));
            }
            self.calls.lock().unwrap().push(Call::Copy(text.to_string()));
            Ok(())
        }
    }
}
