//! Query orchestration
//!
//! [`Extension`] is the entry point for every host event. A query walks
//! through these stages, and any of them can end it early with a list of
//! inert items:
//!
//! 1. Resolve both executables, collecting one message per missing tool
//! 2. Validate preferences; these errors are reported together with the
//!    missing-tool messages
//! 3. Prompt for input when the query is empty
//! 4. Run the search pipeline, mapping "no match" and failures to messages
//! 5. Present the results
//!
//! Whatever happens, the caller receives a list of [`ResultItem`]s.

use crate::actions::{ActionError, ActionRunner, SystemActions, execute_with};
use crate::binaries::{BinaryCache, ExecutableLookup, ExecutableSet, PathLookup, get_binaries};
use crate::preferences::{Preferences, RawPreferences, get_preferences_with_home};
use crate::results::{self, Action, ERROR_ICON, ICON, ResultItem};
use crate::search;
use std::path::PathBuf;

/// Shown when the query is empty
pub const PROMPT_MESSAGE: &str = "Enter your search criteria.";
/// Shown when the filter matched nothing
pub const NO_RESULTS_MESSAGE: &str = "No results found.";
/// Shown for any unexpected pipeline failure
pub const FAILURE_MESSAGE: &str = "There was an error running this extension.";

/// Why a query stopped before presenting results
#[derive(Debug, Clone, PartialEq, Eq)]
enum Halt {
    /// Missing executables and invalid preferences
    Invalid(Vec<String>),
    AwaitingQuery,
    NoResults,
    Failed,
}

impl Halt {
    fn into_items(self) -> Vec<ResultItem> {
        match self {
            Self::Invalid(messages) => results::no_op_result_items(&messages, ERROR_ICON),
            Self::AwaitingQuery => vec![ResultItem::inert(PROMPT_MESSAGE, ICON)],
            Self::NoResults => vec![ResultItem::inert(NO_RESULTS_MESSAGE, ICON)],
            Self::Failed => vec![ResultItem::inert(FAILURE_MESSAGE, ERROR_ICON)],
        }
    }
}

/// The fuzzy finder as seen by a host
pub struct Extension {
    lookup: Box<dyn ExecutableLookup>,
    cache: Option<BinaryCache>,
    actions: Box<dyn ActionRunner>,
    preferences: RawPreferences,
    home: Option<PathBuf>,
}

impl Extension {
    /// Extension probing `PATH` on every query and acting on the desktop
    ///
    /// `preferences` are the base values; each query may override them.
    #[must_use]
    pub fn new(preferences: RawPreferences) -> Self {
        Self {
            lookup: Box::new(PathLookup),
            cache: None,
            actions: Box::new(SystemActions),
            preferences,
            home: dirs::home_dir(),
        }
    }

    /// Resolve executables through `lookup` instead of `PATH`
    #[must_use]
    pub fn with_lookup(mut self, lookup: impl ExecutableLookup + 'static) -> Self {
        self.lookup = Box::new(lookup);
        self
    }

    /// Run activated actions through `actions`
    #[must_use]
    pub fn with_actions(mut self, actions: impl ActionRunner + 'static) -> Self {
        self.actions = Box::new(actions);
        self
    }

    /// Memoize resolved executables until [`Extension::on_preferences_updated`]
    #[must_use]
    pub fn with_cache(mut self) -> Self {
        self.cache = Some(BinaryCache::new());
        self
    }

    /// Expand `~` in preferences against `home`
    #[must_use]
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    /// Base preferences, before per-query overrides
    #[must_use]
    pub const fn preferences(&self) -> &RawPreferences {
        &self.preferences
    }

    /// Handle a query event
    ///
    /// `overrides` take precedence over the base preferences for this query
    /// only.
    pub fn on_query(&mut self, argument: Option<&str>, overrides: &RawPreferences) -> Vec<ResultItem> {
        match self.run_query(argument, overrides) {
            Ok(items) => items,
            Err(halt) => {
                tracing::debug!(?halt, "Query ended early");
                halt.into_items()
            }
        }
    }

    /// Handle a preferences update from the host
    pub fn on_preferences_updated(&mut self, preferences: Option<RawPreferences>) {
        if let Some(preferences) = preferences {
            self.preferences = preferences;
        }
        if let Some(cache) = &mut self.cache {
            cache.invalidate();
        }
    }

    /// Carry out the action of an activated item
    ///
    /// # Errors
    /// Returns the `ActionError` raised while running the action.
    pub fn on_item_activated(&self, action: &Action) -> Result<(), ActionError> {
        execute_with(self.actions.as_ref(), action)
    }

    fn resolve_binaries(&mut self) -> (ExecutableSet, Vec<String>) {
        let lookup = self.lookup.as_ref();
        match &mut self.cache {
            Some(cache) => cache.get_binaries(lookup),
            None => get_binaries(lookup),
        }
    }

    fn load_preferences(&self, overrides: &RawPreferences) -> Result<Preferences, Vec<String>> {
        let mut raw = self.preferences.clone();
        raw.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));

        get_preferences_with_home(&raw, self.home.as_deref())
            .map_err(|errors| errors.iter().map(ToString::to_string).collect())
    }

    fn run_query(
        &mut self,
        argument: Option<&str>,
        overrides: &RawPreferences,
    ) -> Result<Vec<ResultItem>, Halt> {
        let (binaries, mut errors) = self.resolve_binaries();

        let preferences = match self.load_preferences(overrides) {
            Ok(preferences) => Some(preferences),
            Err(preference_errors) => {
                errors.extend(preference_errors);
                None
            }
        };

        let (Some(executables), Some(preferences)) = (binaries.complete(), preferences) else {
            return Err(Halt::Invalid(errors));
        };
        tracing::debug!(?executables, "Using binaries");
        tracing::debug!(?preferences, "Using user preferences");

        let Some(query) = argument.filter(|query| !query.is_empty()) else {
            return Err(Halt::AwaitingQuery);
        };

        let found = search::search(query, &preferences, &executables).map_err(|error| {
            if error.is_no_match(&executables.filter) {
                Halt::NoResults
            } else {
                tracing::error!(%error, "Search failed");
                Halt::Failed
            }
        })?;

        Ok(results::generate_result_items(&preferences, &found)
            .into_iter()
            .map(ResultItem::from)
            .collect())
    }
}
