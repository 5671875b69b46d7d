//! Memoized executable resolution for long-running hosts

use super::{ExecutableLookup, ExecutableSet, Executables, get_binaries};

/// Remembers a complete set of executables until explicitly invalidated
///
/// Only a complete resolution is cached. While a dependency is missing every
/// call probes again, so installing it is noticed on the next query. Once
/// cached, changes to `PATH` are only picked up after [`BinaryCache::invalidate`],
/// which the host triggers when preferences change.
#[derive(Debug, Default, Clone)]
pub struct BinaryCache {
    cached: Option<Executables>,
}

impl BinaryCache {
    /// Create an empty cache
    #[must_use]
    pub const fn new() -> Self {
        Self { cached: None }
    }

    /// Return the cached executables or resolve them through `lookup`
    pub fn get_binaries(&mut self, lookup: &dyn ExecutableLookup) -> (ExecutableSet, Vec<String>) {
        if let Some(cached) = &self.cached {
            return (ExecutableSet::from(cached.clone()), Vec::new());
        }

        let (set, errors) = get_binaries(lookup);
        self.cached = set.complete();
        (set, errors)
    }

    /// Forget the cached executables
    pub fn invalidate(&mut self) {
        if self.cached.take().is_some() {
            tracing::debug!("Executable cache invalidated");
        }
    }

    /// Whether a resolution is currently cached
    #[must_use]
    pub const fn is_cached(&self) -> bool {
        self.cached.is_some()
    }
}
