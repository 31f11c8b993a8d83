//! Registration of source directories.

use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::store::ConfigStore;

/// Config section holding the source directory list.
pub const SECTION: &str = "General";

/// Key holding the number of registered paths.
pub const COUNT_KEY: &str = "GCMPathes";

/// Prefix of the indexed path keys: `GCMPath0`, `GCMPath1`, ...
pub const PATH_KEY_PREFIX: &str = "GCMPath";

/// Largest count accepted. Anything above it is treated as malformed.
pub const MAX_PATHS: usize = 1 << 16;

fn path_key(index: usize) -> String {
    format!("{PATH_KEY_PREFIX}{index}")
}

/// The list of known source directories inside a [`ConfigStore`].
///
/// Only ever reads and appends; existing entries are never rewritten.
#[derive(Debug)]
pub struct PathRegistry<S> {
    store: S,
}

impl<S: ConfigStore> PathRegistry<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Number of registered paths. A missing, malformed, negative or
    /// implausibly large (over [`MAX_PATHS`]) count reads as zero.
    pub fn count(&self) -> usize {
        let raw = self.store.get_int(SECTION, COUNT_KEY, 0);
        match usize::try_from(raw) {
            Ok(count) if count <= MAX_PATHS => count,
            Ok(_) => {
                warn!(count = raw, max = MAX_PATHS, "path count out of range, ignoring");
                0
            }
            Err(_) => 0,
        }
    }

    /// All registered paths, in registration order.
    pub fn paths(&self) -> Vec<String> {
        (0..self.count())
            .map(|i| self.store.get_string(SECTION, &path_key(i), ""))
            .collect()
    }

    /// Whether `path` matches any registered path exactly (case-sensitive).
    ///
    /// Every index is examined; a mismatch at one index says nothing about
    /// the others.
    pub fn contains(&self, path: &str) -> bool {
        (0..self.count()).any(|i| self.store.get_string(SECTION, &path_key(i), "") == path)
    }

    /// Appends `path` unless it is already registered.
    ///
    /// Returns `Ok(true)` when a new entry was written (path at index
    /// `count`, then `count + 1`) and `Ok(false)` when the path was already
    /// known, in which case the store is not touched. Write failures of the
    /// store surface as errors, as does a registry already holding
    /// [`MAX_PATHS`] entries.
    pub fn register_if_absent(&mut self, path: &str) -> Result<bool, StoreError> {
        if self.contains(path) {
            debug!(path, "source directory already registered");
            return Ok(false);
        }

        let count = self.count();
        let next = count
            .checked_add(1)
            .filter(|&n| n <= MAX_PATHS)
            .and_then(|n| i64::try_from(n).ok())
            .ok_or_else(|| StoreError::InvalidValue {
                key: COUNT_KEY.to_string(),
                reason: "source directory limit reached",
            })?;
        self.store.set_string(SECTION, &path_key(count), path)?;
        self.store.set_int(SECTION, COUNT_KEY, next)?;

        info!(path, index = count, "registered source directory");
        Ok(true)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}
