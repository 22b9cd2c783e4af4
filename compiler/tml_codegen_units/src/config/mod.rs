//! Partitioning configuration.

use std::num::NonZeroUsize;
use std::path::PathBuf;

/// How many units to aim for and where to cache their objects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionConfig {
    /// Upper bound on the number of units. Zero and one both mean
    /// monolithic codegen.
    pub requested_cgus: usize,
    /// Object cache directory. `None` disables caching.
    pub cache_dir: Option<PathBuf>,
}

impl Default for PartitionConfig {
    /// One unit per available core, no cache.
    fn default() -> Self {
        let cores = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
        Self::new(cores)
    }
}

impl PartitionConfig {
    #[must_use]
    pub fn new(requested_cgus: usize) -> Self {
        Self {
            requested_cgus,
            cache_dir: None,
        }
    }

    #[must_use]
    pub fn with_requested_cgus(mut self, requested_cgus: usize) -> Self {
        self.requested_cgus = requested_cgus;
        self
    }

    #[must_use]
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }
}

#[cfg(test)]
mod tests;
