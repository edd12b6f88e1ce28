//! Host capabilities the fact cache depends on
//!
//! The cache never looks up global state on its own. Whether external fact
//! caching is switched on, and where cache files live, are both answered by a
//! [`FactsHost`] handed to the cache when it is built.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Queries the cache makes against its surrounding environment
pub trait FactsHost {
    /// Whether file-backed external fact caching is enabled at all
    fn external_facts_enabled(&self) -> bool;

    /// Candidate cache directories, most preferred first
    ///
    /// Only the first entry is used by the cache; ordering and any fallback
    /// search are the host's business.
    fn search_external_path(&self) -> Vec<PathBuf>;
}

impl<H: FactsHost + ?Sized> FactsHost for &H {
    fn external_facts_enabled(&self) -> bool {
        (**self).external_facts_enabled()
    }

    fn search_external_path(&self) -> Vec<PathBuf> {
        (**self).search_external_path()
    }
}

/// A host with a fixed feature flag and directory list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticHost {
    enabled: bool,
    dirs: Vec<PathBuf>,
}

impl StaticHost {
    /// Creates an enabled host searching the given directories
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self {
            enabled: true,
            dirs,
        }
    }

    /// Creates a host rooted at the per-user cache directory
    ///
    /// Uses `~/.cache/factcache/` on Linux, or the equivalent platform path.
    /// Returns `None` if no home directory can be determined.
    pub fn user_cache() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "factcache")?;
        Some(Self::new(vec![project_dirs.cache_dir().to_path_buf()]))
    }

    /// Sets the external facts feature flag
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl FactsHost for StaticHost {
    fn external_facts_enabled(&self) -> bool {
        self.enabled
    }

    fn search_external_path(&self) -> Vec<PathBuf> {
        self.dirs.clone()
    }
}
