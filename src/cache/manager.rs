//! File-backed fact cache
//!
//! Provides a `FactCache` that stores one YAML file per fact and treats any
//! entry older than its TTL as cold, so callers recompute the fact.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;

use super::error::{CacheError, ParseError};
use crate::fact::{is_valid_fact_name, mapping_from_yaml, FactMapping, FactValue};
use crate::host::FactsHost;

/// Default freshness window for cache entries
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Default cache file extension
pub const DEFAULT_EXTENSION: &str = "yaml";

/// Tunables for a [`FactCache`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long an entry stays hot after its last write
    pub ttl: Duration,
    /// File extension appended to the fact name
    pub extension: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl CacheConfig {
    /// Sets how long entries stay hot
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets the cache file extension (without the leading dot)
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

/// Reads and writes cached facts in the host's first cache directory
///
/// Each fact lives in `<dir>/<name>.<extension>` as a single YAML document
/// `{ name: value }`. Missing, stale and corrupt entries all read back as
/// `None`; only writes report errors.
#[derive(Debug, Clone)]
pub struct FactCache<H> {
    host: H,
    config: CacheConfig,
}

impl<H: FactsHost> FactCache<H> {
    /// Creates a cache with the default configuration
    pub fn new(host: H) -> Self {
        Self::with_config(host, CacheConfig::default())
    }

    /// Creates a cache with a custom configuration
    ///
    /// Useful for testing or when a different TTL or extension is needed.
    pub fn with_config(host: H, config: CacheConfig) -> Self {
        Self { host, config }
    }

    /// Returns the entry path for a fact, if the host offers a directory
    pub fn entry_path(&self, name: &str) -> Option<PathBuf> {
        let dir = self.host.search_external_path().into_iter().next()?;
        Some(dir.join(self.file_name(name)))
    }

    fn file_name(&self, name: &str) -> String {
        format!("{}.{}", name, self.config.extension)
    }

    /// Looks up a hot cache entry using the configured TTL
    ///
    /// Returns the entry's mapping exactly as stored, keyed by whatever the
    /// document contains rather than by `name`.
    pub fn cached(&self, name: &str) -> Option<FactMapping> {
        self.cached_for(name, self.config.ttl)
    }

    /// Looks up a cache entry that is younger than `ttl`
    pub fn cached_for(&self, name: &str, ttl: Duration) -> Option<FactMapping> {
        if !is_valid_fact_name(name) {
            tracing::debug!(fact = name, "invalid fact name, skipping cache lookup");
            return None;
        }
        if !self.host.external_facts_enabled() {
            tracing::debug!(fact = name, "external facts disabled, skipping cache lookup");
            return None;
        }
        let Some(path) = self.entry_path(name) else {
            tracing::debug!(fact = name, "no cache directory, skipping cache lookup");
            return None;
        };

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::debug!(fact = name, path = %path.display(), "cache miss: {e}");
                return None;
            }
        };
        let modified: DateTime<Utc> = match metadata.modified() {
            Ok(time) => time.into(),
            Err(e) => {
                tracing::debug!(fact = name, path = %path.display(), "no mtime for cache entry: {e}");
                return None;
            }
        };
        if !is_fresh(modified, Utc::now(), ttl) {
            tracing::debug!(fact = name, path = %path.display(), %modified, "cache entry is stale");
            return None;
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(fact = name, path = %path.display(), "unreadable cache entry: {e}");
                return None;
            }
        };
        match parse_entry(&content) {
            Ok(mapping) => {
                tracing::debug!(fact = name, path = %path.display(), "cache hit");
                Some(mapping)
            }
            Err(e) => {
                tracing::debug!(fact = name, path = %path.display(), "corrupt cache entry: {e}");
                None
            }
        }
    }

    /// Looks up the value stored under `name` in a hot cache entry
    pub fn cached_value(&self, name: &str) -> Option<FactValue> {
        self.cached(name)?.shift_remove(name)
    }

    /// Stores `{ name: value }` as the fact's cache entry
    ///
    /// A missing name or value is a no-op that touches neither the host nor
    /// the filesystem, as is an invalid name. With external facts disabled
    /// nothing is written either.
    ///
    /// # Errors
    /// Returns `Err` if the host offers no directory, the first directory does
    /// not exist, or the entry cannot be written.
    pub fn cache(&self, name: Option<&str>, value: Option<&FactValue>) -> Result<(), CacheError> {
        let (Some(name), Some(value)) = (name, value) else {
            return Ok(());
        };
        if !is_valid_fact_name(name) {
            tracing::debug!(fact = name, "invalid fact name, not caching");
            return Ok(());
        }
        if !self.host.external_facts_enabled() {
            tracing::debug!(fact = name, "external facts disabled, not caching");
            return Ok(());
        }

        let dir = self
            .host
            .search_external_path()
            .into_iter()
            .next()
            .ok_or(CacheError::NoCacheDirectory)?;
        if !dir.is_dir() {
            return Err(CacheError::DirectoryMissing(dir));
        }

        let path = dir.join(self.file_name(name));
        let io_err = |source: std::io::Error| CacheError::Io {
            path: path.clone(),
            source,
        };
        let file = File::create(&path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);

        let entry: IndexMap<&str, &FactValue> = IndexMap::from([(name, value)]);
        serde_yaml::to_writer(&mut writer, &entry)?;
        writer.flush().map_err(io_err)?;

        tracing::debug!(fact = name, path = %path.display(), "cached fact");
        Ok(())
    }
}

/// Parses the content of a cache entry.
///
/// The content is read as a YAML stream and the first document must be a
/// string-keyed mapping of fact values.
pub fn parse_entry(content: &str) -> Result<FactMapping, ParseError> {
    let document = serde_yaml::Deserializer::from_str(content)
        .next()
        .ok_or(ParseError::Empty)?;
    let value = Value::deserialize(document)?;
    Ok(mapping_from_yaml(value)?)
}

/// An entry is hot while its age is strictly below `ttl`
fn is_fresh(modified: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
    now - modified < ttl
}
