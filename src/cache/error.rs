use std::path::PathBuf;

use thiserror::Error;

use crate::fact::FactValueError;

/// Errors surfaced by [`FactCache::cache`](super::FactCache::cache)
///
/// Only the write path reports errors. Reads fold every irregularity into a
/// miss.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The host supplied no candidate cache directory
    #[error("no cache directory configured")]
    NoCacheDirectory,
    /// The first candidate cache directory does not exist
    #[error("cache directory does not exist: {}", .0.display())]
    DirectoryMissing(PathBuf),
    /// Creating or writing the entry file failed
    #[error("failed to write cache entry {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The value could not be rendered as YAML
    #[error("failed to serialize cache entry: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Reasons a cache entry's content is unusable
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file holds no YAML document
    #[error("cache entry is empty")]
    Empty,
    /// The content is not valid YAML
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The document is valid YAML but not a fact mapping
    #[error("unexpected document shape: {0}")]
    Shape(#[from] FactValueError),
}
