//! Command-line interface parsing for factcache
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into the host and cache configuration the binary runs with.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::cache::CacheConfig;
use crate::fact::{is_valid_fact_name, FactValue, FactValueError};
use crate::host::StaticHost;

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// The value given to `put` is not a storable YAML value
    #[error("Invalid value: {0}")]
    InvalidValue(#[from] FactValueError),
    /// The fact name cannot be used as a cache file name
    #[error("Invalid fact name: '{0}'")]
    InvalidName(String),
    /// No `--dir` was given and no per-user cache directory exists
    #[error("No cache directory: pass --dir or set a home directory")]
    NoCacheDirectory,
}

/// factcache - a time-bounded, file-backed cache for facts
#[derive(Parser, Debug)]
#[command(name = "factcache")]
#[command(about = "Read and write cached facts")]
#[command(version)]
pub struct Cli {
    /// Cache directory; may be repeated, only the first is used
    #[arg(long = "dir", value_name = "DIR", global = true)]
    pub dirs: Vec<PathBuf>,

    /// Freshness window in seconds (default: 3600)
    #[arg(long, value_name = "SECONDS", global = true)]
    pub ttl: Option<u64>,

    /// Behave as if external facts were disabled
    #[arg(long, global = true)]
    pub disabled: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a fact's cached mapping if the entry is still fresh
    Get {
        #[arg(value_parser = parse_name_arg)]
        name: String,
    },
    /// Store a fact value, given as YAML
    ///
    /// Examples:
    ///   factcache put os_family Debian
    ///   factcache put interfaces '[eth0, lo]'
    ///   factcache put os '{family: Debian, release: "12"}'
    Put {
        #[arg(value_parser = parse_name_arg)]
        name: String,
        #[arg(value_parser = parse_value_arg)]
        value: FactValue,
    },
    /// Print the cache entry path for a fact
    Path {
        #[arg(value_parser = parse_name_arg)]
        name: String,
    },
}

/// Parses a fact name argument, rejecting names that are not file-safe
pub fn parse_name_arg(s: &str) -> Result<String, CliError> {
    if is_valid_fact_name(s) {
        Ok(s.to_string())
    } else {
        Err(CliError::InvalidName(s.to_string()))
    }
}

/// Parses a YAML value argument into a fact value
pub fn parse_value_arg(s: &str) -> Result<FactValue, CliError> {
    Ok(FactValue::from_yaml_str(s)?)
}

/// Host and cache settings derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub host: StaticHost,
    pub cache: CacheConfig,
}

impl RunConfig {
    /// Creates a RunConfig from parsed CLI arguments.
    ///
    /// Without `--dir`, the per-user cache directory is used.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let host = if cli.dirs.is_empty() {
            StaticHost::user_cache().ok_or(CliError::NoCacheDirectory)?
        } else {
            StaticHost::new(cli.dirs.clone())
        };

        let mut cache = CacheConfig::default();
        if let Some(secs) = cli.ttl {
            cache = cache.with_ttl(Duration::from_secs(secs));
        }

        Ok(RunConfig {
            host: host.enabled(!cli.disabled),
            cache,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FactsHost;

    #[test]
    fn test_parse_value_arg_scalar() {
        assert_eq!(
            parse_value_arg("tested").unwrap(),
            FactValue::String("tested".into())
        );
        assert_eq!(parse_value_arg("7").unwrap(), FactValue::Integer(7));
    }

    #[test]
    fn test_parse_value_arg_sequence() {
        assert_eq!(
            parse_value_arg("[thing1, thing2]").unwrap(),
            FactValue::from(vec!["thing1", "thing2"])
        );
    }

    #[test]
    fn test_parse_value_arg_null_is_invalid() {
        let err = parse_value_arg("~").unwrap_err();
        assert!(err.to_string().contains("Invalid value"));
    }

    #[test]
    fn test_parse_name_arg() {
        assert_eq!(parse_name_arg("os_family").unwrap(), "os_family");
        let err = parse_name_arg("../x").unwrap_err();
        assert!(err.to_string().contains("Invalid fact name"));
    }

    #[test]
    fn test_cli_parse_get() {
        let cli = Cli::parse_from(["factcache", "--dir", "/tmp", "get", "single"]);
        assert_eq!(cli.dirs, vec![PathBuf::from("/tmp")]);
        assert!(matches!(cli.command, Command::Get { ref name } if name == "single"));
    }

    #[test]
    fn test_cli_parse_put() {
        let cli = Cli::parse_from(["factcache", "put", "list_value", "[a, b]", "--dir", "/tmp"]);
        match cli.command {
            Command::Put { name, value } => {
                assert_eq!(name, "list_value");
                assert_eq!(value, FactValue::from(vec!["a", "b"]));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_invalid_name() {
        let result = Cli::try_parse_from(["factcache", "get", "a/b"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_config_from_cli() {
        let cli = Cli::parse_from([
            "factcache", "--dir", "/a", "--dir", "/b", "--ttl", "60", "--disabled", "get", "x",
        ]);
        let config = RunConfig::from_cli(&cli).unwrap();
        assert_eq!(
            config.host.search_external_path(),
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
        assert!(!config.host.external_facts_enabled());
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_run_config_defaults() {
        let cli = Cli::parse_from(["factcache", "--dir", "/a", "get", "x"]);
        let config = RunConfig::from_cli(&cli).unwrap();
        assert!(config.host.external_facts_enabled());
        assert_eq!(config.cache, CacheConfig::default());
    }
}
