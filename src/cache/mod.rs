//! Cache module for persisting computed facts to disk
//!
//! This module provides a fact cache that stores each fact as a YAML file and
//! serves it back only while the file is younger than a configurable TTL.
//! Missing, expired and corrupt entries are all reported the same way, as a
//! miss, so the caller simply recomputes the fact.

mod error;
mod manager;

pub use error::{CacheError, ParseError};
pub use manager::{parse_entry, CacheConfig, FactCache, DEFAULT_EXTENSION, DEFAULT_TTL};
