//! Fact cache library
//!
//! This module exposes the cache, fact and host modules, plus the CLI for use
//! in integration tests.

pub mod cache;
pub mod cli;
pub mod fact;
pub mod host;

pub use cache::{CacheConfig, CacheError, FactCache};
pub use fact::{FactMapping, FactValue};
pub use host::{FactsHost, StaticHost};
