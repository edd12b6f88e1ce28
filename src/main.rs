//! factcache - inspect and populate the fact cache from the command line
//!
//! `get` prints a fresh entry or exits with status 1 on a miss, `put` stores
//! a value, and `path` shows where a fact's entry lives.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use factcache::cli::{Cli, Command, RunConfig};
use factcache::FactCache;

/// Installs a stderr logger filtered by `RUST_LOG` (default `warn`)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = RunConfig::from_cli(&cli)?;
    let cache = FactCache::with_config(config.host, config.cache);

    match cli.command {
        Command::Get { name } => match cache.cached(&name) {
            Some(mapping) => {
                print!("{}", serde_yaml::to_string(&mapping)?);
                Ok(ExitCode::SUCCESS)
            }
            None => {
                eprintln!("No fresh cache entry for '{}'", name);
                Ok(ExitCode::FAILURE)
            }
        },
        Command::Put { name, value } => {
            cache.cache(Some(&name), Some(&value))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Path { name } => match cache.entry_path(&name) {
            Some(path) => {
                println!("{}", path.display());
                Ok(ExitCode::SUCCESS)
            }
            None => {
                eprintln!("No cache directory configured");
                Ok(ExitCode::FAILURE)
            }
        },
    }
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
