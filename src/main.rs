//! Interest Accrual CLI
//!
//! Reads a ledger of dated principals, projects monthly compound interest up
//! to today and writes every period-end balance.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- config.json
//! ```
//!
//! The config path defaults to `config.json`. Input or output file names
//! missing from the config are asked for interactively.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `info` or `debug` to control logging verbosity

use interest_accrual::{run, Result, RuntimeConfig, DEFAULT_CONFIG_FILE};
use std::env;
use std::path::PathBuf;
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run_cli() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let mut config = RuntimeConfig::load(&config_path)?;
    config.prompt_missing_paths()?;

    println!("{}", config);
    println!();

    let written = run(&config)?;
    println!("Results saved to file: {}", written.display());

    Ok(())
}
