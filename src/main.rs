//! Afinar CLI
//!
//! # Usage
//!
//! ```bash
//! # Wait for a scorer on the default ports (5003 in, 5005 out)
//! afinar run
//!
//! # Run from config with overrides
//! afinar run --config tune.yaml --strategy surrogate --n-calls 30 --report run.json
//!
//! # Validate config
//! afinar validate tune.yaml
//!
//! # Write a default config
//! afinar init --output tune.yaml
//! ```

use afinar::cli::{run_command, Cli};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
