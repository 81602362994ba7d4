//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! afinar run
//! afinar run --config tune.yaml --strategy surrogate --n-calls 30
//! afinar run --listen-port 6003 --send-port 6005 --report run.json
//! afinar validate tune.yaml --detailed
//! afinar init --output tune.yaml
//! ```

mod core;

#[cfg(test)]
mod property_tests;
#[cfg(test)]
mod tests;

pub use core::{apply_overrides, parse_args, Cli, Command, InitArgs, RunArgs, ValidateArgs};
