//! Logging setup for CLI runs
//!
//! Filter priority, highest first:
//!
//! 1. `AFINAR_LOG` (directives, e.g. `afinar=debug,warn`)
//! 2. `RUST_LOG`
//! 3. `-v` → debug, `-q` → error, otherwise info

use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Project-specific filter variable
pub const LOG_ENV: &str = "AFINAR_LOG";

/// Log level for CLI output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Errors only
    Quiet,
    /// Progress and results
    Normal,
    /// Verbose output with additional details
    Verbose,
}

impl LogLevel {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
        }
    }
}

/// Print a message to stdout if the current level permits it
pub fn log(level: LogLevel, required: LogLevel, msg: &str) {
    if level != LogLevel::Quiet && (level == required || required == LogLevel::Normal) {
        println!("{msg}");
    }
}

/// Build the event filter from the environment and `level`
pub fn env_filter(level: LogLevel) -> EnvFilter {
    if let Some(filter) = std::env::var(LOG_ENV).ok().and_then(|d| EnvFilter::try_new(d).ok()) {
        return filter;
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(level.level().as_str())
}

/// Install the global subscriber writing to stderr
///
/// A second call is a no-op so tests and embedders can call it freely.
pub fn init_logging(level: LogLevel) {
    let fmt_layer =
        fmt::layer().with_writer(std::io::stderr).with_target(level == LogLevel::Verbose);
    let _ = tracing_subscriber::registry().with(env_filter(level)).with(fmt_layer).try_init();
}
