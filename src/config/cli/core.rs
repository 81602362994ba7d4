//! Core CLI types - Cli, Command, and argument structs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::schema::{ReportFormat, TuneConfig};
use crate::search::StrategyKind;

/// Afinar: parameter tuning against an external scorer
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "afinar")]
#[command(version)]
#[command(about = "Propose parameter candidates to a scoring peer over line-delimited JSON sockets")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Wait for a scorer and run a tuning session
    Run(RunArgs),

    /// Validate a configuration file without connecting
    Validate(ValidateArgs),

    /// Write a default configuration file
    Init(InitArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug, Clone, Default, PartialEq)]
pub struct RunArgs {
    /// Path to YAML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Override peer host
    #[arg(long)]
    pub host: Option<String>,

    /// Override the port scores arrive on
    #[arg(long)]
    pub listen_port: Option<u16>,

    /// Override the port candidates are sent to
    #[arg(long)]
    pub send_port: Option<u16>,

    /// Search strategy (auto, exhaustive, random, surrogate)
    #[arg(short, long)]
    pub strategy: Option<StrategyKind>,

    /// Random search stopping threshold
    #[arg(long, allow_hyphen_values = true)]
    pub threshold: Option<f64>,

    /// Surrogate evaluation budget
    #[arg(long)]
    pub n_calls: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the run report to this file
    #[arg(short, long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Report format (json, yaml)
    #[arg(short, long)]
    pub format: Option<ReportFormat>,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Show detailed validation report
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for the init command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InitArgs {
    /// Output file (stdout when absent)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Apply command-line overrides to a TuneConfig
///
/// `--seed` seeds both the surrogate and random strategies.
pub fn apply_overrides(config: &mut TuneConfig, args: &RunArgs) {
    if let Some(host) = &args.host {
        config.network.host = host.clone();
    }
    if let Some(port) = args.listen_port {
        config.network.listen_port = port;
    }
    if let Some(port) = args.send_port {
        config.network.send_port = port;
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if let Some(threshold) = args.threshold {
        config.random.threshold = threshold;
    }
    if let Some(n_calls) = args.n_calls {
        config.surrogate.n_calls = n_calls;
        config.surrogate.n_initial_points = config.surrogate.n_initial_points.min(n_calls);
    }
    if let Some(seed) = args.seed {
        config.surrogate.seed = seed;
        config.random.seed = Some(seed);
    }
    if let Some(report) = &args.report {
        config.report.output = Some(report.clone());
    }
    if let Some(format) = args.format {
        config.report.format = format;
    }
}
