//! CLI command implementations

mod init;
mod run;
mod validate;


use crate::cli::{init_logging, LogLevel};
use crate::config::{Cli, Command};

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let log_level = LogLevel::from_flags(cli.verbose, cli.quiet);
    init_logging(log_level);

    match cli.command {
        Command::Run(args) => run::run_tune(args, log_level),
        Command::Validate(args) => validate::run_validate(args, log_level),
        Command::Init(args) => init::run_init(args, log_level),
    }
}
