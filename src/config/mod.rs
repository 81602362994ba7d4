//! Configuration: YAML schema, validation and command-line surface

pub mod cli;
pub mod loader;
pub mod schema;
pub mod validate;

pub use cli::{apply_overrides, parse_args, Cli, Command, InitArgs, RunArgs, ValidateArgs};
pub use loader::{default_config_yaml, load_config, parse_config};
pub use schema::{NetworkConfig, ReportConfig, ReportFormat, RetryConfig, TuneConfig};
pub use validate::{validate_config, ValidationError};
