//! Init command implementation

use std::fs;

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{default_config_yaml, InitArgs};

pub fn run_init(args: InitArgs, level: LogLevel) -> Result<(), String> {
    let yaml = default_config_yaml().map_err(|e| format!("Failed to render config: {e}"))?;

    let Some(path) = args.output else {
        print!("{yaml}");
        return Ok(());
    };

    if path.exists() && !args.force {
        return Err(format!("{} already exists (use --force to overwrite)", path.display()));
    }
    fs::write(&path, yaml).map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
    log(level, LogLevel::Normal, &format!("Wrote default config to {}", path.display()));
    Ok(())
}
