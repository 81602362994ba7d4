//! YAML loading and emission

use std::fs;
use std::path::Path;

use super::schema::TuneConfig;
use super::validate::validate_config;
use crate::error::{Error, Result};

/// Parse and validate a config from YAML text
pub fn parse_config(yaml: &str) -> Result<TuneConfig> {
    let config: TuneConfig = if yaml.trim().is_empty() {
        TuneConfig::default()
    } else {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::Config(format!("Failed to parse YAML config: {e}")))?
    };
    validate_config(&config).map_err(|e| Error::Config(format!("Invalid config: {e}")))?;
    Ok(config)
}

/// Load a config file without starting a run
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<TuneConfig> {
    let yaml = fs::read_to_string(config_path.as_ref()).map_err(|e| {
        Error::Config(format!(
            "Failed to read config file {}: {}",
            config_path.as_ref().display(),
            e
        ))
    })?;
    parse_config(&yaml)
}

/// Default config rendered as YAML
pub fn default_config_yaml() -> Result<String> {
    Ok(serde_yaml::to_string(&TuneConfig::default())?)
}
