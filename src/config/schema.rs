//! Tuning configuration schema
//!
//! Every section defaults, so an empty YAML document is a valid config that
//! listens on 5003, sends to 5005 on localhost and picks the strategy from
//! the declared space.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::search::{RandomConfig, StrategyKind, SurrogateConfig};
use crate::transport::RetryPolicy;

/// Complete tuning configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuneConfig {
    pub network: NetworkConfig,
    pub retry: RetryConfig,
    pub strategy: StrategyKind,
    pub random: RandomConfig,
    pub surrogate: SurrogateConfig,
    pub report: ReportConfig,
}

/// Peer addressing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Host for both the listener and the outbound connection
    pub host: String,
    /// Port the scorer connects to with scores
    pub listen_port: u16,
    /// Port the scorer listens on for candidates
    pub send_port: u16,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self { host: "localhost".to_string(), listen_port: 5003, send_port: 5005 }
    }
}

/// Socket retry settings, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub bind_backoff_ms: u64,
    pub read_backoff_ms: u64,
    /// Unbounded when absent
    pub max_bind_attempts: Option<usize>,
    /// Unbounded when absent
    pub max_idle_reads: Option<usize>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { bind_backoff_ms: 1000, read_backoff_ms: 500, max_bind_attempts: None, max_idle_reads: None }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            bind_backoff: Duration::from_millis(self.bind_backoff_ms),
            read_backoff: Duration::from_millis(self.read_backoff_ms),
            max_bind_attempts: self.max_bind_attempts.map(|n| n.max(1)),
            max_idle_reads: self.max_idle_reads,
        }
    }
}

/// Serialization format of the run report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Yaml,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(format!("Unknown report format: {s}. Valid formats: json, yaml")),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Where to write the final report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// No report is written when absent
    pub output: Option<PathBuf>,
    pub format: ReportFormat,
}
