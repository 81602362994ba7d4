//! Crate-level error type

use thiserror::Error;

use crate::codec::CodecError;
use crate::params::SpaceError;
use crate::search::SearchError;
use crate::transport::TransportError;

/// Errors surfaced by a tuning run
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Protocol error: {0}")]
    Codec(#[from] CodecError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Parameter space error: {0}")]
    Space(#[from] SpaceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for afinar operations
pub type Result<T> = std::result::Result<T, Error>;
