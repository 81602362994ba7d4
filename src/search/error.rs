//! Search strategy error types

use thiserror::Error;

use crate::params::SpaceError;

/// Errors raised while proposing candidates
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Empty search space")]
    EmptySpace,

    #[error("{strategy} search cannot handle continuous parameter {parameter}")]
    UnsupportedDomain { strategy: &'static str, parameter: String },

    #[error("Invalid search space: {0}")]
    Space(#[from] SpaceError),

    #[error("Surrogate model failed: {0}")]
    Numerical(String),
}

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;
