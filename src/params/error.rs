//! Parameter space error types

use thiserror::Error;

/// Errors raised while declaring or validating a parameter space
#[derive(Debug, Error, PartialEq)]
pub enum SpaceError {
    #[error("Duplicate parameter: {0}")]
    DuplicateParameter(String),

    #[error("Parameter {0} has no choices")]
    EmptyDomain(String),

    #[error("Parameter {0} has invalid bounds [{1}, {2}]")]
    InvalidBounds(String, f64, f64),

    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    #[error("Unexpected parameter: {0}")]
    UnexpectedParameter(String),

    #[error("Invalid parameter value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Result type for space operations
pub type Result<T> = std::result::Result<T, SpaceError>;
