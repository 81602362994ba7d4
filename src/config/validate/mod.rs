//! Configuration validation
//!
//! Rejects settings that would make a run misbehave before any socket opens.

mod error;
mod validator;

#[cfg(test)]
mod proptests;

pub use error::ValidationError;
pub use validator::validate_config;
