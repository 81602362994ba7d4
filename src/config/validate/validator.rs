//! Configuration validation logic

use super::error::ValidationError;
use crate::config::schema::TuneConfig;

/// Validate a tuning configuration
///
/// Checks:
/// - The peer address is usable
/// - Backoffs are non-zero
/// - Surrogate budgets are consistent
pub fn validate_config(config: &TuneConfig) -> Result<(), ValidationError> {
    let network = &config.network;
    if network.host.trim().is_empty() {
        return Err(ValidationError::EmptyHost);
    }
    if network.listen_port == network.send_port {
        return Err(ValidationError::PortCollision(network.listen_port));
    }

    if config.retry.bind_backoff_ms == 0 {
        return Err(ValidationError::ZeroBackoff("bind_backoff_ms"));
    }
    if config.retry.read_backoff_ms == 0 {
        return Err(ValidationError::ZeroBackoff("read_backoff_ms"));
    }

    let surrogate = &config.surrogate;
    if surrogate.n_calls == 0 {
        return Err(ValidationError::ZeroCalls);
    }
    if surrogate.n_initial_points > surrogate.n_calls {
        return Err(ValidationError::TooManyInitialPoints {
            initial: surrogate.n_initial_points,
            calls: surrogate.n_calls,
        });
    }
    if surrogate.n_candidates == 0 {
        return Err(ValidationError::ZeroCandidates);
    }

    if !config.random.threshold.is_finite() {
        return Err(ValidationError::NonFiniteThreshold(config.random.threshold));
    }

    Ok(())
}
