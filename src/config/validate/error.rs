//! Validation error types

/// Validation error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Host cannot be empty")]
    EmptyHost,

    #[error("Listen and send ports must differ (both {0})")]
    PortCollision(u16),

    #[error("Invalid {0}: 0 (must be > 0)")]
    ZeroBackoff(&'static str),

    #[error("Invalid surrogate n_calls: 0 (must be > 0)")]
    ZeroCalls,

    #[error("Invalid surrogate n_initial_points: {initial} (must be <= n_calls {calls})")]
    TooManyInitialPoints { initial: usize, calls: usize },

    #[error("Invalid surrogate n_candidates: 0 (must be > 0)")]
    ZeroCandidates,

    #[error("Invalid random threshold: {0} (must be finite)")]
    NonFiniteThreshold(f64),
}
