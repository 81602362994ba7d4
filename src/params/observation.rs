//! Completed evaluations

use serde::{Deserialize, Serialize};

use super::space::ParameterAssignment;

/// An evaluated candidate and the score the peer returned for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Candidate that was sent to the scorer
    pub assignment: ParameterAssignment,
    /// Score returned by the scorer (higher is better)
    pub score: f64,
}

impl Observation {
    pub fn new(assignment: ParameterAssignment, score: f64) -> Self {
        Self { assignment, score }
    }
}

/// Highest-scoring observation in a history, earliest wins ties
pub fn best_observation(history: &[Observation]) -> Option<&Observation> {
    history.iter().filter(|o| !o.score.is_nan()).fold(None, |best, obs| match best {
        Some(b) if b.score >= obs.score => Some(b),
        _ => Some(obs),
    })
}
