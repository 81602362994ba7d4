//! Random search that stops once a score clears a threshold

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::params::{Observation, ParameterDomain, ParameterSpace};

use super::error::{Result, SearchError};
use super::{Proposal, SearchStrategy};

/// Random-threshold settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomConfig {
    /// Stop as soon as a score is strictly greater than this
    pub threshold: f64,
    /// Optional cap on proposals
    pub max_iterations: Option<usize>,
    /// Seed for reproducible draws; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self { threshold: -0.8, max_iterations: None, seed: None }
    }
}

/// Uniform random draws over a categorical space
#[derive(Debug, Clone)]
pub struct RandomThreshold {
    config: RandomConfig,
    rng: StdRng,
    initial_score: Option<f64>,
    proposed: usize,
}

impl RandomThreshold {
    pub fn new(config: RandomConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { config, rng, initial_score: None, proposed: 0 }
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    fn threshold_reached(&self, history: &[Observation]) -> Option<f64> {
        self.initial_score
            .into_iter()
            .chain(history.iter().map(|o| o.score))
            .find(|score| *score > self.config.threshold)
    }
}

impl SearchStrategy for RandomThreshold {
    fn name(&self) -> &'static str {
        "random"
    }

    fn observe_initial(&mut self, score: f64) {
        self.initial_score = Some(score);
    }

    fn planned_iterations(&self, _space: &ParameterSpace) -> Option<usize> {
        self.config.max_iterations
    }

    fn propose(&mut self, space: &ParameterSpace, history: &[Observation]) -> Result<Proposal> {
        if space.is_empty() {
            return Err(SearchError::EmptySpace);
        }
        if let Some((name, _)) =
            space.iter().find(|(_, d)| matches!(d, ParameterDomain::Continuous { .. }))
        {
            return Err(SearchError::UnsupportedDomain { strategy: "random", parameter: name.clone() });
        }

        if let Some(score) = self.threshold_reached(history) {
            info!(score, threshold = self.config.threshold, "Score above threshold, stopping");
            return Ok(Proposal::Done);
        }
        if self.config.max_iterations.is_some_and(|max| self.proposed >= max) {
            info!(proposed = self.proposed, "Random search budget exhausted");
            return Ok(Proposal::Done);
        }

        self.proposed += 1;
        Ok(Proposal::Candidate(space.sample_random(&mut self.rng)))
    }
}
