//! Surrogate-guided search
//!
//! A Gaussian process is fit to every observation so far and the next
//! candidate maximizes Expected Improvement over the best observed score.
//! The first `n_initial_points` candidates are seeded random draws.

mod acquisition;
mod encoding;
mod gp;
mod maximize;


pub use acquisition::{erf, expected_improvement, normal_cdf, normal_pdf};
pub use encoding::SpaceEncoder;
pub use gp::{cholesky, GaussianProcess, Matern52, Regressor};
pub use maximize::{ascend, maximize, AscentOptions};

use ndarray::{Array1, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::params::{best_observation, Observation, ParameterSpace};

use super::error::{Result, SearchError};
use super::{Proposal, SearchStrategy};

/// Surrogate-guided settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurrogateConfig {
    /// Total proposals before signalling Done
    pub n_calls: usize,
    /// Random proposals before the first model fit
    pub n_initial_points: usize,
    pub seed: u64,
    /// Random points scored before local refinement
    pub n_candidates: usize,
    /// Best random points refined by local ascent
    pub n_restarts: usize,
}

impl Default for SurrogateConfig {
    fn default() -> Self {
        Self { n_calls: 60, n_initial_points: 10, seed: 42, n_candidates: 1000, n_restarts: 5 }
    }
}

/// Gaussian-process search with an Expected Improvement acquisition
#[derive(Debug, Clone)]
pub struct SurrogateGuided<R: Regressor = GaussianProcess> {
    config: SurrogateConfig,
    regressor: R,
    rng: StdRng,
    proposed: usize,
    ascent: AscentOptions,
}

impl SurrogateGuided<GaussianProcess> {
    pub fn new(config: SurrogateConfig) -> Self {
        Self::with_regressor(config, GaussianProcess::new())
    }
}

impl<R: Regressor> SurrogateGuided<R> {
    /// Use any regressor as the surrogate
    pub fn with_regressor(config: SurrogateConfig, regressor: R) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, regressor, rng, proposed: 0, ascent: AscentOptions::default() }
    }

    pub fn proposed(&self) -> usize {
        self.proposed
    }

    pub fn regressor(&self) -> &R {
        &self.regressor
    }

    /// Fit the surrogate and return the encoded point with maximal EI
    fn suggest_point(&mut self, encoder: &SpaceEncoder, history: &[Observation]) -> Result<Vec<f64>> {
        let x = encoder.encode_all(history.iter().map(|o| &o.assignment));
        let y: Array1<f64> = history.iter().map(|o| o.score).collect();
        self.regressor.fit(&x, &y)?;

        let incumbent = best_observation(history)
            .ok_or_else(|| SearchError::Numerical("no finite scores to model".to_string()))?;
        let f_best = incumbent.score;
        let incumbent_point = encoder.encode(&incumbent.assignment).to_vec();

        let regressor = &self.regressor;
        let acquisition = |p: &[f64]| {
            let snapped = encoder.snap(p);
            let (mean, std) = regressor.predict(ArrayView1::from(&snapped[..]));
            expected_improvement(mean, std, f_best)
        };

        let d = encoder.n_dims();
        let mut scored: Vec<(f64, Vec<f64>)> = (0..self.config.n_candidates)
            .map(|_| {
                let p: Vec<f64> = (0..d).map(|_| self.rng.random::<f64>()).collect();
                (acquisition(&p), p)
            })
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut starts = vec![incumbent_point];
        starts.extend(scored.into_iter().take(self.config.n_restarts).map(|(_, p)| p));

        let (point, ei) = maximize(&acquisition, &starts, self.ascent)
            .ok_or_else(|| SearchError::Numerical("no starting points".to_string()))?;
        debug!(ei, "Acquisition maximized");
        Ok(encoder.snap(&point))
    }
}

impl<R: Regressor> SearchStrategy for SurrogateGuided<R> {
    fn name(&self) -> &'static str {
        "surrogate"
    }

    fn planned_iterations(&self, _space: &ParameterSpace) -> Option<usize> {
        Some(self.config.n_calls)
    }

    fn propose(&mut self, space: &ParameterSpace, history: &[Observation]) -> Result<Proposal> {
        if space.is_empty() {
            return Err(SearchError::EmptySpace);
        }
        if self.proposed >= self.config.n_calls {
            return Ok(Proposal::Done);
        }

        let encoder = SpaceEncoder::new(space);
        let warm = history.len() >= self.config.n_initial_points.max(1)
            && best_observation(history).is_some();
        let candidate = if warm {
            let point = self.suggest_point(&encoder, history)?;
            encoder.decode(&point)
        } else {
            space.sample_random(&mut self.rng)
        };

        self.proposed += 1;
        Ok(Proposal::Candidate(candidate))
    }
}
