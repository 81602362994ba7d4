//! Wall-clock progress estimation for tuning runs
//!
//! Per-iteration durations are accumulated and the cumulative time curve is
//! extrapolated to the planned iteration count. With three or more points a
//! quadratic is fit by least squares; fewer points, or a fit that predicts a
//! total below the time already spent, fall back to the per-iteration average.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::warn;

/// Accumulates iteration durations and extrapolates total run time
#[derive(Debug, Clone)]
pub struct ProgressEstimator {
    durations: Vec<f64>,
    started: Instant,
}

impl Default for ProgressEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressEstimator {
    pub fn new() -> Self {
        Self { durations: Vec::new(), started: Instant::now() }
    }

    /// Seed from known durations in seconds
    pub fn from_durations(durations: impl IntoIterator<Item = f64>) -> Self {
        Self { durations: durations.into_iter().collect(), started: Instant::now() }
    }

    pub fn record(&mut self, duration: Duration) {
        self.durations.push(duration.as_secs_f64());
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    /// Sum of recorded durations
    pub fn recorded(&self) -> f64 {
        self.durations.iter().sum()
    }

    fn linear_total(&self, target: usize) -> f64 {
        if self.durations.is_empty() {
            return 0.0;
        }
        self.recorded() / self.durations.len() as f64 * target as f64
    }

    /// Predicted total seconds after `target` iterations
    pub fn estimate_total(&self, target: usize) -> f64 {
        let n = self.durations.len();
        if n < 3 {
            return self.linear_total(target);
        }

        let mut cumulative = 0.0;
        let points: Vec<(f64, f64)> = self
            .durations
            .iter()
            .enumerate()
            .map(|(i, d)| {
                cumulative += d;
                ((i + 1) as f64, cumulative)
            })
            .collect();

        let so_far = self.recorded();
        match fit_quadratic(&points) {
            Some([a, b, c]) => {
                let t = target as f64;
                let predicted = a * t * t + b * t + c;
                if predicted.is_finite() && predicted >= so_far {
                    predicted
                } else {
                    warn!(predicted, so_far, "Quadratic time fit below elapsed time, using average");
                    self.linear_total(target)
                }
            }
            None => {
                warn!(points = n, "Quadratic time fit is singular, using average");
                self.linear_total(target)
            }
        }
    }

    /// Snapshot using the wall clock since construction
    pub fn report(&self, iteration: usize, target: Option<usize>) -> ProgressReport {
        self.report_at(iteration, target, self.started.elapsed().as_secs_f64())
    }

    /// Snapshot with an explicit elapsed time
    pub fn report_at(&self, iteration: usize, target: Option<usize>, elapsed: f64) -> ProgressReport {
        let predicted_total = target.map(|t| self.estimate_total(t));
        ProgressReport {
            iteration,
            target,
            elapsed_secs: elapsed,
            predicted_total_secs: predicted_total,
            remaining_secs: predicted_total.map(|p| (p - elapsed).max(0.0)),
        }
    }
}

/// Least-squares `y = a x² + b x + c` via the normal equations
fn fit_quadratic(points: &[(f64, f64)]) -> Option<[f64; 3]> {
    // Power sums Σx^k for k = 0..4 and Σx^k y for k = 0..2
    let mut sx = [0.0f64; 5];
    let mut sxy = [0.0f64; 3];
    for &(x, y) in points {
        let mut p = 1.0;
        for (k, s) in sx.iter_mut().enumerate() {
            *s += p;
            if k < 3 {
                sxy[k] += p * y;
            }
            p *= x;
        }
    }

    let mut m = [
        [sx[4], sx[3], sx[2], sxy[2]],
        [sx[3], sx[2], sx[1], sxy[1]],
        [sx[2], sx[1], sx[0], sxy[0]],
    ];
    solve3(&mut m)
}

/// Gaussian elimination with partial pivoting on an augmented 3×4 system
fn solve3(m: &mut [[f64; 4]; 3]) -> Option<[f64; 3]> {
    for col in 0..3 {
        let pivot = (col..3).max_by(|&a, &b| m[a][col].abs().total_cmp(&m[b][col].abs()))?;
        if m[pivot][col].abs() < 1e-12 {
            return None;
        }
        m.swap(col, pivot);
        for row in (col + 1)..3 {
            let factor = m[row][col] / m[col][col];
            for k in col..4 {
                m[row][k] -= factor * m[col][k];
            }
        }
    }

    let mut out = [0.0; 3];
    for row in (0..3).rev() {
        let tail: f64 = ((row + 1)..3).map(|k| m[row][k] * out[k]).sum();
        out[row] = (m[row][3] - tail) / m[row][row];
    }
    out.iter().all(|v| v.is_finite()).then_some(out)
}

/// Format seconds as `"{h}h {m}m {s:.2}s"`
pub fn format_hms(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let hours = (seconds / 3600.0).floor();
    let minutes = ((seconds % 3600.0) / 60.0).floor();
    let secs = seconds % 60.0;
    format!("{hours:.0}h {minutes:.0}m {secs:.2}s")
}

/// One progress line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub iteration: usize,
    pub target: Option<usize>,
    pub elapsed_secs: f64,
    pub predicted_total_secs: Option<f64>,
    pub remaining_secs: Option<f64>,
}

impl ProgressReport {
    pub fn percent(&self) -> Option<f64> {
        self.target.filter(|&t| t > 0).map(|t| self.iteration as f64 / t as f64 * 100.0)
    }
}

impl fmt::Display for ProgressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.target, self.percent(), self.predicted_total_secs, self.remaining_secs) {
            (Some(target), Some(pct), Some(total), Some(remaining)) => write!(
                f,
                "Iteration {}/{} ({pct:.1}%) | elapsed {} | estimated total {} | remaining {}",
                self.iteration,
                target,
                format_hms(self.elapsed_secs),
                format_hms(total),
                format_hms(remaining),
            ),
            _ => write!(
                f,
                "Iteration {} | elapsed {}",
                self.iteration,
                format_hms(self.elapsed_secs)
            ),
        }
    }
}
