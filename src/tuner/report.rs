//! Run outcome and the report written at the end of a run

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ReportFormat;
use crate::error::Result;
use crate::params::{Observation, ParameterDomain, ParameterSpace, ParameterValue};
use crate::progress::format_hms;

/// Everything a finished run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuneOutcome {
    /// Strategy that produced the candidates
    pub strategy: String,
    /// Score reported with the space declaration
    pub initial_score: f64,
    pub space: ParameterSpace,
    /// Evaluations in the order they completed
    pub observations: Vec<Observation>,
    /// Seconds per evaluation, aligned with `observations`
    pub durations: Vec<f64>,
    /// Highest-scoring evaluation; the initial score is not a candidate
    pub best: Option<Observation>,
    pub elapsed_secs: f64,
}

impl TuneOutcome {
    pub fn iterations(&self) -> usize {
        self.observations.len()
    }

    pub fn best_score(&self) -> Option<f64> {
        self.best.as_ref().map(|b| b.score)
    }

    /// Whether the best evaluation beat the starting configuration
    pub fn improved(&self) -> bool {
        self.best_score().is_some_and(|s| s > self.initial_score)
    }
}

/// Score statistics for one categorical value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueEffect {
    pub value: String,
    pub count: usize,
    pub mean_score: Option<f64>,
    pub max_score: Option<f64>,
}

/// How a parameter related to the scores seen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParameterEffect {
    /// One entry per declared choice, in declared order
    Categorical { name: String, values: Vec<ValueEffect> },
    /// Observed range and the value of the best evaluation
    Continuous { name: String, min: Option<f64>, max: Option<f64>, best_value: Option<f64> },
}

impl ParameterEffect {
    pub fn name(&self) -> &str {
        match self {
            Self::Categorical { name, .. } | Self::Continuous { name, .. } => name,
        }
    }
}

/// Per-parameter summaries over the whole history
pub fn parameter_effects(
    space: &ParameterSpace,
    observations: &[Observation],
    best: Option<&Observation>,
) -> Vec<ParameterEffect> {
    space
        .iter()
        .map(|(name, domain)| match domain {
            ParameterDomain::Categorical { choices } => {
                let values = choices
                    .iter()
                    .map(|choice| {
                        let scores: Vec<f64> = observations
                            .iter()
                            .filter(|o| {
                                o.assignment.get(name).and_then(ParameterValue::as_str)
                                    == Some(choice.as_str())
                            })
                            .map(|o| o.score)
                            .collect();
                        let count = scores.len();
                        ValueEffect {
                            value: choice.clone(),
                            count,
                            mean_score: (count > 0).then(|| scores.iter().sum::<f64>() / count as f64),
                            max_score: scores.into_iter().reduce(f64::max),
                        }
                    })
                    .collect();
                ParameterEffect::Categorical { name: name.clone(), values }
            }
            ParameterDomain::Continuous { .. } => {
                let values: Vec<f64> = observations
                    .iter()
                    .filter_map(|o| o.assignment.get(name).and_then(ParameterValue::as_float))
                    .collect();
                ParameterEffect::Continuous {
                    name: name.clone(),
                    min: values.iter().copied().reduce(f64::min),
                    max: values.iter().copied().reduce(f64::max),
                    best_value: best
                        .and_then(|b| b.assignment.get(name))
                        .and_then(ParameterValue::as_float),
                }
            }
        })
        .collect()
}

/// Serializable summary of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuneReport {
    pub generated_at: DateTime<Utc>,
    pub strategy: String,
    pub iterations: usize,
    pub initial_score: f64,
    pub best: Option<Observation>,
    pub elapsed_secs: f64,
    /// `elapsed_secs` as `Hh Mm S.SSs`
    pub elapsed: String,
    pub mean_iteration_secs: Option<f64>,
    pub effects: Vec<ParameterEffect>,
    pub observations: Vec<Observation>,
}

impl TuneReport {
    pub fn from_outcome(outcome: &TuneOutcome) -> Self {
        let mean_iteration_secs = (!outcome.durations.is_empty())
            .then(|| outcome.durations.iter().sum::<f64>() / outcome.durations.len() as f64);
        Self {
            generated_at: Utc::now(),
            strategy: outcome.strategy.clone(),
            iterations: outcome.iterations(),
            initial_score: outcome.initial_score,
            best: outcome.best.clone(),
            elapsed_secs: outcome.elapsed_secs,
            elapsed: format_hms(outcome.elapsed_secs),
            mean_iteration_secs,
            effects: parameter_effects(&outcome.space, &outcome.observations, outcome.best.as_ref()),
            observations: outcome.observations.clone(),
        }
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        Ok(match format {
            ReportFormat::Json => serde_json::to_string_pretty(self)?,
            ReportFormat::Yaml => serde_yaml::to_string(self)?,
        })
    }

    /// Write the report, creating parent directories as needed
    pub fn write(&self, path: &Path, format: ReportFormat) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render(format)?)?;
        Ok(())
    }
}
