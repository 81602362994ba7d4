//! Parameter value and domain types

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Concrete value assigned to one parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Float(f64),
    Categorical(String),
}

impl ParameterValue {
    /// Get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParameterValue::Float(v) => Some(*v),
            ParameterValue::Categorical(_) => None,
        }
    }

    /// Get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::Categorical(s) => Some(s),
            ParameterValue::Float(_) => None,
        }
    }
}

impl std::fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterValue::Float(v) => write!(f, "{v}"),
            ParameterValue::Categorical(s) => write!(f, "{s}"),
        }
    }
}

/// Domain a parameter is drawn from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterDomain {
    /// Bounded interval [low, high]
    Continuous { low: f64, high: f64 },
    /// Finite ordered set of choices
    Categorical { choices: Vec<String> },
}

impl ParameterDomain {
    /// The `[0, 1]` interval used for `normalizedValue` declarations
    pub fn unit_interval() -> Self {
        ParameterDomain::Continuous { low: 0.0, high: 1.0 }
    }

    /// Whether this domain is a finite categorical list
    pub fn is_categorical(&self) -> bool {
        matches!(self, ParameterDomain::Categorical { .. })
    }

    /// Number of distinct values, `None` for continuous domains
    pub fn cardinality(&self) -> Option<usize> {
        match self {
            ParameterDomain::Categorical { choices } => Some(choices.len()),
            ParameterDomain::Continuous { .. } => None,
        }
    }

    /// Sample a uniform random value from this domain
    ///
    /// Categorical domains must be non-empty; `ParameterSpace` enforces this.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> ParameterValue {
        match self {
            ParameterDomain::Continuous { low, high } => {
                ParameterValue::Float(low + rng.random::<f64>() * (high - low))
            }
            ParameterDomain::Categorical { choices } => {
                let idx = (rng.random::<f64>() * choices.len() as f64).floor() as usize;
                let idx = idx.min(choices.len().saturating_sub(1));
                ParameterValue::Categorical(choices[idx].clone())
            }
        }
    }

    /// Check if a value is valid for this domain
    pub fn is_valid(&self, value: &ParameterValue) -> bool {
        match (self, value) {
            (ParameterDomain::Continuous { low, high }, ParameterValue::Float(v)) => {
                *v >= *low && *v <= *high
            }
            (ParameterDomain::Categorical { choices }, ParameterValue::Categorical(s)) => {
                choices.contains(s)
            }
            _ => false,
        }
    }
}
