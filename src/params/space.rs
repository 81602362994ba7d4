//! Declared parameter space and concrete assignments

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::{Result, SpaceError};
use super::parameter::{ParameterDomain, ParameterValue};

/// Concrete value per parameter name
pub type ParameterAssignment = BTreeMap<String, ParameterValue>;

/// Ordered mapping from parameter name to domain
///
/// Declaration order is preserved; exhaustive enumeration depends on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpace {
    params: Vec<(String, ParameterDomain)>,
}

impl ParameterSpace {
    /// Create an empty search space
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, rejecting duplicate names and degenerate domains
    pub fn add(&mut self, name: &str, domain: ParameterDomain) -> Result<()> {
        if self.get(name).is_some() {
            return Err(SpaceError::DuplicateParameter(name.to_string()));
        }
        match &domain {
            ParameterDomain::Categorical { choices } if choices.is_empty() => {
                return Err(SpaceError::EmptyDomain(name.to_string()));
            }
            ParameterDomain::Continuous { low, high }
                if !low.is_finite() || !high.is_finite() || low > high =>
            {
                return Err(SpaceError::InvalidBounds(name.to_string(), *low, *high));
            }
            _ => {}
        }
        self.params.push((name.to_string(), domain));
        Ok(())
    }

    /// Builder-style `add`
    pub fn with(mut self, name: &str, domain: ParameterDomain) -> Result<Self> {
        self.add(name, domain)?;
        Ok(self)
    }

    /// Get a parameter domain
    pub fn get(&self, name: &str) -> Option<&ParameterDomain> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Iterate over parameters in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParameterDomain)> {
        self.params.iter().map(|(n, d)| (n, d))
    }

    /// Parameter names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.params.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// True when every domain is a finite categorical list
    pub fn all_categorical(&self) -> bool {
        self.params.iter().all(|(_, d)| d.is_categorical())
    }

    /// Size of the Cartesian product, `None` if any domain is continuous
    pub fn combinations(&self) -> Option<usize> {
        self.params
            .iter()
            .try_fold(1usize, |acc, (_, d)| d.cardinality().map(|c| acc.saturating_mul(c)))
    }

    /// Sample a uniform random assignment
    pub fn sample_random<R: Rng>(&self, rng: &mut R) -> ParameterAssignment {
        self.params.iter().map(|(name, domain)| (name.clone(), domain.sample(rng))).collect()
    }

    /// Validate an assignment: keys match exactly and every value is in its domain
    pub fn validate(&self, assignment: &ParameterAssignment) -> Result<()> {
        for (name, domain) in &self.params {
            match assignment.get(name) {
                Some(value) if domain.is_valid(value) => {}
                Some(value) => return Err(SpaceError::InvalidValue(name.clone(), value.to_string())),
                None => return Err(SpaceError::ParameterNotFound(name.clone())),
            }
        }
        if let Some(extra) = assignment.keys().find(|k| self.get(k).is_none()) {
            return Err(SpaceError::UnexpectedParameter(extra.clone()));
        }
        Ok(())
    }
}
