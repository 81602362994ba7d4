//! Exhaustive enumeration of a categorical space

use tracing::info;

use crate::params::{Observation, ParameterAssignment, ParameterDomain, ParameterSpace, ParameterValue};

use super::error::{Result, SearchError};
use super::{Proposal, SearchStrategy};

/// Visits every combination of a categorical space exactly once
///
/// The first declared parameter varies slowest; values keep their declared order.
#[derive(Debug, Clone, Default)]
pub struct Exhaustive {
    configs: Option<Vec<ParameterAssignment>>,
    next_idx: usize,
}

impl Exhaustive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full Cartesian product of `space` in enumeration order
    pub fn configurations(space: &ParameterSpace) -> Result<Vec<ParameterAssignment>> {
        if space.is_empty() {
            return Err(SearchError::EmptySpace);
        }
        let param_values = space
            .iter()
            .map(|(name, domain)| match domain {
                ParameterDomain::Categorical { choices } => Ok((
                    name.clone(),
                    choices.iter().map(|c| ParameterValue::Categorical(c.clone())).collect(),
                )),
                ParameterDomain::Continuous { .. } => Err(SearchError::UnsupportedDomain {
                    strategy: "exhaustive",
                    parameter: name.clone(),
                }),
            })
            .collect::<Result<Vec<(String, Vec<ParameterValue>)>>>()?;

        Ok(Self::cartesian_product(&param_values))
    }

    fn cartesian_product(param_values: &[(String, Vec<ParameterValue>)]) -> Vec<ParameterAssignment> {
        let Some(((name, values), rest)) = param_values.split_first() else {
            return vec![ParameterAssignment::new()];
        };
        let rest_configs = Self::cartesian_product(rest);

        values
            .iter()
            .flat_map(|v| {
                rest_configs.iter().map(move |config| {
                    let mut new_config = config.clone();
                    new_config.insert(name.clone(), v.clone());
                    new_config
                })
            })
            .collect()
    }

    /// Number of candidates not yet proposed
    pub fn remaining(&self) -> Option<usize> {
        self.configs.as_ref().map(|c| c.len().saturating_sub(self.next_idx))
    }
}

impl SearchStrategy for Exhaustive {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    fn planned_iterations(&self, space: &ParameterSpace) -> Option<usize> {
        match &self.configs {
            Some(configs) => Some(configs.len()),
            None => space.combinations(),
        }
    }

    fn propose(&mut self, space: &ParameterSpace, _history: &[Observation]) -> Result<Proposal> {
        if self.configs.is_none() {
            let configs = Self::configurations(space)?;
            info!(combinations = configs.len(), "Exhaustive search: evaluating all combinations");
            self.configs = Some(configs);
        }
        let Some(config) = self.configs.as_ref().and_then(|c| c.get(self.next_idx)) else {
            return Ok(Proposal::Done);
        };
        self.next_idx += 1;
        Ok(Proposal::Candidate(config.clone()))
    }
}
