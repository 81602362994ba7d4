//! Candidate search strategies
//!
//! Every strategy answers the same question: given the declared space and
//! the scores observed so far, what should the peer evaluate next? A
//! strategy signals [`Proposal::Done`] when it has nothing left to try.
//!
//! ```text
//! StrategyKind::Auto
//!   ├── all categorical → Exhaustive
//!   └── otherwise       → SurrogateGuided (GP + Expected Improvement)
//! ```

pub mod error;
pub mod exhaustive;
pub mod random;
pub mod surrogate;

pub use error::SearchError;
pub use exhaustive::Exhaustive;
pub use random::{RandomConfig, RandomThreshold};
pub use surrogate::{GaussianProcess, Regressor, SurrogateConfig, SurrogateGuided};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::params::{Observation, ParameterAssignment, ParameterSpace};

use error::Result;

/// Next step chosen by a strategy
#[derive(Debug, Clone, PartialEq)]
pub enum Proposal {
    Candidate(ParameterAssignment),
    Done,
}

/// Proposes candidates from a parameter space
pub trait SearchStrategy {
    fn name(&self) -> &'static str;

    /// Score reported alongside the space declaration
    fn observe_initial(&mut self, _score: f64) {}

    /// Expected number of proposals, if known up front
    fn planned_iterations(&self, space: &ParameterSpace) -> Option<usize>;

    /// Produce the next candidate, or `Done` when finished
    fn propose(&mut self, space: &ParameterSpace, history: &[Observation]) -> Result<Proposal>;
}

impl<S: SearchStrategy + ?Sized> SearchStrategy for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn observe_initial(&mut self, score: f64) {
        (**self).observe_initial(score);
    }

    fn planned_iterations(&self, space: &ParameterSpace) -> Option<usize> {
        (**self).planned_iterations(space)
    }

    fn propose(&mut self, space: &ParameterSpace, history: &[Observation]) -> Result<Proposal> {
        (**self).propose(space, history)
    }
}

/// Strategy selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Exhaustive for all-categorical spaces, surrogate otherwise
    #[default]
    Auto,
    Exhaustive,
    Random,
    Surrogate,
}

impl StrategyKind {
    /// Pick a concrete strategy for `space`
    pub fn resolve(self, space: &ParameterSpace) -> Self {
        match self {
            Self::Auto if space.all_categorical() => Self::Exhaustive,
            Self::Auto => Self::Surrogate,
            other => other,
        }
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "exhaustive" | "grid" | "brute-force" => Ok(Self::Exhaustive),
            "random" => Ok(Self::Random),
            "surrogate" | "bayesian" | "gp" => Ok(Self::Surrogate),
            _ => Err(format!("Unknown strategy: {s}. Use: auto, exhaustive, random, surrogate")),
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Exhaustive => write!(f, "exhaustive"),
            Self::Random => write!(f, "random"),
            Self::Surrogate => write!(f, "surrogate"),
        }
    }
}

/// Instantiate the strategy for `kind` over `space`
///
/// Exhaustive and random search only understand categorical domains, so
/// they are rejected up front for spaces with continuous parameters.
pub fn build_strategy(
    kind: StrategyKind,
    space: &ParameterSpace,
    random: &RandomConfig,
    surrogate: &SurrogateConfig,
) -> Result<Box<dyn SearchStrategy>> {
    if space.is_empty() {
        return Err(SearchError::EmptySpace);
    }
    let resolved = kind.resolve(space);
    let strategy: Box<dyn SearchStrategy> = match resolved {
        StrategyKind::Exhaustive => {
            reject_continuous("exhaustive", space)?;
            Box::new(Exhaustive::new())
        }
        StrategyKind::Random => {
            reject_continuous("random", space)?;
            Box::new(RandomThreshold::new(random.clone()))
        }
        StrategyKind::Surrogate | StrategyKind::Auto => {
            Box::new(SurrogateGuided::new(surrogate.clone()))
        }
    };
    info!(requested = %kind, strategy = strategy.name(), "Search strategy selected");
    Ok(strategy)
}

fn reject_continuous(strategy: &'static str, space: &ParameterSpace) -> Result<()> {
    match space.iter().find(|(_, d)| !d.is_categorical()) {
        Some((name, _)) => Err(SearchError::UnsupportedDomain { strategy, parameter: name.clone() }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterDomain;

    fn categorical() -> ParameterSpace {
        ParameterSpace::new()
            .with(
                "fixpoint",
                ParameterDomain::Categorical { choices: vec!["A".into(), "B".into(), "C".into()] },
            )
            .unwrap()
    }

    fn mixed() -> ParameterSpace {
        categorical().with("weight", ParameterDomain::unit_interval()).unwrap()
    }

    #[test]
    fn test_strategy_kind_from_str() {
        assert_eq!("auto".parse::<StrategyKind>().unwrap(), StrategyKind::Auto);
        assert_eq!("Exhaustive".parse::<StrategyKind>().unwrap(), StrategyKind::Exhaustive);
        assert_eq!("RANDOM".parse::<StrategyKind>().unwrap(), StrategyKind::Random);
        assert_eq!("bayesian".parse::<StrategyKind>().unwrap(), StrategyKind::Surrogate);
        let err = "annealing".parse::<StrategyKind>().unwrap_err();
        assert!(err.contains("Unknown strategy"));
    }

    #[test]
    fn test_strategy_kind_display_round_trips() {
        for kind in [
            StrategyKind::Auto,
            StrategyKind::Exhaustive,
            StrategyKind::Random,
            StrategyKind::Surrogate,
        ] {
            assert_eq!(kind.to_string().parse::<StrategyKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_auto_resolution() {
        assert_eq!(StrategyKind::Auto.resolve(&categorical()), StrategyKind::Exhaustive);
        assert_eq!(StrategyKind::Auto.resolve(&mixed()), StrategyKind::Surrogate);
        assert_eq!(StrategyKind::Random.resolve(&mixed()), StrategyKind::Random);
    }

    #[test]
    fn test_build_strategy_names() {
        let (r, s) = (RandomConfig::default(), SurrogateConfig::default());
        let name = |kind, space: &ParameterSpace| build_strategy(kind, space, &r, &s).unwrap().name();
        assert_eq!(name(StrategyKind::Auto, &categorical()), "exhaustive");
        assert_eq!(name(StrategyKind::Auto, &mixed()), "surrogate");
        assert_eq!(name(StrategyKind::Random, &categorical()), "random");
        assert_eq!(name(StrategyKind::Surrogate, &categorical()), "surrogate");
    }

    #[test]
    fn test_build_strategy_rejects_continuous_for_discrete_searches() {
        let (r, s) = (RandomConfig::default(), SurrogateConfig::default());
        for kind in [StrategyKind::Exhaustive, StrategyKind::Random] {
            let err = build_strategy(kind, &mixed(), &r, &s).err().unwrap();
            assert!(matches!(err, SearchError::UnsupportedDomain { ref parameter, .. } if parameter == "weight"));
        }
    }

    #[test]
    fn test_build_strategy_empty_space() {
        let err = build_strategy(
            StrategyKind::Auto,
            &ParameterSpace::new(),
            &RandomConfig::default(),
            &SurrogateConfig::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, SearchError::EmptySpace));
    }

    #[test]
    fn test_boxed_strategy_delegates() {
        let mut boxed: Box<dyn SearchStrategy> = Box::new(Exhaustive::new());
        let space = categorical();
        assert_eq!(boxed.planned_iterations(&space), Some(3));
        let Proposal::Candidate(first) = boxed.propose(&space, &[]).unwrap() else {
            panic!("expected a candidate");
        };
        assert_eq!(first["fixpoint"].as_str(), Some("A"));
    }
}
