//! Parameter spaces, assignments and observations
//!
//! A [`ParameterSpace`] is the search space the scorer declares in its first
//! message. Strategies turn it into [`ParameterAssignment`]s; every evaluated
//! assignment becomes an [`Observation`].

mod error;
mod observation;
mod parameter;
mod space;


pub use error::SpaceError;
pub use observation::{best_observation, Observation};
pub use parameter::{ParameterDomain, ParameterValue};
pub use space::{ParameterAssignment, ParameterSpace};
