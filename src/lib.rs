//! Afinar: parameter tuning against an external scoring process
//!
//! The scorer declares a parameter space over a line-delimited JSON socket
//! protocol, then scores each candidate afinar proposes until the search
//! strategy is done.
//!
//! # Architecture
//!
//! ```text
//! Tuner
//!   ├── transport (Receiver ◀ scores, Sender ▶ candidates)
//!   ├── codec     (JSON lines ⇄ ParameterAssignment)
//!   ├── search    (Exhaustive / RandomThreshold / SurrogateGuided)
//!   └── progress  (quadratic ETA over iteration durations)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use afinar::{TuneConfig, Tuner};
//!
//! let mut tuner = Tuner::new(TuneConfig::default());
//! let outcome = tuner.run()?;
//! if let Some(best) = outcome.best {
//!     println!("best {:?} scored {}", best.assignment, best.score);
//! }
//! # Ok::<(), afinar::Error>(())
//! ```

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod params;
pub mod progress;
pub mod search;
pub mod transport;
pub mod tuner;

pub use config::TuneConfig;
pub use error::{Error, Result};
pub use params::{Observation, ParameterAssignment, ParameterDomain, ParameterSpace, ParameterValue};
pub use progress::{format_hms, ProgressEstimator, ProgressReport};
pub use search::{build_strategy, Proposal, SearchStrategy, StrategyKind};
pub use tuner::{TuneOutcome, TuneReport, Tuner, TunerState};
