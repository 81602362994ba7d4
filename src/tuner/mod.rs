//! Tuning session orchestration
//!
//! Drives one session against a scoring peer:
//!
//! ```text
//! AwaitingInitial ──{"score", "possible_values"}──▶ Running ──Done──▶ Finished
//!                                                    │  ▲
//!                                      send candidate│  │score
//!                                                    ▼  │
//!                                                   scorer
//! ```
//!
//! Exactly one candidate is in flight at a time; the peer answers in order.

mod report;


pub use report::{parameter_effects, ParameterEffect, TuneOutcome, TuneReport, ValueEffect};

use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::codec::{score_of, InboundMessage};
use crate::config::TuneConfig;
use crate::error::Result;
use crate::params::{best_observation, Observation, ParameterSpace};
use crate::progress::ProgressEstimator;
use crate::search::{build_strategy, Proposal};
use crate::transport::{CandidateSink, Duplex, MessageSource, Receiver, Sender};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunerState {
    AwaitingInitial,
    Running,
    Finished,
}

/// First valid message from the peer
#[derive(Debug, Clone, PartialEq)]
pub struct InitialMessage {
    pub score: f64,
    pub space: ParameterSpace,
}

/// Runs one tuning session
#[derive(Debug, Clone)]
pub struct Tuner {
    config: TuneConfig,
    state: TunerState,
}

impl Tuner {
    pub fn new(config: TuneConfig) -> Self {
        Self { config, state: TunerState::AwaitingInitial }
    }

    pub fn config(&self) -> &TuneConfig {
        &self.config
    }

    pub fn state(&self) -> TunerState {
        self.state
    }

    /// Accept the peer, receive the space, connect back and search
    ///
    /// Sockets opened along the way are closed on every exit path.
    pub fn run(&mut self) -> Result<TuneOutcome> {
        let policy = self.config.retry.policy();
        let host = self.config.network.host.clone();
        let listen_port = self.config.network.listen_port;
        let send_port = self.config.network.send_port;

        info!(%host, port = listen_port, "Waiting for scorer connection");
        let mut receiver = Receiver::listen_and_accept_once(&host, listen_port, policy)?;

        let initial = match self.await_initial(&mut receiver) {
            Ok(initial) => initial,
            Err(e) => {
                error!(error = %e, "Failed to receive initial data");
                receiver.close();
                return Err(e);
            }
        };
        receiver.close_listener();

        let sender = match Sender::connect(&host, send_port) {
            Ok(sender) => sender,
            Err(e) => {
                error!(error = %e, %host, port = send_port, "Failed to connect for sending");
                receiver.close();
                return Err(e.into());
            }
        };

        let mut channel = Duplex::new(receiver, sender);
        let outcome = self.drive(&mut channel, initial);
        channel.close();
        outcome
    }

    /// Block until a message carries both a score and a valid space
    pub fn await_initial<S: MessageSource>(&mut self, source: &mut S) -> Result<InitialMessage> {
        self.state = TunerState::AwaitingInitial;
        loop {
            let map = source.receive_message()?;
            let message = match InboundMessage::from_map(&map) {
                Ok(message) => message,
                Err(e) => {
                    warn!(error = %e, "Initial data has an invalid space declaration, waiting");
                    continue;
                }
            };
            match message {
                InboundMessage { score: Some(score), possible_values: Some(space) } => {
                    info!(score, parameters = ?space.names(), "Initial data received");
                    return Ok(InitialMessage { score, space });
                }
                InboundMessage { score: None, .. } => {
                    warn!("Initial data did not include a score, waiting for valid data");
                }
                InboundMessage { possible_values: None, .. } => {
                    warn!("Initial data did not declare possible values, waiting for valid data");
                }
            }
        }
    }

    /// Propose, send and score until the strategy is done
    pub fn drive<C: MessageSource + CandidateSink>(
        &mut self,
        channel: &mut C,
        initial: InitialMessage,
    ) -> Result<TuneOutcome> {
        let InitialMessage { score: initial_score, space } = initial;
        let mut strategy =
            build_strategy(self.config.strategy, &space, &self.config.random, &self.config.surrogate)?;
        strategy.observe_initial(initial_score);
        self.state = TunerState::Running;

        let target = strategy.planned_iterations(&space);
        let mut history: Vec<Observation> = Vec::new();
        let mut progress = ProgressEstimator::new();
        let started = Instant::now();

        while let Proposal::Candidate(candidate) = strategy.propose(&space, &history)? {
            let t0 = Instant::now();
            channel.send_candidate(&candidate)?;
            let score = Self::await_score(channel)?;
            let duration = t0.elapsed();
            progress.record(duration);

            let iteration = history.len() + 1;
            info!(
                iteration,
                total = ?target,
                score,
                duration_s = duration.as_secs_f64(),
                candidate = ?candidate,
                "Evaluated candidate"
            );
            history.push(Observation::new(candidate, score));
            info!("{}", progress.report(iteration, target));
        }

        self.state = TunerState::Finished;
        let best = best_observation(&history).cloned();
        let elapsed_secs = started.elapsed().as_secs_f64();
        match &best {
            Some(b) => info!(
                score = b.score,
                params = ?b.assignment,
                elapsed_s = elapsed_secs,
                "Best parameters found"
            ),
            None => warn!("Search finished without evaluating any candidate"),
        }

        Ok(TuneOutcome {
            strategy: strategy.name().to_string(),
            initial_score,
            space,
            durations: progress.durations().to_vec(),
            observations: history,
            best,
            elapsed_secs,
        })
    }

    /// Re-await until a response carries a score
    fn await_score<S: MessageSource>(source: &mut S) -> Result<f64> {
        loop {
            let map = source.receive_message()?;
            match score_of(&map) {
                Some(score) => return Ok(score),
                None => {
                    warn!("Score not found in response, waiting for valid score");
                    debug!(message = ?map, "Discarded response");
                }
            }
        }
    }
}
