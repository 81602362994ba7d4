//! Duplex socket transport
//!
//! The scorer opens one connection to us for scores and accepts one
//! connection from us for candidates. Both carry line-delimited JSON.
//!
//! ```text
//! scorer ──{"score": ..}──▶ Receiver (listen_port)
//! scorer ◀──{"p": ..}────── Sender   (send_port)
//! ```

mod error;
mod receiver;
mod retry;
mod sender;

pub use error::{Result, TransportError};
pub use receiver::Receiver;
pub use retry::RetryPolicy;
pub use sender::Sender;

use serde_json::{Map, Value};

use crate::params::ParameterAssignment;

/// Lifecycle of one side of the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Unconnected,
    Listening,
    Established,
    Closed,
}

/// Source of decoded inbound messages
pub trait MessageSource {
    /// Block until the next complete JSON object arrives
    fn receive_message(&mut self) -> Result<Map<String, Value>>;
}

/// Destination for candidates
pub trait CandidateSink {
    /// Send one candidate, flushed before returning
    fn send_candidate(&mut self, candidate: &ParameterAssignment) -> Result<()>;
}

impl MessageSource for Receiver {
    fn receive_message(&mut self) -> Result<Map<String, Value>> {
        Receiver::receive_message(self)
    }
}

impl CandidateSink for Sender {
    fn send_candidate(&mut self, candidate: &ParameterAssignment) -> Result<()> {
        self.send_message(candidate)
    }
}

/// Both established sides of the transport, owned together
#[derive(Debug)]
pub struct Duplex {
    pub receiver: Receiver,
    pub sender: Sender,
}

impl Duplex {
    pub fn new(receiver: Receiver, sender: Sender) -> Self {
        Self { receiver, sender }
    }

    /// Close both sides; safe to call repeatedly
    pub fn close(&mut self) {
        self.sender.close();
        self.receiver.close();
    }
}

impl MessageSource for Duplex {
    fn receive_message(&mut self) -> Result<Map<String, Value>> {
        self.receiver.receive_message()
    }
}

impl CandidateSink for Duplex {
    fn send_candidate(&mut self, candidate: &ParameterAssignment) -> Result<()> {
        self.sender.send_message(candidate)
    }
}
