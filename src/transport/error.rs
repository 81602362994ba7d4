//! Transport error types

use std::io;
use thiserror::Error;

use crate::codec::CodecError;

/// Socket transport errors
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Gave up on {addr} after {attempts} attempts")]
    AttemptsExhausted { addr: String, attempts: usize },

    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Read failed: {0}")]
    Read(#[source] io::Error),

    #[error("Write failed: {0}")]
    Write(#[source] io::Error),

    #[error("Peer idle for {0} consecutive reads")]
    PeerIdle(usize),

    #[error("Peer closed the connection")]
    PeerClosed,

    #[error("Connection is not established")]
    NotConnected,

    #[error("Encoding failed: {0}")]
    Codec(#[from] CodecError),
}

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;
