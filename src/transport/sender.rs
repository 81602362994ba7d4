//! Outbound side: connect and write JSON lines

use std::io::{BufWriter, Write};
use std::net::{Shutdown, TcpStream};

use tracing::{debug, info};

use crate::codec::encode_assignment;
use crate::params::ParameterAssignment;

use super::error::{Result, TransportError};
use super::receiver::resolve;
use super::ConnectionState;

/// Outbound connection to the scorer
#[derive(Debug)]
pub struct Sender {
    writer: Option<BufWriter<TcpStream>>,
    state: ConnectionState,
    addr: String,
}

impl Sender {
    /// Connect once; the caller owns any retry policy
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        let addrs = resolve(host, port)?;
        let addr = format!("{host}:{port}");
        let stream = TcpStream::connect(&addrs[..])
            .map_err(|source| TransportError::Connect { addr: addr.clone(), source })?;
        if let Err(e) = stream.set_nodelay(true) {
            debug!(%addr, error = %e, "Could not disable Nagle's algorithm");
        }
        info!(%addr, "Connected for sending");
        Ok(Self { writer: Some(BufWriter::new(stream)), state: ConnectionState::Established, addr })
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Write one newline-terminated line and flush it immediately
    pub fn send_line(&mut self, line: &str) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(TransportError::NotConnected)?;
        writer.write_all(line.as_bytes()).map_err(TransportError::Write)?;
        if !line.ends_with('\n') {
            writer.write_all(b"\n").map_err(TransportError::Write)?;
        }
        writer.flush().map_err(TransportError::Write)
    }

    /// Serialize an assignment as one JSON line and send it
    pub fn send_message(&mut self, assignment: &ParameterAssignment) -> Result<()> {
        let line = encode_assignment(assignment)?;
        debug!(line = line.trim_end(), "Sending candidate");
        self.send_line(&line)
    }

    /// Flush and release the socket; safe to call repeatedly
    pub fn close(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
            if let Ok(stream) = writer.into_inner() {
                let _ = stream.shutdown(Shutdown::Both);
            }
            debug!(addr = %self.addr, "Sender closed");
        }
        self.state = ConnectionState::Closed;
    }
}

impl Drop for Sender {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterValue;
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_connect_refused() {
        let port = {
            let l = TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let err = Sender::connect("127.0.0.1", port).unwrap_err();
        assert!(matches!(err, TransportError::Connect { .. }));
    }

    #[test]
    fn test_send_message_writes_one_line() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let peer = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut line = String::new();
            BufReader::new(stream).read_line(&mut line).unwrap();
            line
        });

        let mut sender = Sender::connect("127.0.0.1", port).unwrap();
        assert_eq!(sender.state(), ConnectionState::Established);
        let mut candidate = ParameterAssignment::new();
        candidate.insert("fixpoint".to_string(), ParameterValue::Categorical("A".to_string()));
        sender.send_message(&candidate).unwrap();

        let line = peer.join().unwrap();
        assert_eq!(line, "{\"fixpoint\":\"A\"}\n");
    }

    #[test]
    fn test_close_is_idempotent() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let mut sender = Sender::connect("127.0.0.1", port).unwrap();
        sender.close();
        sender.close();
        assert_eq!(sender.state(), ConnectionState::Closed);
        assert!(matches!(sender.send_line("{}"), Err(TransportError::NotConnected)));
    }
}
