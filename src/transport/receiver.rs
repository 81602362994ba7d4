//! Inbound side: listen, accept one peer, read JSON lines

use std::io::{ErrorKind, Read};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::thread;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::codec::{decode_line, CodecError, LineBuffer};

use super::error::{Result, TransportError};
use super::retry::RetryPolicy;
use super::ConnectionState;

const READ_CHUNK: usize = 4096;

/// Listening socket plus the single accepted connection
#[derive(Debug)]
pub struct Receiver {
    listener: Option<TcpListener>,
    stream: Option<TcpStream>,
    buffer: LineBuffer,
    policy: RetryPolicy,
    state: ConnectionState,
    addr: String,
}

/// Resolve `host:port`, IPv4 first
pub(crate) fn resolve(host: &str, port: u16) -> Result<Vec<SocketAddr>> {
    let addr = format!("{host}:{port}");
    let mut addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|_| TransportError::InvalidAddress(addr.clone()))?
        .collect();
    if addrs.is_empty() {
        return Err(TransportError::InvalidAddress(addr));
    }
    addrs.sort_by_key(|a| !a.is_ipv4());
    Ok(addrs)
}

fn is_transient(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::AddrInUse | ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut
    )
}

impl Receiver {
    /// Bind and listen, retrying while the port is busy
    pub fn bind(host: &str, port: u16, policy: RetryPolicy) -> Result<Self> {
        let addrs = resolve(host, port)?;
        let addr = format!("{host}:{port}");
        let mut attempts = 0;

        let listener = loop {
            attempts += 1;
            match TcpListener::bind(&addrs[..]) {
                Ok(listener) => break listener,
                Err(e) if is_transient(e.kind()) => {
                    if policy.bind_exhausted(attempts) {
                        return Err(TransportError::AttemptsExhausted { addr, attempts });
                    }
                    warn!(%addr, error = %e, "Port not available yet, retrying");
                    thread::sleep(policy.bind_backoff);
                }
                Err(source) => return Err(TransportError::Bind { addr, source }),
            }
        };

        let local = listener.local_addr().map(|a| a.to_string()).unwrap_or(addr);
        info!(addr = %local, "Listening for incoming connection");
        Ok(Self {
            listener: Some(listener),
            stream: None,
            buffer: LineBuffer::new(),
            policy,
            state: ConnectionState::Listening,
            addr: local,
        })
    }

    /// Bind, then block until exactly one peer connects
    pub fn listen_and_accept_once(host: &str, port: u16, policy: RetryPolicy) -> Result<Self> {
        let mut receiver = Self::bind(host, port, policy)?;
        receiver.accept_once()?;
        Ok(receiver)
    }

    /// Accept a single inbound connection, retrying failed accepts
    pub fn accept_once(&mut self) -> Result<SocketAddr> {
        let listener = self.listener.as_ref().ok_or(TransportError::NotConnected)?;
        let mut attempts = 0;
        loop {
            attempts += 1;
            match listener.accept() {
                Ok((stream, peer)) => {
                    info!(%peer, "Accepted connection");
                    self.stream = Some(stream);
                    self.state = ConnectionState::Established;
                    return Ok(peer);
                }
                Err(e) => {
                    if self.policy.bind_exhausted(attempts) {
                        return Err(TransportError::AttemptsExhausted {
                            addr: self.addr.clone(),
                            attempts,
                        });
                    }
                    warn!(error = %e, "Accept failed, retrying");
                    thread::sleep(self.policy.bind_backoff);
                }
            }
        }
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Read the next complete JSON object
    ///
    /// Idle reads and undecodable lines are retried after `read_backoff`.
    /// End of stream is terminal: a trailing unterminated line is still
    /// delivered, then `PeerClosed` is returned.
    pub fn receive_message(&mut self) -> Result<Map<String, Value>> {
        let mut idle = 0usize;
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            if let Some(line) = self.buffer.next_line() {
                match decode_line(&line) {
                    Ok(map) => {
                        debug!(?map, "Received message");
                        return Ok(map);
                    }
                    Err(CodecError::Empty) => {
                        idle += 1;
                        self.idle_wait(idle)?;
                    }
                    Err(e) => {
                        warn!(error = %e, "Error decoding JSON, waiting for complete data");
                        thread::sleep(self.policy.read_backoff);
                    }
                }
                continue;
            }

            let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;
            match stream.read(&mut chunk) {
                Ok(0) => return self.drain_at_eof(),
                Ok(n) => {
                    idle = 0;
                    self.buffer.push(&chunk[..n]);
                }
                Err(e) if is_transient(e.kind()) => {
                    idle += 1;
                    self.idle_wait(idle)?;
                }
                Err(e) => return Err(TransportError::Read(e)),
            }
        }
    }

    /// Deliver the unterminated tail left at end of stream, or report closure
    fn drain_at_eof(&mut self) -> Result<Map<String, Value>> {
        self.state = ConnectionState::Closed;
        if let Some(rest) = self.buffer.take_rest() {
            match decode_line(&rest) {
                Ok(map) => {
                    debug!(?map, "Received final message at end of stream");
                    return Ok(map);
                }
                Err(CodecError::Empty) => {}
                Err(e) => warn!(error = %e, "Discarding undecodable data at end of stream"),
            }
        }
        info!(addr = %self.addr, "Peer closed the connection");
        Err(TransportError::PeerClosed)
    }

    fn idle_wait(&self, idle: usize) -> Result<()> {
        if self.policy.idle_exhausted(idle) {
            return Err(TransportError::PeerIdle(idle));
        }
        warn!(idle, "No data received, waiting");
        thread::sleep(self.policy.read_backoff);
        Ok(())
    }

    /// Stop accepting; the established connection stays open
    pub fn close_listener(&mut self) {
        if self.listener.take().is_some() {
            debug!(addr = %self.addr, "Listener closed");
        }
    }

    /// Release all socket resources; safe to call repeatedly
    pub fn close(&mut self) {
        self.close_listener();
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
        }
        if self.state != ConnectionState::Closed {
            debug!(addr = %self.addr, "Receiver closed");
        }
        self.state = ConnectionState::Closed;
    }
}

impl Drop for Receiver {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    fn bound() -> Receiver {
        Receiver::bind("127.0.0.1", 0, RetryPolicy::fast().with_max_idle_reads(3)).unwrap()
    }

    #[test]
    fn test_invalid_address_is_fatal() {
        let err = Receiver::bind("definitely not a host", 1, RetryPolicy::fast()).unwrap_err();
        assert!(matches!(err, TransportError::InvalidAddress(_)));
    }

    #[test]
    fn test_bind_gives_up_when_port_busy() {
        let taken = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = taken.local_addr().unwrap().port();
        let policy = RetryPolicy::fast().with_max_bind_attempts(2);
        match Receiver::bind("127.0.0.1", port, policy) {
            Err(TransportError::AttemptsExhausted { attempts, .. }) => assert_eq!(attempts, 2),
            // Some platforms allow rebinding with SO_REUSEADDR semantics
            Ok(_) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_receive_split_and_malformed_lines() {
        let mut receiver = bound();
        let addr = receiver.local_addr().unwrap();
        let peer = thread::spawn(move || {
            let mut s = TcpStream::connect(addr).unwrap();
            s.write_all(b"not json\n{\"score\":").unwrap();
            s.flush().unwrap();
            thread::sleep(Duration::from_millis(20));
            s.write_all(b" 0.5}\n").unwrap();
            s
        });
        receiver.accept_once().unwrap();
        assert_eq!(receiver.state(), ConnectionState::Established);

        let msg = receiver.receive_message().unwrap();
        assert_eq!(msg.get("score").and_then(Value::as_f64), Some(0.5));
        drop(peer.join().unwrap());
    }

    #[test]
    fn test_closed_peer_fails_without_idle_budget() {
        let mut receiver = Receiver::bind("127.0.0.1", 0, RetryPolicy::fast()).unwrap();
        let addr = receiver.local_addr().unwrap();
        let peer = thread::spawn(move || drop(TcpStream::connect(addr).unwrap()));
        receiver.accept_once().unwrap();
        peer.join().unwrap();

        let err = receiver.receive_message().unwrap_err();
        assert!(matches!(err, TransportError::PeerClosed));
        assert_eq!(receiver.state(), ConnectionState::Closed);
        assert!(matches!(receiver.receive_message(), Err(TransportError::PeerClosed)));
    }

    #[test]
    fn test_unterminated_last_line_is_delivered_at_eof() {
        let mut receiver = Receiver::bind("127.0.0.1", 0, RetryPolicy::fast()).unwrap();
        let addr = receiver.local_addr().unwrap();
        let peer = thread::spawn(move || {
            let mut s = TcpStream::connect(addr).unwrap();
            s.write_all(b"{\"score\": 0.25}\n{\"score\": 0.5}").unwrap();
        });
        receiver.accept_once().unwrap();
        peer.join().unwrap();

        let first = receiver.receive_message().unwrap();
        assert_eq!(first.get("score").and_then(Value::as_f64), Some(0.25));
        let last = receiver.receive_message().unwrap();
        assert_eq!(last.get("score").and_then(Value::as_f64), Some(0.5));
        assert!(matches!(receiver.receive_message(), Err(TransportError::PeerClosed)));
    }

    #[test]
    fn test_undecodable_tail_at_eof_is_dropped() {
        let mut receiver = Receiver::bind("127.0.0.1", 0, RetryPolicy::fast()).unwrap();
        let addr = receiver.local_addr().unwrap();
        let peer = thread::spawn(move || {
            let mut s = TcpStream::connect(addr).unwrap();
            s.write_all(b"{\"score\": ").unwrap();
        });
        receiver.accept_once().unwrap();
        peer.join().unwrap();

        assert!(matches!(receiver.receive_message(), Err(TransportError::PeerClosed)));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut receiver = bound();
        receiver.close();
        receiver.close();
        assert_eq!(receiver.state(), ConnectionState::Closed);
        assert!(matches!(receiver.receive_message(), Err(TransportError::NotConnected)));
        assert!(matches!(receiver.accept_once(), Err(TransportError::NotConnected)));
    }
}
