//! Backoff policy for socket setup and reads

use std::time::Duration;

/// How long to wait between retries and when to give up
///
/// A `None` limit retries forever, which is what the scorer peer expects
/// in production. Tests inject millisecond backoffs and finite limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Pause between bind/accept attempts
    pub bind_backoff: Duration,
    /// Pause after an idle or undecodable read
    pub read_backoff: Duration,
    /// Maximum bind/accept attempts
    pub max_bind_attempts: Option<usize>,
    /// Maximum consecutive idle reads before the peer is considered gone
    pub max_idle_reads: Option<usize>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            bind_backoff: Duration::from_secs(1),
            read_backoff: Duration::from_millis(500),
            max_bind_attempts: None,
            max_idle_reads: None,
        }
    }
}

impl RetryPolicy {
    /// Millisecond backoffs for tests
    pub fn fast() -> Self {
        Self {
            bind_backoff: Duration::from_millis(5),
            read_backoff: Duration::from_millis(2),
            ..Self::default()
        }
    }

    pub fn with_max_idle_reads(mut self, n: usize) -> Self {
        self.max_idle_reads = Some(n);
        self
    }

    pub fn with_max_bind_attempts(mut self, n: usize) -> Self {
        self.max_bind_attempts = Some(n.max(1));
        self
    }

    /// Whether `attempts` has reached the bind limit
    pub(crate) fn bind_exhausted(&self, attempts: usize) -> bool {
        self.max_bind_attempts.is_some_and(|max| attempts >= max)
    }

    /// Whether `idle` has reached the idle-read limit
    pub(crate) fn idle_exhausted(&self, idle: usize) -> bool {
        self.max_idle_reads.is_some_and(|max| idle >= max)
    }
}
