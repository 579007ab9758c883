use std::time::Duration;

/// High-level classification of a commit failure for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The remote rejected the write because the revision marker is out of date
    /// (another writer committed between our read and our write).
    StaleRevision,
    /// The request did not complete (DNS, connect, timeout, reset).
    Network,
    /// Any other rejection (permissions, validation, missing repository).
    Rejected,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Re-read the marker and retry after the given delay.
    RetryAfter(Duration),
}

/// Bounded exponential backoff for stale-revision conflicts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of write attempts (including the first).
    pub max_attempts: u32,
    /// Base delay for backoff.
    pub base_delay: Duration,
    /// Upper bound on backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Single-shot: the first failure is final.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// `attempt` is 1-based (1 = first attempt). Returns `RetryDecision::NoRetry`
    /// when we should stop retrying.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }

        match kind {
            ErrorKind::Network | ErrorKind::Rejected => RetryDecision::NoRetry,
            ErrorKind::StaleRevision => {
                // base * 2^(attempt-1), capped.
                let exp = 1u32 << attempt.saturating_sub(1).min(8);
                let delay = self.base_delay.saturating_mul(exp).min(self.max_delay);
                RetryDecision::RetryAfter(delay)
            }
        }
    }
}
