//! Retry loop: run a closure until success or policy says stop.

use super::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::content_api::CommitError;

/// Runs `f` until it succeeds or the retry policy says to stop.
/// `f` receives the 1-based attempt number. On a retryable failure, sleeps for
/// the backoff duration then tries again; the last error is returned as-is.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, CommitError>
where
    F: FnMut(u32) -> Result<T, CommitError>,
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify::classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(d) => {
                        tracing::info!(attempt, ?kind, delay_ms = d.as_millis() as u64, "retrying write: {}", e);
                        std::thread::sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}
