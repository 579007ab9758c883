//! Retry and backoff policy for content writes.
//!
//! Only a stale revision marker is worth another attempt: the client re-reads
//! the marker and resubmits. Network failures and other rejections surface
//! immediately.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_rejection};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
