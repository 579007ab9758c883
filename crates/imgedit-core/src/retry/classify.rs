//! Classify commit failures into retry policy error kinds.

use crate::content_api::CommitError;
use crate::retry::policy::ErrorKind;

/// Classify a rejected write by HTTP status and the remote's message.
///
/// GitHub answers 409 when the supplied `sha` no longer matches the file, and
/// 422 ("sha wasn't supplied") when the file appeared after our read.
pub fn classify_rejection(status: u32, message: &str) -> ErrorKind {
    match status {
        409 => ErrorKind::StaleRevision,
        422 if message.to_ascii_lowercase().contains("sha") => ErrorKind::StaleRevision,
        _ => ErrorKind::Rejected,
    }
}

/// Classify a commit error into an ErrorKind.
pub fn classify(e: &CommitError) -> ErrorKind {
    match e {
        CommitError::Network { .. } => ErrorKind::Network,
        CommitError::Rejected { status, message } => classify_rejection(*status, message),
        CommitError::Encode(_) => ErrorKind::Rejected,
    }
}
