//! Commit failure type.

use thiserror::Error;

/// Failure of a revision read or content write.
///
/// A missing file on read is not an error (`Ok(None)`); everything here ends
/// the edit unless the retry policy classifies it as a stale revision.
#[derive(Debug, Error)]
pub enum CommitError {
    /// The request itself did not complete (connectivity, timeout, TLS).
    #[error("{op} request failed: {message}")]
    Network { op: &'static str, message: String },
    /// The write completed but carried no commit confirmation. `message` is
    /// the remote's own message, surfaced to the user unchanged.
    #[error("{message}")]
    Rejected { status: u32, message: String },
    /// The request body could not be built; nothing was sent.
    #[error("encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CommitError {
    pub(crate) fn network(op: &'static str) -> impl Fn(curl::Error) -> CommitError {
        move |e| CommitError::Network {
            op,
            message: e.to_string(),
        }
    }

    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            CommitError::Network { .. } => {
                "Upload failed: could not reach the repository. Check your connection and try again."
                    .to_string()
            }
            CommitError::Rejected { message, .. } => message.clone(),
            CommitError::Encode(_) => "Upload failed: the request could not be prepared.".to_string(),
        }
    }
}
