//! Parse content API response bodies.

use serde::Deserialize;

use super::{CommitConfirmation, CommitError, RevisionMarker};

#[derive(Debug, Deserialize)]
struct ContentMeta {
    #[serde(default)]
    sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitMeta {
    #[serde(default)]
    sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WriteResponse {
    #[serde(default)]
    commit: Option<CommitMeta>,
    #[serde(default)]
    content: Option<ContentMeta>,
    #[serde(default)]
    message: Option<String>,
}

/// Revision marker from a successful read. Directory listings (JSON arrays),
/// bodies without `sha` and malformed JSON yield `None`.
pub(crate) fn parse_revision(body: &[u8]) -> Option<RevisionMarker> {
    let meta: ContentMeta = serde_json::from_slice(body).ok()?;
    meta.sha
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(RevisionMarker::new)
}

/// Write outcome: success iff the body carries a `commit` object.
pub(crate) fn parse_write_response(status: u32, body: &[u8]) -> Result<CommitConfirmation, CommitError> {
    match serde_json::from_slice::<WriteResponse>(body) {
        Ok(WriteResponse {
            commit: Some(commit),
            content,
            ..
        }) => Ok(CommitConfirmation {
            commit_sha: commit.sha,
            content_sha: content.and_then(|c| c.sha),
        }),
        Ok(WriteResponse { message, .. }) => Err(CommitError::Rejected {
            status,
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| format!("HTTP {} without commit confirmation", status)),
        }),
        Err(_) => {
            let text = String::from_utf8_lossy(body).trim().to_string();
            Err(CommitError::Rejected {
                status,
                message: if text.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    text
                },
            })
        }
    }
}
