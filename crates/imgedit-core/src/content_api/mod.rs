//! Remote content API: read a file's revision marker, write new content.
//!
//! [`ContentApi`] is the seam between the commit pipeline and the transport;
//! [`GithubContentApi`] implements it over libcurl, tests use in-process fakes.
//! [`CommitClient`] runs the read-then-write sequence with the stale-revision
//! retry policy.

mod commit;
mod error;
mod github;
mod parse;

pub use commit::{CommitClient, CommitReceipt};
pub use error::CommitError;
pub use github::GithubContentApi;

use serde::Serialize;
use std::fmt;

use crate::capture::raw_payload;
use crate::repo_path::RepoPath;

/// Opaque content hash of the stored version of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RevisionMarker(String);

impl RevisionMarker {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RevisionMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One write: built fresh for every attempt, never reused.
#[derive(Debug, Clone, Serialize)]
pub struct CommitRequest {
    #[serde(skip)]
    pub path: RepoPath,
    pub message: String,
    /// Raw base64, never a data URL.
    pub content: String,
    pub branch: String,
    /// Present iff the preceding read returned a marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<RevisionMarker>,
}

impl CommitRequest {
    /// Builds a request; a `data:...;base64,` prefix on `payload` is dropped.
    pub fn new(
        path: RepoPath,
        payload: &str,
        message: impl Into<String>,
        branch: impl Into<String>,
        sha: Option<RevisionMarker>,
    ) -> Self {
        Self {
            path,
            message: message.into(),
            content: raw_payload(payload).to_string(),
            branch: branch.into(),
            sha,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// What the remote confirmed after a successful write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitConfirmation {
    pub commit_sha: Option<String>,
    pub content_sha: Option<String>,
}

/// Read/write access to repository file content on one branch-aware remote.
///
/// Implementations block; async callers run them on `spawn_blocking`.
pub trait ContentApi: Send + Sync {
    /// Current marker for `path` on `branch`; `Ok(None)` when the file does not exist.
    fn read_revision(&self, path: &RepoPath, branch: &str)
        -> Result<Option<RevisionMarker>, CommitError>;

    /// Submits `request`; `Ok` only when the remote confirmed a commit.
    fn write_content(&self, request: &CommitRequest) -> Result<CommitConfirmation, CommitError>;
}

impl<T: ContentApi + ?Sized> ContentApi for std::sync::Arc<T> {
    fn read_revision(
        &self,
        path: &RepoPath,
        branch: &str,
    ) -> Result<Option<RevisionMarker>, CommitError> {
        (**self).read_revision(path, branch)
    }

    fn write_content(&self, request: &CommitRequest) -> Result<CommitConfirmation, CommitError> {
        (**self).write_content(request)
    }
}
