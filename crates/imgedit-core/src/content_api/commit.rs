//! Read-then-write commit sequence with stale-revision retry.

use super::{CommitError, CommitRequest, ContentApi};
use crate::config::EditorConfig;
use crate::repo_path::RepoPath;
use crate::retry::{run_with_retry, RetryPolicy};
use crate::session::Session;

/// Result of a confirmed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    pub path: RepoPath,
    /// True when the read found no marker (the file was created).
    pub created: bool,
    pub commit_sha: Option<String>,
    /// Number of write attempts it took (1 unless a stale marker was retried).
    pub attempts: u32,
}

/// Commits captured image content to one branch.
#[derive(Debug)]
pub struct CommitClient<A> {
    api: A,
    branch: String,
    message_template: String,
    policy: RetryPolicy,
}

impl<A: ContentApi> CommitClient<A> {
    pub fn new(api: A, session: &Session, cfg: &EditorConfig) -> Self {
        Self {
            api,
            branch: session.branch.clone(),
            message_template: cfg.commit_message.clone(),
            policy: cfg.retry_policy(),
        }
    }

    /// Client with an explicit branch and the default message template.
    pub fn with_branch(api: A, branch: impl Into<String>) -> Self {
        Self {
            api,
            branch: branch.into(),
            message_template: EditorConfig::default().commit_message,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Reads the current marker, then writes `payload` (raw base64 or a data URL).
    ///
    /// Each attempt re-reads the marker so a retry after a stale rejection
    /// carries the fresh one. The read always settles before the write is issued.
    pub fn commit(&self, path: &RepoPath, payload: &str) -> Result<CommitReceipt, CommitError> {
        let message = self.message_template.replace("{path}", path.as_str());

        run_with_retry(&self.policy, |attempt| {
            let marker = self.api.read_revision(path, &self.branch)?;
            tracing::debug!(
                path = %path,
                attempt,
                marker = marker.as_ref().map(|m| m.as_str()).unwrap_or("<none>"),
                "revision read settled"
            );

            let created = marker.is_none();
            let request = CommitRequest::new(
                path.clone(),
                payload,
                message.clone(),
                self.branch.clone(),
                marker,
            );
            let confirmation = self.api.write_content(&request)?;

            tracing::info!(
                path = %path,
                created,
                commit = confirmation.commit_sha.as_deref().unwrap_or("?"),
                "content committed"
            );
            Ok(CommitReceipt {
                path: path.clone(),
                created,
                commit_sha: confirmation.commit_sha,
                attempts: attempt,
            })
        })
    }
}
