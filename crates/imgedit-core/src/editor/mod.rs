//! Edit orchestration: click → capture → preview → resolve → commit → notice.
//!
//! The editor runs on the host's event loop. Each click is one independent,
//! single-flight session; failures end at the notice and never propagate.

mod notice;

pub use notice::{Notice, NoticeLevel, Notifier, RecordingNotifier};

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::capture::{apply_preview, CaptureService, FilePicker};
use crate::content_api::{CommitClient, ContentApi};
use crate::dom::{ClickEvent, Dom, HostEvent};
use crate::repo_path::RepoPath;
use crate::surface::{displayed_reference, marked_kind, Scanner};

pub const MSG_SUCCESS: &str = "Image updated successfully.";
pub const MSG_LOCAL_ONLY: &str = "Cannot resolve a repository path for this image. Updated locally only.";

/// How one click session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The clicked node is not a marked surface.
    NotEditable,
    /// The file chooser was dismissed.
    Cancelled,
    /// Preview applied; the reference has no repository path.
    LocalOnly,
    Committed {
        path: RepoPath,
        created: bool,
        commit_sha: Option<String>,
    },
    Failed {
        message: String,
    },
}

pub struct Editor<A, P, Nt> {
    scanner: Scanner,
    capture: CaptureService<P>,
    client: Arc<CommitClient<A>>,
    notifier: Nt,
}

impl<A, P, Nt> Editor<A, P, Nt>
where
    A: ContentApi + 'static,
    P: FilePicker,
    Nt: Notifier,
{
    pub fn new(scanner: Scanner, client: CommitClient<A>, picker: P, notifier: Nt) -> Self {
        Self {
            scanner,
            capture: CaptureService::new(picker),
            client: Arc::new(client),
            notifier,
        }
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    pub fn notifier(&self) -> &Nt {
        &self.notifier
    }

    pub fn client(&self) -> &CommitClient<A> {
        &self.client
    }

    /// Handles host events until the channel closes: inserted subtrees are
    /// scanned, clicks run an edit session to completion before the next event.
    pub async fn run<D: Dom>(&mut self, dom: &mut D, mut events: mpsc::Receiver<HostEvent<D::Node>>) {
        while let Some(event) = events.recv().await {
            match event {
                HostEvent::SubtreeInserted(node) => {
                    if dom.is_element(node) {
                        self.scanner.scan(dom, node);
                    }
                }
                HostEvent::Click(node) => {
                    let mut click = ClickEvent::new(node);
                    self.on_click(dom, &mut click).await;
                }
            }
        }
    }

    /// Runs one replace-and-commit session for a click on a marked surface.
    pub async fn on_click<D: Dom>(&mut self, dom: &mut D, event: &mut ClickEvent<D::Node>) -> EditOutcome {
        let node = event.target;
        let Some(kind) = marked_kind(dom, node) else {
            return EditOutcome::NotEditable;
        };
        // Taken before the preview replaces it.
        let reference = displayed_reference(dom, node, kind);

        let data = match self.capture.capture(event).await {
            Ok(Some(data)) => data,
            Ok(None) => return EditOutcome::Cancelled,
            Err(e) => {
                tracing::warn!("capture failed: {}", e);
                return self.fail(format!("Could not read the selected file: {}", e));
            }
        };

        apply_preview(dom, node, kind, &data);

        let Some(path) = reference.as_deref().and_then(|r| self.scanner.resolver().resolve(r)) else {
            tracing::info!(reference = reference.as_deref().unwrap_or(""), "no repository path; local preview only");
            self.notifier.notify(&Notice::local_only(MSG_LOCAL_ONLY));
            return EditOutcome::LocalOnly;
        };

        let client = Arc::clone(&self.client);
        let payload = data.payload().to_string();
        let commit_path = path.clone();
        let result = tokio::task::spawn_blocking(move || client.commit(&commit_path, &payload)).await;

        match result {
            Ok(Ok(receipt)) => {
                self.notifier.notify(&Notice::success(MSG_SUCCESS));
                EditOutcome::Committed {
                    path: receipt.path,
                    created: receipt.created,
                    commit_sha: receipt.commit_sha,
                }
            }
            Ok(Err(e)) => {
                tracing::error!(path = %path, "upload failed: {}", e);
                self.fail(e.user_message())
            }
            Err(join) => {
                tracing::error!(path = %path, "commit task failed: {}", join);
                self.fail("Upload failed. Check the log for details.".to_string())
            }
        }
    }

    fn fail(&mut self, message: String) -> EditOutcome {
        self.notifier.notify(&Notice::failure(message.clone()));
        EditOutcome::Failed { message }
    }
}

#[cfg(test)]
mod tests;
