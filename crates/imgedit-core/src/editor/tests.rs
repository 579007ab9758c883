//! Editor session tests against an in-memory page and a scripted remote.

use super::*;
use crate::content_api::{CommitConfirmation, CommitError, CommitRequest, RevisionMarker};
use crate::dom::{MemoryDom, NodeId, NodeSnapshot};
use crate::repo_path::{AssetLayout, PathResolver};
use crate::retry::RetryPolicy;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Default)]
struct FakeRemote {
    marker: Option<String>,
    read_error: Mutex<Option<CommitError>>,
    write_error: Mutex<Option<CommitError>>,
    log: Mutex<Vec<String>>,
    requests: Mutex<Vec<CommitRequest>>,
}

impl FakeRemote {
    fn with_marker(marker: &str) -> Self {
        Self {
            marker: Some(marker.to_string()),
            ..Self::default()
        }
    }

    fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn requests(&self) -> Vec<CommitRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ContentApi for FakeRemote {
    fn read_revision(&self, path: &RepoPath, branch: &str) -> Result<Option<RevisionMarker>, CommitError> {
        self.log.lock().unwrap().push(format!("read {}@{}", path, branch));
        if let Some(e) = self.read_error.lock().unwrap().take() {
            return Err(e);
        }
        Ok(self.marker.as_deref().map(RevisionMarker::new))
    }

    fn write_content(&self, request: &CommitRequest) -> Result<CommitConfirmation, CommitError> {
        self.log.lock().unwrap().push(format!("write {}", request.path));
        self.requests.lock().unwrap().push(request.clone());
        if let Some(e) = self.write_error.lock().unwrap().take() {
            return Err(e);
        }
        Ok(CommitConfirmation {
            commit_sha: Some("c0ffee".to_string()),
            content_sha: None,
        })
    }
}

struct Picker(Option<PathBuf>);

impl FilePicker for Picker {
    fn choose(&mut self, _accept: &str) -> Option<PathBuf> {
        self.0.clone()
    }
}

type TestEditor = Editor<FakeRemote, Picker, RecordingNotifier>;

fn png(size: usize) -> tempfile::NamedTempFile {
    let mut f = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    bytes.resize(size, 0xAB);
    f.write_all(&bytes).unwrap();
    f.flush().unwrap();
    f
}

fn page() -> MemoryDom {
    MemoryDom::from_snapshot(
        &NodeSnapshot::element("body")
            .child(
                NodeSnapshot::element("a").attr("href", "/about").child(
                    NodeSnapshot::element("img")
                        .attr("id", "banner")
                        .attr("src", "/assets/images/banner.png"),
                ),
            )
            .child(NodeSnapshot::element("section").attr("id", "hero").style(
                "background-image",
                "linear-gradient(rgba(0,0,0,.5), rgba(0,0,0,.5)), url(/assets/images/hero.jpg)",
            ))
            .child(NodeSnapshot::element("p").attr("id", "plain")),
    )
}

fn editor(remote: FakeRemote, file: Option<PathBuf>) -> TestEditor {
    let resolver = PathResolver::new("https://www.example.com", AssetLayout::default()).unwrap();
    let client = CommitClient::with_branch(remote, "main").with_policy(RetryPolicy::no_retry());
    Editor::new(Scanner::new(resolver), client, Picker(file), RecordingNotifier::default())
}

fn scanned() -> (MemoryDom, NodeId, NodeId) {
    let mut dom = page();
    let root = dom.root();
    let resolver = PathResolver::new("https://www.example.com", AssetLayout::default()).unwrap();
    Scanner::new(resolver).scan(&mut dom, root);
    let banner = dom.find_by_id("banner").unwrap();
    let hero = dom.find_by_id("hero").unwrap();
    (dom, banner, hero)
}

#[tokio::test]
async fn image_update_commits_with_marker_and_previews() {
    let file = png(10 * 1024);
    let (mut dom, banner, _) = scanned();
    let mut ed = editor(FakeRemote::with_marker("abc123"), Some(file.path().to_path_buf()));

    let mut click = ClickEvent::new(banner);
    let outcome = ed.on_click(&mut dom, &mut click).await;

    match &outcome {
        EditOutcome::Committed { path, created, commit_sha } => {
            assert_eq!(path.as_str(), "public/assets/images/banner.png");
            assert!(!created);
            assert_eq!(commit_sha.as_deref(), Some("c0ffee"));
        }
        other => panic!("expected commit, got {:?}", other),
    }
    assert!(click.default_prevented());
    assert!(click.propagation_stopped());

    let remote = ed.client().api();
    assert_eq!(
        remote.log(),
        vec![
            "read public/assets/images/banner.png@main".to_string(),
            "write public/assets/images/banner.png".to_string(),
        ]
    );
    let req = &remote.requests()[0];
    assert_eq!(req.message, "Update public/assets/images/banner.png");
    assert_eq!(req.branch, "main");
    assert_eq!(req.sha.as_ref().map(|s| s.as_str()), Some("abc123"));
    assert!(!req.content.starts_with("data:"));

    let src = dom.attribute(banner, "src").unwrap();
    assert_eq!(src, format!("data:image/png;base64,{}", req.content));
    assert_eq!(ed.notifier().notices, vec![Notice::success(MSG_SUCCESS)]);
}

#[tokio::test]
async fn missing_file_is_created_without_marker() {
    let file = png(64);
    let (mut dom, banner, _) = scanned();
    let mut ed = editor(FakeRemote::default(), Some(file.path().to_path_buf()));

    let outcome = ed.on_click(&mut dom, &mut ClickEvent::new(banner)).await;
    assert!(matches!(outcome, EditOutcome::Committed { created: true, .. }));
    assert!(ed.client().api().requests()[0].sha.is_none());
}

#[tokio::test]
async fn background_surface_commits_first_url() {
    let file = png(64);
    let (mut dom, _, hero) = scanned();
    let mut ed = editor(FakeRemote::with_marker("h1"), Some(file.path().to_path_buf()));

    let outcome = ed.on_click(&mut dom, &mut ClickEvent::new(hero)).await;
    match outcome {
        EditOutcome::Committed { path, .. } => assert_eq!(path.as_str(), "public/assets/images/hero.jpg"),
        other => panic!("expected commit, got {:?}", other),
    }
    let bg = dom.style_of(hero, "background-image").unwrap();
    assert!(crate::css::first_url(bg).unwrap().starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn cancelled_chooser_does_nothing() {
    let (mut dom, banner, _) = scanned();
    let mut ed = editor(FakeRemote::default(), None);

    let outcome = ed.on_click(&mut dom, &mut ClickEvent::new(banner)).await;
    assert_eq!(outcome, EditOutcome::Cancelled);
    assert_eq!(dom.attribute(banner, "src").as_deref(), Some("/assets/images/banner.png"));
    assert!(ed.client().api().log().is_empty());
    assert!(ed.notifier().notices.is_empty());
}

#[tokio::test]
async fn unmarked_node_is_not_editable() {
    let (mut dom, _, _) = scanned();
    let plain = dom.find_by_id("plain").unwrap();
    let mut ed = editor(FakeRemote::default(), None);
    let mut click = ClickEvent::new(plain);
    assert_eq!(ed.on_click(&mut dom, &mut click).await, EditOutcome::NotEditable);
    assert!(!click.default_prevented());
}

#[tokio::test]
async fn data_url_reference_is_local_only() {
    let file = png(64);
    let (mut dom, banner, _) = scanned();
    let mut ed = editor(FakeRemote::default(), Some(file.path().to_path_buf()));

    ed.on_click(&mut dom, &mut ClickEvent::new(banner)).await;
    // The surface now shows a data URL, which never maps to a repository path.
    let second = ed.on_click(&mut dom, &mut ClickEvent::new(banner)).await;
    assert_eq!(second, EditOutcome::LocalOnly);
    assert_eq!(ed.client().api().log().len(), 2);
    assert_eq!(
        ed.notifier().notices.last(),
        Some(&Notice::local_only(MSG_LOCAL_ONLY))
    );
}

#[tokio::test]
async fn remote_rejection_message_is_surfaced_and_preview_kept() {
    let file = png(64);
    let (mut dom, banner, _) = scanned();
    let remote = FakeRemote::with_marker("abc123");
    *remote.write_error.lock().unwrap() = Some(CommitError::Rejected {
        status: 403,
        message: "Resource not accessible by integration".to_string(),
    });
    let mut ed = editor(remote, Some(file.path().to_path_buf()));

    let outcome = ed.on_click(&mut dom, &mut ClickEvent::new(banner)).await;
    assert_eq!(
        outcome,
        EditOutcome::Failed {
            message: "Resource not accessible by integration".to_string()
        }
    );
    assert!(dom.attribute(banner, "src").unwrap().starts_with("data:"));
    assert_eq!(ed.notifier().notices[0].level, NoticeLevel::Failure);
}

#[tokio::test]
async fn network_failure_on_read_never_writes() {
    let file = png(64);
    let (mut dom, banner, _) = scanned();
    let remote = FakeRemote::default();
    *remote.read_error.lock().unwrap() = Some(CommitError::Network {
        op: "read",
        message: "Couldn't resolve host name".to_string(),
    });
    let mut ed = editor(remote, Some(file.path().to_path_buf()));

    let outcome = ed.on_click(&mut dom, &mut ClickEvent::new(banner)).await;
    assert!(matches!(outcome, EditOutcome::Failed { .. }));
    assert_eq!(ed.client().api().log().len(), 1);
    assert!(ed.client().api().requests().is_empty());
}

#[tokio::test]
async fn unreadable_selection_fails_before_preview() {
    let (mut dom, banner, _) = scanned();
    let mut ed = editor(FakeRemote::default(), Some(PathBuf::from("/nonexistent/pic.png")));

    let outcome = ed.on_click(&mut dom, &mut ClickEvent::new(banner)).await;
    assert!(matches!(outcome, EditOutcome::Failed { .. }));
    assert_eq!(dom.attribute(banner, "src").as_deref(), Some("/assets/images/banner.png"));
    assert!(ed.client().api().log().is_empty());
}

#[tokio::test]
async fn run_loop_scans_inserts_and_handles_clicks_in_order() {
    let file = png(64);
    let mut dom = page();
    let root = dom.root();
    let footer = dom.append_child(
        root,
        &NodeSnapshot::element("footer").child(
            NodeSnapshot::element("img")
                .attr("id", "logo")
                .attr("src", "/images/logo.png"),
        ),
    );
    let logo = dom.find_by_id("logo").unwrap();
    let mut ed = editor(FakeRemote::default(), Some(file.path().to_path_buf()));

    let (tx, rx) = mpsc::channel(8);
    tx.send(HostEvent::SubtreeInserted(root)).await.unwrap();
    tx.send(HostEvent::SubtreeInserted(footer)).await.unwrap();
    tx.send(HostEvent::Click(logo)).await.unwrap();
    drop(tx);

    ed.run(&mut dom, rx).await;

    assert_eq!(dom.click_listener_count(logo), 1);
    assert_eq!(
        ed.client().api().log(),
        vec![
            "read public/images/logo.png@main".to_string(),
            "write public/images/logo.png".to_string(),
        ]
    );
    assert_eq!(ed.notifier().notices, vec![Notice::success(MSG_SUCCESS)]);
}
