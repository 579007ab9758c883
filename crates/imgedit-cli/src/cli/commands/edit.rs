//! `imgedit edit <snapshot> --element <id> --file <path>` – replace one image and commit it.

use anyhow::{Context, Result};
use imgedit_core::capture::FilePicker;
use imgedit_core::config::EditorConfig;
use imgedit_core::content_api::{CommitClient, GithubContentApi};
use imgedit_core::dom::{ClickEvent, MemoryDom};
use imgedit_core::editor::{EditOutcome, Editor, Notice, NoticeLevel, Notifier};
use imgedit_core::session::Session;
use imgedit_core::surface::marked_kind;
use std::path::{Path, PathBuf};

/// Answers the chooser with the file given on the command line, once.
struct ArgPicker(Option<PathBuf>);

impl FilePicker for ArgPicker {
    fn choose(&mut self, _accept: &str) -> Option<PathBuf> {
        self.0.take()
    }
}

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Success => println!("{}", notice),
            NoticeLevel::LocalOnly | NoticeLevel::Failure => eprintln!("{}", notice),
        }
    }
}

pub async fn run_edit(
    cfg: &EditorConfig,
    snapshot: &Path,
    element: &str,
    file: &Path,
    write: bool,
) -> Result<()> {
    let scanner = super::scanner(cfg)?;
    let mut dom = MemoryDom::load(snapshot)?;
    let root = dom.root();
    scanner.scan(&mut dom, root);

    let node = dom
        .find_by_id(element)
        .with_context(|| format!("no element with id {:?} in {}", element, snapshot.display()))?;
    if marked_kind(&dom, node).is_none() {
        anyhow::bail!("element {:?} is not an editable image", element);
    }

    let session = Session::load(cfg)?;
    let api = GithubContentApi::new(&cfg.api_base, session.credentials.clone(), cfg.http())?;
    let client = CommitClient::new(api, &session, cfg);
    let mut editor = Editor::new(
        scanner,
        client,
        ArgPicker(Some(file.to_path_buf())),
        ConsoleNotifier,
    );

    let outcome = editor.on_click(&mut dom, &mut ClickEvent::new(node)).await;

    if write && !matches!(outcome, EditOutcome::Cancelled | EditOutcome::NotEditable) {
        dom.save(snapshot)?;
        tracing::info!(snapshot = %snapshot.display(), "snapshot updated");
    }

    match outcome {
        EditOutcome::Committed {
            path,
            created,
            commit_sha,
        } => {
            let verb = if created { "Created" } else { "Updated" };
            println!(
                "{} {} on {} (commit {})",
                verb,
                path,
                session.branch,
                commit_sha.as_deref().unwrap_or("?")
            );
            Ok(())
        }
        EditOutcome::LocalOnly => Ok(()),
        EditOutcome::Cancelled | EditOutcome::NotEditable => Ok(()),
        EditOutcome::Failed { message } => anyhow::bail!("edit failed: {}", message),
    }
}
