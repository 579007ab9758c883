//! CLI command handlers, one per file.

mod edit;
mod login;
mod resolve;
mod scan;

pub use edit::run_edit;
pub use login::run_login;
pub use resolve::run_resolve;
pub use scan::run_scan;

use anyhow::Result;
use imgedit_core::config::EditorConfig;
use imgedit_core::repo_path::PathResolver;
use imgedit_core::surface::Scanner;

fn scanner(cfg: &EditorConfig) -> Result<Scanner> {
    Ok(Scanner::new(PathResolver::new(&cfg.site_origin, cfg.assets.clone())?))
}
