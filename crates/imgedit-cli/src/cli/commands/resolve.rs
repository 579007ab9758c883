//! `imgedit resolve <reference>` – show the repository path for a reference.

use anyhow::Result;
use imgedit_core::config::EditorConfig;
use imgedit_core::repo_path::PathResolver;

pub fn run_resolve(cfg: &EditorConfig, reference: &str) -> Result<()> {
    let resolver = PathResolver::new(&cfg.site_origin, cfg.assets.clone())?;
    match resolver.resolve(reference) {
        Some(path) => println!("{}", path),
        None => println!("unresolvable"),
    }
    Ok(())
}
