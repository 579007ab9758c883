//! `imgedit scan <snapshot>` – list editable surfaces.

use anyhow::Result;
use imgedit_core::config::EditorConfig;
use imgedit_core::dom::{Dom, MemoryDom};
use imgedit_core::surface::displayed_reference;
use std::path::Path;

pub fn run_scan(cfg: &EditorConfig, snapshot: &Path) -> Result<()> {
    let scanner = super::scanner(cfg)?;
    let mut dom = MemoryDom::load(snapshot)?;
    let root = dom.root();
    scanner.scan(&mut dom, root);

    let surfaces = scanner.surfaces(&dom, root);
    if surfaces.is_empty() {
        println!("No editable images found.");
        return Ok(());
    }
    println!("{:<16} {:<11} {:<40} {}", "ID", "KIND", "REFERENCE", "REPO PATH");
    for s in surfaces {
        let id = dom.attribute(s.node, "id").unwrap_or_else(|| "-".to_string());
        let reference = displayed_reference(&dom, s.node, s.kind).unwrap_or_default();
        let path = scanner
            .resolver()
            .resolve(&reference)
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:<16} {:<11} {:<40} {}", id, s.kind.as_str(), reference, path);
    }
    Ok(())
}
