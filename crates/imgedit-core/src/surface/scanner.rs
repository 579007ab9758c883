use tokio::sync::mpsc;

use super::{displayed_reference, marked_kind, EditableSurface, SurfaceKind, AFFORDANCE_CLASS, MARKER_ATTR};
use crate::dom::Dom;
use crate::repo_path::PathResolver;

/// Marks editable surfaces. Holds the resolver that decides what is "inside
/// the asset directory".
#[derive(Debug, Clone)]
pub struct Scanner {
    resolver: PathResolver,
}

impl Scanner {
    pub fn new(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Kind `node` would be marked as, ignoring any existing marker.
    pub fn classify<D: Dom>(&self, dom: &D, node: D::Node) -> Option<SurfaceKind> {
        if !dom.is_element(node) {
            return None;
        }
        let qualifies = |kind| {
            displayed_reference(dom, node, kind)
                .map_or(false, |r| self.resolver.resolve(&r).is_some())
        };
        if dom.tag_name(node) == "img" && qualifies(SurfaceKind::Image) {
            return Some(SurfaceKind::Image);
        }
        if qualifies(SurfaceKind::Background) {
            return Some(SurfaceKind::Background);
        }
        None
    }

    /// Marks every qualifying, not yet processed node in `root`'s subtree
    /// (root included) and returns the newly marked surfaces.
    pub fn scan<D: Dom>(&self, dom: &mut D, root: D::Node) -> Vec<EditableSurface<D::Node>> {
        let mut marked = Vec::new();
        for node in dom.subtree(root) {
            if marked_kind(dom, node).is_some() {
                continue;
            }
            let Some(kind) = self.classify(dom, node) else {
                continue;
            };
            dom.set_attribute(node, MARKER_ATTR, kind.as_str());
            dom.add_class(node, AFFORDANCE_CLASS);
            dom.set_style(node, "cursor", "pointer");
            dom.add_click_listener(node);
            marked.push(EditableSurface {
                node,
                kind,
                processed: true,
            });
        }
        if !marked.is_empty() {
            tracing::debug!(count = marked.len(), "marked editable surfaces");
        }
        marked
    }

    /// Surfaces already marked in `root`'s subtree.
    pub fn surfaces<D: Dom>(&self, dom: &D, root: D::Node) -> Vec<EditableSurface<D::Node>> {
        dom.subtree(root)
            .into_iter()
            .filter_map(|node| {
                marked_kind(dom, node).map(|kind| EditableSurface {
                    node,
                    kind,
                    processed: true,
                })
            })
            .collect()
    }

    /// Re-scans each inserted subtree until the host closes the channel.
    /// Returns the total number of surfaces marked.
    pub async fn watch<D: Dom>(&self, dom: &mut D, mut inserted: mpsc::Receiver<D::Node>) -> usize {
        let mut total = 0;
        while let Some(node) = inserted.recv().await {
            if !dom.is_element(node) {
                continue;
            }
            total += self.scan(dom, node).len();
        }
        total
    }
}
