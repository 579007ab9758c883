//! Surface scanner: finds editable images in a subtree and wires them up.
//!
//! A node qualifies when it is an `<img>` whose `src` resolves into the asset
//! tree, or any element whose first background `url(...)` does. Marking is
//! idempotent: the marker attribute records the kind, and a marked node is
//! never visited twice, so each node gets at most one click listener.

mod scanner;

pub use scanner::Scanner;

use crate::css;
use crate::dom::Dom;

/// Attribute set on every processed surface; its value is the surface kind.
pub const MARKER_ATTR: &str = "data-editable-done";

/// Class that carries the "editable" affordance styling.
pub const AFFORDANCE_CLASS: &str = "editable-image";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// `<img>` element; the reference is its `src` attribute.
    Image,
    /// Element painting a CSS background image.
    Background,
}

impl SurfaceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceKind::Image => "image",
            SurfaceKind::Background => "background",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "image" => Some(SurfaceKind::Image),
            "background" => Some(SurfaceKind::Background),
            _ => None,
        }
    }
}

/// A processed node and how it shows its image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditableSurface<N> {
    pub node: N,
    pub kind: SurfaceKind,
    pub processed: bool,
}

/// Kind recorded on `node` by a previous scan, if any.
pub fn marked_kind<D: Dom>(dom: &D, node: D::Node) -> Option<SurfaceKind> {
    dom.attribute(node, MARKER_ATTR)
        .as_deref()
        .and_then(SurfaceKind::parse)
}

/// The reference the surface currently displays: `src` for images, the first
/// background `url(...)` otherwise.
pub fn displayed_reference<D: Dom>(dom: &D, node: D::Node, kind: SurfaceKind) -> Option<String> {
    match kind {
        SurfaceKind::Image => dom.attribute(node, "src").filter(|s| !s.trim().is_empty()),
        SurfaceKind::Background => dom
            .computed_background_image(node)
            .and_then(|v| css::first_url(&v)),
    }
}
