//! Host DOM port.
//!
//! The pipeline never touches a concrete DOM: a host (browser binding, test
//! harness, the JSON snapshot host in [`memory`]) implements [`Dom`] and feeds
//! [`HostEvent`]s into the editor.

pub mod memory;

pub use memory::{MemoryDom, NodeId, NodeSnapshot, SnapshotError};

use std::fmt::Debug;
use std::hash::Hash;

/// Operations the scanner, capture service and editor need from the page.
pub trait Dom {
    type Node: Copy + Eq + Hash + Debug;

    /// False for text/comment nodes.
    fn is_element(&self, node: Self::Node) -> bool;

    /// `root` and all of its descendants, in document order.
    fn subtree(&self, root: Self::Node) -> Vec<Self::Node>;

    /// Lowercase tag name; empty for non-elements.
    fn tag_name(&self, node: Self::Node) -> String;

    fn attribute(&self, node: Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str);

    /// Resolved `background-image` value, if the element paints one.
    fn computed_background_image(&self, node: Self::Node) -> Option<String>;

    /// Sets an inline style property.
    fn set_style(&mut self, node: Self::Node, property: &str, value: &str);

    fn add_class(&mut self, node: Self::Node, class: &str);

    /// Routes clicks on `node` to the editor (the host turns them into [`HostEvent::Click`]).
    fn add_click_listener(&mut self, node: Self::Node);
}

/// Something the host reports to the editor loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent<N> {
    /// A subtree was inserted into the page (e.g. header/footer loaded later).
    SubtreeInserted(N),
    /// An element with a click listener was clicked.
    Click(N),
}

/// A click on an editable surface. The capture service suppresses its default
/// action and propagation; the host honors both flags after dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent<N> {
    pub target: N,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl<N> ClickEvent<N> {
    pub fn new(target: N) -> Self {
        Self {
            target,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}
