//! In-memory DOM built from a JSON page snapshot.
//!
//! Snapshot format: `{"tag": "div", "attrs": {...}, "style": {...}, "children": [...]}`,
//! or `{"text": "..."}` for text nodes. The computed style of a node is its
//! snapshot style (no cascade).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::Dom;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("write snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialized form of one node and its subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    pub fn element(tag: &str) -> Self {
        Self {
            tag: Some(tag.to_string()),
            ..Self::default()
        }
    }

    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn style(mut self, property: &str, value: &str) -> Self {
        self.style.insert(property.to_string(), value.to_string());
        self
    }

    pub fn child(mut self, child: NodeSnapshot) -> Self {
        self.children.push(child);
        self
    }
}

/// Index of a node in a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct NodeData {
    tag: Option<String>,
    text: Option<String>,
    attrs: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    children: Vec<NodeId>,
    click_listeners: u32,
}

#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl MemoryDom {
    pub fn from_snapshot(snapshot: &NodeSnapshot) -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        dom.root = dom.insert(snapshot);
        dom
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let bytes = std::fs::read(path).map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot: NodeSnapshot = serde_json::from_slice(&bytes)?;
        Ok(Self::from_snapshot(&snapshot))
    }

    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let json = serde_json::to_vec_pretty(&self.to_snapshot())?;
        std::fs::write(path, json).map_err(|source| SnapshotError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Inserts `snapshot` as the last child of `parent`; returns the new subtree root.
    pub fn append_child(&mut self, parent: NodeId, snapshot: &NodeSnapshot) -> NodeId {
        let id = self.insert(snapshot);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// First element (document order) whose `id` attribute equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.subtree(self.root)
            .into_iter()
            .find(|n| self.nodes[n.0].attrs.get("id").map(String::as_str) == Some(id))
    }

    pub fn click_listener_count(&self, node: NodeId) -> u32 {
        self.nodes[node.0].click_listeners
    }

    pub fn style_of(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes[node.0].style.get(property).map(String::as_str)
    }

    pub fn to_snapshot(&self) -> NodeSnapshot {
        self.snapshot_of(self.root)
    }

    fn snapshot_of(&self, id: NodeId) -> NodeSnapshot {
        let n = &self.nodes[id.0];
        NodeSnapshot {
            tag: n.tag.clone(),
            text: n.text.clone(),
            attrs: n.attrs.clone(),
            style: n.style.clone(),
            children: n.children.iter().map(|c| self.snapshot_of(*c)).collect(),
        }
    }

    fn insert(&mut self, snapshot: &NodeSnapshot) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            tag: snapshot.tag.as_ref().map(|t| t.to_ascii_lowercase()),
            text: snapshot.text.clone(),
            attrs: snapshot.attrs.clone(),
            style: snapshot.style.clone(),
            children: Vec::new(),
            click_listeners: 0,
        });
        let children: Vec<NodeId> = snapshot.children.iter().map(|c| self.insert(c)).collect();
        self.nodes[id.0].children = children;
        id
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn is_element(&self, node: NodeId) -> bool {
        self.nodes[node.0].tag.is_some()
    }

    fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.nodes[node.0].tag.clone().unwrap_or_default()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes[node.0].attrs.get(name).cloned()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn computed_background_image(&self, node: NodeId) -> Option<String> {
        self.nodes[node.0]
            .style
            .get("background-image")
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        self.nodes[node.0]
            .style
            .insert(property.to_string(), value.to_string());
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        let attrs = &mut self.nodes[node.0].attrs;
        let current = attrs.get("class").cloned().unwrap_or_default();
        if current.split_whitespace().any(|c| c == class) {
            return;
        }
        let updated = if current.trim().is_empty() {
            class.to_string()
        } else {
            format!("{} {}", current.trim(), class)
        };
        attrs.insert("class".to_string(), updated);
    }

    fn add_click_listener(&mut self, node: NodeId) {
        self.nodes[node.0].click_listeners += 1;
    }
}
