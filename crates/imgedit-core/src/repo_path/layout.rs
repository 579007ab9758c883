//! Asset layout: repository root segment and the URL markers that identify managed images.

use serde::{Deserialize, Serialize};

/// Where managed images live in the repository and how they show up in URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetLayout {
    /// Top-level repository directory the site is built from (e.g. `public`).
    pub root: String,
    /// Path segments that mark a reference as pointing into the asset tree,
    /// searched in order (e.g. `/assets/images/` before `/images/`).
    pub markers: Vec<String>,
}

impl Default for AssetLayout {
    fn default() -> Self {
        Self {
            root: "public".to_string(),
            markers: vec!["/assets/images/".to_string(), "/images/".to_string()],
        }
    }
}

impl AssetLayout {
    /// Root without surrounding slashes.
    pub fn root(&self) -> &str {
        self.root.trim_matches('/')
    }

    /// Finds the first configured marker in `path` and returns the repository path
    /// (`<root>` + marker onward). The marker must be followed by a file name.
    pub fn locate(&self, path: &str) -> Option<String> {
        self.markers
            .iter()
            .map(|m| normalize_marker(m))
            .filter(|m| m.len() > 1)
            .find_map(|marker| {
                let idx = path.find(marker.as_str())?;
                let suffix = &path[idx..];
                if suffix.len() <= marker.len() {
                    return None;
                }
                Some(format!("{}{}", self.root(), suffix))
            })
    }

    /// True if `path` contains any configured marker.
    pub fn has_marker(&self, path: &str) -> bool {
        self.locate(path).is_some()
    }
}

/// Markers are matched as whole segments: force a leading and trailing slash.
fn normalize_marker(marker: &str) -> String {
    let inner = marker.trim_matches('/');
    if inner.is_empty() {
        return "/".to_string();
    }
    format!("/{}/", inner)
}
