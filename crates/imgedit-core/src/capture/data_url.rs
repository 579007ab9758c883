//! `data:<mime>;base64,<payload>` strings.

use std::fmt;

use crate::repo_path::is_data_url;

/// Captured image content: shown as a data URL, transmitted as raw base64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    mime: String,
    payload: String,
}

impl DataUrl {
    pub fn new(mime: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            payload: payload.into(),
        }
    }

    /// Parses a base64 data URL. Non-base64 (percent-encoded) data URLs are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if !is_data_url(s) {
            return None;
        }
        let (header, payload) = s[5..].split_once(',')?;
        let mime = header.strip_suffix(";base64")?;
        Some(Self::new(mime, payload))
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// The base64 data without the `data:...;base64,` prefix.
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime, self.payload)
    }
}

/// Strips a data-URL prefix if present; raw base64 passes through unchanged.
pub fn raw_payload(s: &str) -> &str {
    if is_data_url(s) {
        s.split_once(',').map_or("", |(_, p)| p)
    } else {
        s
    }
}
