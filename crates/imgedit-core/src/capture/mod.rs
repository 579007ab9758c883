//! Capture service: file chooser, data-URL encoding and the optimistic preview.
//!
//! Encoding is independent of where the result goes: callers get a [`DataUrl`]
//! and decide whether to show it, send its [`DataUrl::payload`], or both.

mod data_url;

pub use data_url::{raw_payload, DataUrl};

use base64::Engine;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::css;
use crate::dom::{ClickEvent, Dom};
use crate::surface::SurfaceKind;

/// MIME filter handed to the file chooser.
pub const IMAGE_ACCEPT: &str = "image/*";

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("{} is not an image file (unknown extension and content)", .0.display())]
    NotAnImage(PathBuf),
    #[error("read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Transient file-selection control. `None` means the user dismissed it.
pub trait FilePicker {
    fn choose(&mut self, accept: &str) -> Option<PathBuf>;
}

/// Image MIME type for a file name, by extension.
pub fn image_mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" | "jpe" | "jfif" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "tif" | "tiff" => "image/tiff",
        "heic" | "heif" => "image/heic",
        _ => return None,
    };
    Some(mime)
}

/// Image MIME type from the leading bytes, for files whose name says nothing.
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    let mime = match bytes {
        [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, ..] => "image/png",
        [0xff, 0xd8, 0xff, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        [b'B', b'M', ..] => "image/bmp",
        [0x00, 0x00, 0x01, 0x00, ..] => "image/x-icon",
        [b'I', b'I', 0x2a, 0x00, ..] | [b'M', b'M', 0x00, 0x2a, ..] => "image/tiff",
        [_, _, _, _, b'f', b't', b'y', b'p', brand @ ..] => match brand.get(..4)? {
            b"avif" | b"avis" => "image/avif",
            b"heic" | b"heix" | b"mif1" | b"msf1" => "image/heic",
            _ => return None,
        },
        _ => return None,
    };
    Some(mime)
}

/// Reads `path` and encodes it as a base64 data URL.
pub async fn read_as_data_url(path: &Path) -> Result<DataUrl, CaptureError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| CaptureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mime = image_mime_for(path)
        .or_else(|| sniff_image_mime(&bytes))
        .ok_or_else(|| CaptureError::NotAnImage(path.to_path_buf()))?;
    let payload = base64::engine::general_purpose::STANDARD.encode(&bytes);
    tracing::debug!(path = %path.display(), bytes = bytes.len(), mime, "captured file");
    Ok(DataUrl::new(mime, payload))
}

/// Suppresses the click and asks the picker for a replacement image.
pub struct CaptureService<P> {
    picker: P,
}

impl<P: FilePicker> CaptureService<P> {
    pub fn new(picker: P) -> Self {
        Self { picker }
    }

    pub fn picker_mut(&mut self) -> &mut P {
        &mut self.picker
    }

    /// `Ok(None)` when the chooser was dismissed.
    pub async fn capture<N>(&mut self, event: &mut ClickEvent<N>) -> Result<Option<DataUrl>, CaptureError> {
        event.prevent_default();
        event.stop_propagation();

        let Some(path) = self.picker.choose(IMAGE_ACCEPT) else {
            tracing::debug!("file chooser dismissed");
            return Ok(None);
        };
        read_as_data_url(&path).await.map(Some)
    }
}

/// Shows `data` on the surface immediately, before any remote confirmation.
pub fn apply_preview<D: Dom>(dom: &mut D, node: D::Node, kind: SurfaceKind, data: &DataUrl) {
    match kind {
        SurfaceKind::Image => dom.set_attribute(node, "src", &data.to_string()),
        SurfaceKind::Background => {
            dom.set_style(node, "background-image", &css::url_value(&data.to_string()))
        }
    }
}
