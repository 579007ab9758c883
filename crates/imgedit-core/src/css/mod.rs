//! CSS image-reference parsing for `background-image` values.
//!
//! Values are split into layers and each layer is classified, so callers get
//! the full candidate list and choose explicitly. The scanner and the editor
//! use [`first_url`]: the first `url(...)` reference wins, gradients and other
//! paint layers are ignored.

mod parse;

/// One layer of a `background-image` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLayer {
    /// `none` or an empty layer.
    None,
    /// `url(...)` with its argument unquoted and unescaped.
    Url(String),
    /// Any `*-gradient(...)`; carries the function name.
    Gradient(String),
    /// Another image function (`image-set`, `cross-fade`, ...) and the URLs nested in it.
    Function { name: String, urls: Vec<String> },
    /// Anything we do not recognize.
    Other(String),
}

/// Parses a (computed or inline) `background-image` value into its layers.
pub fn parse_image_layers(value: &str) -> Vec<ImageLayer> {
    let value = value.trim();
    if value.is_empty() {
        return Vec::new();
    }
    parse::split_top_level(value, ',')
        .into_iter()
        .map(parse::parse_layer)
        .collect()
}

/// Every image reference in `value`, in paint order (top layer first).
pub fn candidate_urls(value: &str) -> Vec<String> {
    parse_image_layers(value)
        .into_iter()
        .flat_map(|layer| match layer {
            ImageLayer::Url(u) => vec![u],
            ImageLayer::Function { urls, .. } => urls,
            _ => Vec::new(),
        })
        .collect()
}

/// The reference an editable background is identified by: the first `url(...)`.
pub fn first_url(value: &str) -> Option<String> {
    candidate_urls(value).into_iter().next()
}

/// `url("...")` value for writing a reference back into an inline style.
pub fn url_value(reference: &str) -> String {
    let escaped = reference.replace('\\', "\\\\").replace('"', "\\\"");
    format!("url(\"{}\")", escaped)
}
