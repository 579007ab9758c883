//! Path resolution: displayed image reference → canonical repository path.
//!
//! A reference may be an absolute URL, a URL relative to the site, or a bare
//! repository-relative string. Data URLs never resolve. Resolution is pure:
//! the site origin and asset layout are fixed when the resolver is built.

mod layout;

pub use layout::AssetLayout;

use std::fmt;
use url::Url;

/// Path relative to the repository root, always inside the managed asset tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoPath(String);

impl RepoPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments, for building request URLs.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RepoPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// True for `data:` references (already-inlined image content).
pub fn is_data_url(reference: &str) -> bool {
    reference
        .trim_start()
        .get(..5)
        .map_or(false, |p| p.eq_ignore_ascii_case("data:"))
}

/// Maps displayed references to repository paths for one site.
#[derive(Debug, Clone)]
pub struct PathResolver {
    origin: Url,
    layout: AssetLayout,
}

impl PathResolver {
    pub fn new(site_origin: &str, layout: AssetLayout) -> anyhow::Result<Self> {
        let origin = Url::parse(site_origin)
            .map_err(|e| anyhow::anyhow!("invalid site origin {:?}: {}", site_origin, e))?;
        Ok(Self { origin, layout })
    }

    pub fn layout(&self) -> &AssetLayout {
        &self.layout
    }

    /// Resolves `reference` to a repository path, or `None` when it does not
    /// point into the managed asset tree.
    pub fn resolve(&self, reference: &str) -> Option<RepoPath> {
        let reference = reference.trim();
        if reference.is_empty() || is_data_url(reference) {
            return None;
        }
        if let Some(bare) = self.resolve_bare(reference) {
            return Some(bare);
        }

        let url = self.origin.join(reference).ok()?;
        let decoded = decode_path(url.path())?;
        let located = self.layout.locate(&decoded)?;
        is_clean(&located).then(|| RepoPath(located))
    }

    /// A bare repository-relative reference (`public/assets/images/x.png`) is
    /// taken as-is, minus any query or fragment.
    fn resolve_bare(&self, reference: &str) -> Option<RepoPath> {
        if reference.starts_with('/') || Url::parse(reference).is_ok() {
            return None;
        }
        let reference = reference.strip_prefix("./").unwrap_or(reference);
        let path = reference
            .split(|c| c == '?' || c == '#')
            .next()
            .unwrap_or(reference);
        let rest = path.strip_prefix(self.layout.root())?.strip_prefix('/')?;
        if !is_clean(path) || !self.layout.has_marker(&format!("/{}", rest)) {
            return None;
        }
        Some(RepoPath(path.to_string()))
    }
}

/// Percent-decodes each segment of a URL path. A segment that decodes to a
/// separator or a dot segment would change the path's shape, so it fails.
fn decode_path(path: &str) -> Option<String> {
    let mut out = Vec::new();
    for segment in path.split('/') {
        let decoded = urlencoding::decode(segment).ok()?;
        if decoded.contains('/') || decoded.contains('\\') || decoded == "." || decoded == ".." {
            return None;
        }
        out.push(decoded.into_owned());
    }
    Some(out.join("/"))
}

/// No empty, `.` or `..` segments.
fn is_clean(path: &str) -> bool {
    path.split('/').all(|s| !s.is_empty() && s != "." && s != "..")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> PathResolver {
        PathResolver::new("https://www.example.com", AssetLayout::default()).unwrap()
    }

    #[test]
    fn absolute_path_reference() {
        let r = resolver();
        assert_eq!(
            r.resolve("/assets/images/banner.png").unwrap().as_str(),
            "public/assets/images/banner.png"
        );
    }

    #[test]
    fn absolute_url_on_any_host() {
        let r = resolver();
        assert_eq!(
            r.resolve("https://cdn.example.net/assets/images/hero.jpg?v=3#top")
                .unwrap()
                .as_str(),
            "public/assets/images/hero.jpg"
        );
    }

    #[test]
    fn relative_reference_resolves_against_origin() {
        let r = resolver();
        assert_eq!(
            r.resolve("images/team/alice.webp").unwrap().as_str(),
            "public/images/team/alice.webp"
        );
        assert_eq!(
            r.resolve("../assets/images/x.png").unwrap().as_str(),
            "public/assets/images/x.png"
        );
    }

    #[test]
    fn bare_repo_path_is_returned_directly() {
        let r = resolver();
        assert_eq!(
            r.resolve("public/assets/images/banner.png").unwrap().as_str(),
            "public/assets/images/banner.png"
        );
    }

    #[test]
    fn bare_repo_path_with_traversal_goes_through_url_resolution() {
        let r = resolver();
        assert_eq!(r.resolve("public/assets/images/../../secret.png"), None);
    }

    #[test]
    fn bare_repo_path_with_later_marker_first_is_kept() {
        let r = resolver();
        assert_eq!(
            r.resolve("public/images/assets/images/x.png").unwrap().as_str(),
            "public/images/assets/images/x.png"
        );
        assert_eq!(
            r.resolve("./public/images/team/a.png?v=2").unwrap().as_str(),
            "public/images/team/a.png"
        );
    }

    #[test]
    fn bare_repo_path_without_marker_is_not_bare() {
        let r = resolver();
        assert_eq!(r.resolve("public/css/x.png"), None);
    }

    #[test]
    fn encoded_separators_cannot_escape_the_asset_tree() {
        let r = resolver();
        assert_eq!(r.resolve("/assets/images/..%2F..%2Fsecret.png"), None);
        assert_eq!(r.resolve("/assets/images/..%2F..%2F..%2Fsecret.png"), None);
        assert_eq!(r.resolve("/images/a%2Fb.png"), None);
        assert_eq!(r.resolve("/images/a%5Cb.png"), None);
        assert_eq!(r.resolve("https://cdn.example.net/images/%2e%2e/%2e%2e/x.png"), None);
    }

    #[test]
    fn empty_segments_are_rejected() {
        let r = resolver();
        assert_eq!(r.resolve("/assets/images//x.png"), None);
    }

    #[test]
    fn percent_encoded_names_are_decoded() {
        let r = resolver();
        assert_eq!(
            r.resolve("/assets/images/summer%20sale.png").unwrap().as_str(),
            "public/assets/images/summer sale.png"
        );
    }

    #[test]
    fn data_urls_never_resolve() {
        let r = resolver();
        assert_eq!(r.resolve("data:image/png;base64,iVBORw0KGgo="), None);
        assert_eq!(r.resolve("DATA:image/png;base64,/assets/images/x.png"), None);
    }

    #[test]
    fn references_without_marker_are_unresolvable() {
        let r = resolver();
        assert_eq!(r.resolve("/css/bg.png"), None);
        assert_eq!(r.resolve("https://example.com/photo.jpg"), None);
        assert_eq!(r.resolve(""), None);
        assert_eq!(r.resolve("   "), None);
    }

    #[test]
    fn invalid_origin_is_rejected() {
        assert!(PathResolver::new("not a url", AssetLayout::default()).is_err());
    }

    #[test]
    fn segments_skip_empty_parts() {
        let r = resolver();
        let p = r.resolve("/images/a/b.png").unwrap();
        assert_eq!(p.segments().collect::<Vec<_>>(), vec!["public", "images", "a", "b.png"]);
    }
}
