//! Path extension filter.
//!
//! Only HTML-like documents are worth prerendering. Paths ending in a static
//! asset extension (`.js`, `.woff`, `.png`, ...) go straight to the origin.

/// Returns true when the final segment of `path` has no extension or an
/// `.html`/`.htm` extension (case-insensitive).
pub fn is_prerenderable_extension(path: &str) -> bool {
    let basename = basename(path);

    if basename.is_empty() || basename == "." || basename == "/" {
        return true;
    }

    if !basename.contains('.') {
        return true;
    }

    // Covers multi-dot names such as index.whatever.html too.
    let lower = basename.to_ascii_lowercase();
    lower.ends_with(".html") || lower.ends_with(".htm")
}

/// Last path segment, ignoring trailing slashes. A path made only of
/// slashes collapses to "/".
fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.is_empty() { "" } else { "/" };
    }
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_root_are_prerenderable() {
        assert!(is_prerenderable_extension(""));
        assert!(is_prerenderable_extension("/"));
        assert!(is_prerenderable_extension("//"));
    }

    #[test]
    fn test_html_extensions() {
        assert!(is_prerenderable_extension("index.html"));
        assert!(is_prerenderable_extension("index.htm"));
        assert!(is_prerenderable_extension("/index.html"));
        assert!(is_prerenderable_extension("/index.htm"));
        assert!(is_prerenderable_extension("/deep/path.HTML"));
        assert!(is_prerenderable_extension("/deep/index.whatever.html"));
    }

    #[test]
    fn test_no_extension() {
        assert!(is_prerenderable_extension("root"));
        assert!(is_prerenderable_extension("/deep/path"));
        assert!(is_prerenderable_extension("/deep/path/"));
        assert!(is_prerenderable_extension("/v1.2/about"));
    }

    #[test]
    fn test_static_assets() {
        assert!(!is_prerenderable_extension("font.woff"));
        assert!(!is_prerenderable_extension("assets/font.woff"));
        assert!(!is_prerenderable_extension("/deep/path.woff"));
        assert!(!is_prerenderable_extension("/static/app.js"));
        assert!(!is_prerenderable_extension("/img/logo.PNG"));
        assert!(!is_prerenderable_extension("/page.html.bak"));
    }
}
