//! Shared utility functions.

use std::sync::LazyLock;

use regex::Regex;

/// URLs that already carry a scheme.
static ABSOLUTE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]{3,8}://").expect("invalid absolute URL regex"));

/// Resolve `url` against an optional base URL.
///
/// Absolute URLs and fragment-only references are returned unchanged; any
/// other URL is joined to the base with a single `/`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(resolve_url(Some("http://a.com/docs"), "img/x.png"), "http://a.com/docs/img/x.png");
/// assert_eq!(resolve_url(Some("http://a.com/"), "/x.png"), "http://a.com/x.png");
/// assert_eq!(resolve_url(None, "x.png"), "x.png");
/// ```
pub(crate) fn resolve_url(base: Option<&str>, url: &str) -> String {
    let Some(base) = base else {
        return url.to_owned();
    };
    if url.starts_with('#') || ABSOLUTE_URL.is_match(url) {
        return url.to_owned();
    }
    let base = base.trim_end_matches('/');
    let path = url.trim_start_matches('/');
    format!("{base}/{path}")
}
