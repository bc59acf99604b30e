//! Small helpers shared across the crawler: URL normalization, whitespace
//! cleanup, and string truncation for log lines.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Resolve a possibly-relative href against the site origin.
///
/// Listing and article markup mixes absolute URLs with site-relative paths
/// like `/actualidad/nota-123.html`. Absolute URLs pass through unchanged;
/// relative paths are joined onto the origin. Unresolvable hrefs yield `None`.
pub fn absolutize(origin: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    origin.join(href).ok().map(|u| u.to_string())
}

/// Collapse runs of whitespace (including newlines) into single spaces and
/// trim the ends. Returns `None` when nothing printable remains.
pub fn collapse_whitespace(s: &str) -> Option<String> {
    let cleaned = WHITESPACE_RUN.replace_all(s, " ").trim().to_string();
    if cleaned.is_empty() { None } else { Some(cleaned) }
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes with an ellipsis and byte count
/// indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut cut = max;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
    }
}
