//! CSRF token discovery.

use std::sync::LazyLock;

use regex::Regex;

/// Default header that carries the CSRF token on outgoing requests.
pub const DEFAULT_CSRF_HEADER: &str = "X-CSRF-TOKEN";

/// `<meta name="csrf-token" content="...">` as rendered by the panel layout.
static CSRF_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+name\s*=\s*["']csrf-token["']\s+content\s*=\s*["']([^"']+)["']"#)
        .expect("Invalid regex")
});

/// Returns the first CSRF token found in a page, if any.
pub fn extract_csrf_token(html: &str) -> Option<String> {
    CSRF_META_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_meta_token() {
        let html = r#"<head><meta charset="utf-8"><meta name="csrf-token" content="abc123"></head>"#;
        assert_eq!(extract_csrf_token(html).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_first_match_wins() {
        let html = r#"<meta name="csrf-token" content="one"><meta name="csrf-token" content="two">"#;
        assert_eq!(extract_csrf_token(html).as_deref(), Some("one"));
    }

    #[test]
    fn test_missing_token() {
        assert!(extract_csrf_token("<html><head></head></html>").is_none());
        assert!(extract_csrf_token(r#"<meta name="csrf-token" content="">"#).is_none());
    }
}
