//! Base URL normalisation and redirect target resolution.

use url::Url;

use crate::error::FetchError;

/// Normalises a base URL: trims whitespace, adds `https://` when no scheme
/// is given, and drops trailing slashes.
pub fn normalize_base_url(raw: &str) -> Result<String, FetchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FetchError::InvalidUrl("empty base URL".to_string()));
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&with_scheme)
        .map_err(|e| FetchError::InvalidUrl(format!("{with_scheme}: {e}")))?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(FetchError::InvalidUrl(format!("{with_scheme}: no host")));
    }

    Ok(with_scheme.trim_end_matches('/').to_string())
}

/// Returns true if `target` already carries a scheme.
pub fn is_absolute(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}

/// Resolves a request path or `Location` value against the base URL.
///
/// Relative targets are always joined onto `base`, never onto the path of
/// the URL that issued the redirect: `foo` and `/foo` both become
/// `{base}/foo`. The panel issues redirects in this style.
pub fn resolve_against_base(base: &str, target: &str) -> String {
    if is_absolute(target) {
        return target.to_string();
    }

    if let Some(rest) = target.strip_prefix("//") {
        let scheme = base.split_once("://").map_or("https", |(scheme, _)| scheme);
        return format!("{scheme}://{rest}");
    }

    let base = base.trim_end_matches('/');
    if target.is_empty() {
        base.to_string()
    } else if target.starts_with('/') {
        format!("{base}{target}")
    } else {
        format!("{base}/{target}")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_scheme_and_trims() {
        assert_eq!(
            normalize_base_url("  panel.example.com/ ").unwrap(),
            "https://panel.example.com"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8000///").unwrap(),
            "http://localhost:8000"
        );
        assert_eq!(
            normalize_base_url("https://host/sub/").unwrap(),
            "https://host/sub"
        );
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize_base_url("").is_err());
        assert!(normalize_base_url("   ").is_err());
        assert!(normalize_base_url("https://").is_err());
    }

    #[test]
    fn test_resolve_absolute_is_untouched() {
        assert_eq!(
            resolve_against_base("https://a.test", "https://b.test/x"),
            "https://b.test/x"
        );
    }

    #[test]
    fn test_resolve_relative_uses_base_not_request_path() {
        let base = "https://a.test";
        assert_eq!(resolve_against_base(base, "/foo"), "https://a.test/foo");
        assert_eq!(resolve_against_base(base, "foo"), "https://a.test/foo");
    }

    #[test]
    fn test_resolve_keeps_base_path_prefix() {
        assert_eq!(
            resolve_against_base("https://a.test/panel", "/login"),
            "https://a.test/panel/login"
        );
    }

    #[test]
    fn test_resolve_scheme_relative() {
        assert_eq!(
            resolve_against_base("http://a.test", "//b.test/x"),
            "http://b.test/x"
        );
    }
}
