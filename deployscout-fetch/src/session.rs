//! Per-invocation session state.
//!
//! A [`Session`] is an immutable handle (base URL) wrapped around a mutable
//! store (cookie jar, CSRF token) and a write-once slot for the resolved
//! resource triple. Every mutation goes through a method that takes the
//! store lock, so concurrent requests see a single write order.

use std::sync::{OnceLock, PoisonError, RwLock};

use deployscout_core::ResourceTriple;
use tracing::debug;

use crate::error::FetchError;

// ============================================================================
// Cookie Jar
// ============================================================================

/// Ordered cookie store keyed by cookie name.
///
/// A `Set-Cookie` for a known name replaces the value in place; names the
/// server never reissues keep their earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    entries: Vec<(String, String)>,
}

impl CookieJar {
    /// Creates an empty jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one `Set-Cookie` header value into the jar.
    ///
    /// Only the leading `name=value` pair is kept; attributes such as
    /// `Path` or `Expires` are discarded. Returns the cookie name when the
    /// header was usable.
    pub fn apply_set_cookie(&mut self, header: &str) -> Option<String> {
        let pair = header.split(';').next()?.trim();
        let (name, value) = pair.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.set(name, value.trim());
        Some(name.to_string())
    }

    /// Sets a cookie, replacing any earlier value for the same name.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((name.to_string(), value.to_string())),
        }
    }

    /// Returns the value held for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Number of cookies held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no cookies are held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds the `Cookie` request header, or `None` for an empty jar.
    pub fn header_value(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        Some(
            self.entries
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

// ============================================================================
// Session
// ============================================================================

#[derive(Debug, Default)]
struct SessionState {
    cookies: CookieJar,
    csrf_token: Option<String>,
}

/// Mutable per-invocation state shared by every request of one command.
#[derive(Debug)]
pub struct Session {
    base_url: String,
    state: RwLock<SessionState>,
    resources: OnceLock<ResourceTriple>,
}

impl Session {
    /// Creates a session for an already normalised base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            state: RwLock::new(SessionState::default()),
            resources: OnceLock::new(),
        }
    }

    /// Normalised base URL (scheme-qualified, no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Snapshot of the cookie jar.
    pub fn cookies(&self) -> CookieJar {
        self.read(|state| state.cookies.clone())
    }

    /// `Cookie` header for the next request, if any cookies are held.
    pub fn cookie_header(&self) -> Option<String> {
        self.read(|state| state.cookies.header_value())
    }

    /// CSRF token currently held.
    pub fn csrf_token(&self) -> Option<String> {
        self.read(|state| state.csrf_token.clone())
    }

    /// Folds a batch of `Set-Cookie` header values into the jar under one lock.
    pub fn apply_cookies<'a, I>(&self, headers: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.write(|state| {
            for header in headers {
                if let Some(name) = state.cookies.apply_set_cookie(header) {
                    debug!(cookie = %name, "Stored cookie");
                }
            }
        });
    }

    /// Replaces the held CSRF token.
    pub fn set_csrf_token(&self, token: Option<String>) {
        self.write(|state| state.csrf_token = token);
    }

    /// Resolved resource triple, if discovery or the caller has set one.
    pub fn resources(&self) -> Option<&ResourceTriple> {
        self.resources.get()
    }

    /// Records the resolved resource triple.
    ///
    /// The triple is fixed for the rest of the invocation: setting the same
    /// value again is a no-op, a different value is rejected.
    pub fn resolve_resources(&self, triple: ResourceTriple) -> Result<&ResourceTriple, FetchError> {
        let held = self.resources.get_or_init(|| triple.clone());
        if *held == triple {
            Ok(held)
        } else {
            Err(FetchError::ResourcesAlreadyResolved {
                existing: held.clone(),
                requested: triple,
            })
        }
    }

    fn read<T>(&self, f: impl FnOnce(&SessionState) -> T) -> T {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write<T>(&self, f: impl FnOnce(&mut SessionState) -> T) -> T {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_cookie_discards_attributes() {
        let mut jar = CookieJar::new();
        jar.apply_set_cookie("session=abc; Path=/; HttpOnly; Expires=Wed, 21 Oct 2026 07:28:00 GMT");
        assert_eq!(jar.get("session"), Some("abc"));
        assert_eq!(jar.header_value().as_deref(), Some("session=abc"));
    }

    #[test]
    fn test_last_write_wins_in_place() {
        let mut jar = CookieJar::new();
        jar.apply_set_cookie("a=1");
        jar.apply_set_cookie("b=2");
        jar.apply_set_cookie("a=3");
        assert_eq!(jar.header_value().as_deref(), Some("a=3; b=2"));
    }

    #[test]
    fn test_repeated_identical_headers_are_idempotent() {
        let mut once = CookieJar::new();
        once.apply_set_cookie("XSRF-TOKEN=t1; path=/");
        once.apply_set_cookie("panel_session=s1; path=/");

        let mut many = once.clone();
        for _ in 0..3 {
            many.apply_set_cookie("XSRF-TOKEN=t1; path=/");
            many.apply_set_cookie("panel_session=s1; path=/");
        }
        assert_eq!(once, many);
    }

    #[test]
    fn test_value_may_contain_equals() {
        let mut jar = CookieJar::new();
        jar.apply_set_cookie("token=eyJpdiI6Ik==; path=/");
        assert_eq!(jar.get("token"), Some("eyJpdiI6Ik=="));
    }

    #[test]
    fn test_unusable_headers_are_ignored() {
        let mut jar = CookieJar::new();
        assert!(jar.apply_set_cookie("").is_none());
        assert!(jar.apply_set_cookie("no-equals-sign").is_none());
        assert!(jar.apply_set_cookie("=orphan").is_none());
        assert!(jar.is_empty());
        assert!(jar.header_value().is_none());
    }

    #[test]
    fn test_session_csrf_roundtrip() {
        let session = Session::new("https://a.test");
        assert!(session.csrf_token().is_none());
        session.set_csrf_token(Some("abc123".into()));
        assert_eq!(session.csrf_token().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_session_apply_cookies_batch() {
        let session = Session::new("https://a.test");
        session.apply_cookies(["a=1; Path=/", "b=2"]);
        assert_eq!(session.cookie_header().as_deref(), Some("a=1; b=2"));
        assert_eq!(session.cookies().len(), 2);
    }

    #[test]
    fn test_resources_are_write_once() {
        let session = Session::new("https://a.test");
        let first = ResourceTriple::parse("p/e/a").unwrap();
        let other = ResourceTriple::parse("p/e/b").unwrap();

        assert!(session.resources().is_none());
        assert!(session.resolve_resources(first.clone()).is_ok());
        assert!(session.resolve_resources(first.clone()).is_ok());

        let err = session.resolve_resources(other).unwrap_err();
        assert!(matches!(err, FetchError::ResourcesAlreadyResolved { .. }));
        assert_eq!(session.resources(), Some(&first));
    }
}
