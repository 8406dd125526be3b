//! Session client settings.

use std::time::Duration;

use crate::csrf::DEFAULT_CSRF_HEADER;
use crate::error::FetchError;
use crate::location::normalize_base_url;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default redirect hop limit.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Browser-like user agent; the panel serves reduced markup to unknown clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Environment variables consulted for the base URL, in order.
pub const BASE_URL_ENV_VARS: &[&str] = &["DEPLOYSCOUT_URL", "PANEL_URL", "APP_URL"];

/// Settings for a [`SessionClient`](crate::SessionClient).
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Normalised base URL.
    pub base_url: String,
    /// Per-request timeout; `None` leaves it to the transport.
    pub timeout: Option<Duration>,
    /// Maximum redirect hops per request.
    pub max_redirects: usize,
    /// Skip TLS certificate validation (self-signed panels).
    pub accept_invalid_certs: bool,
    /// Header used to send the CSRF token.
    pub csrf_header: String,
    /// `User-Agent` of the baseline headers.
    pub user_agent: String,
}

impl ClientSettings {
    /// Creates settings for `base_url`, normalising it.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            accept_invalid_certs: false,
            csrf_header: DEFAULT_CSRF_HEADER.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the redirect hop limit.
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Disables certificate validation.
    pub fn with_invalid_certs_accepted(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Sets the CSRF header name.
    pub fn with_csrf_header(mut self, header: impl Into<String>) -> Self {
        self.csrf_header = header.into();
        self
    }
}
