//! Fetch error types.

use std::error::Error as _;

use deployscout_core::ResourceTriple;
use thiserror::Error;

/// Error type for session client operations.
///
/// Ordinary non-2xx statuses are not errors; they come back as an
/// [`HttpResponse`](crate::HttpResponse) with the status set.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, refused connection, TLS, timeout).
    #[error("Request to {url} failed: {source}")]
    Transport {
        /// URL being requested.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// Redirect chain exceeded the configured limit.
    #[error("Too many redirects (limit {limit}) while requesting {url}")]
    TooManyRedirects {
        /// Configured limit.
        limit: usize,
        /// Last URL that answered with a redirect.
        url: String,
    },

    /// URL could not be parsed or normalised.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Header name or value is not valid HTTP.
    #[error("Invalid header {name}: {reason}")]
    InvalidHeader {
        /// Header name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Session already resolved a different resource triple.
    #[error("Resources already resolved to {existing}, refusing to switch to {requested}")]
    ResourcesAlreadyResolved {
        /// Triple held by the session.
        existing: ResourceTriple,
        /// Triple that was offered.
        requested: ResourceTriple,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl FetchError {
    /// Returns true for failures to reach the host at all (DNS or connect).
    ///
    /// Timeouts and TLS failures after connecting are not included.
    pub fn is_unreachable(&self) -> bool {
        let Self::Transport { source, .. } = self else {
            return false;
        };

        if source.is_connect() {
            return true;
        }

        // Resolver failures surface as nested errors depending on the platform.
        let mut cause = source.source();
        while let Some(err) = cause {
            let message = err.to_string().to_lowercase();
            if message.contains("dns error")
                || message.contains("failed to lookup address")
                || message.contains("name or service not known")
                || message.contains("connection refused")
            {
                return true;
            }
            cause = err.source();
        }
        false
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_transport_errors_are_reachable() {
        assert!(!FetchError::InvalidUrl("x".into()).is_unreachable());
        let err = FetchError::TooManyRedirects {
            limit: 10,
            url: "https://a".into(),
        };
        assert!(!err.is_unreachable());
        assert!(err.to_string().contains("limit 10"));
    }
}
