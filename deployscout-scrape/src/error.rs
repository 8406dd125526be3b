//! Scrape error types.

use deployscout_fetch::{BASE_URL_ENV_VARS, FetchError};
use thiserror::Error;

/// Error type for the login handshake.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The panel answered with its known failure phrase.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The base URL does not resolve or refuses connections.
    #[error("Cannot reach {base_url}: {source}\n{guidance}")]
    UnreachableHost {
        /// Base URL that was tried.
        base_url: String,
        /// Configuration hint for the user.
        guidance: String,
        /// Underlying transport failure.
        #[source]
        source: FetchError,
    },

    /// Any other request failure.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl AuthError {
    /// Translates a fetch failure, turning unreachable hosts into a
    /// configuration error.
    pub fn from_fetch(base_url: &str, source: FetchError) -> Self {
        if source.is_unreachable() {
            Self::UnreachableHost {
                base_url: base_url.to_string(),
                guidance: unreachable_guidance(),
                source,
            }
        } else {
            Self::Fetch(source)
        }
    }
}

/// How to point the tool at the right panel.
pub fn unreachable_guidance() -> String {
    format!(
        "Check the panel URL. Set one of {} or pass it first on the command line, \
         e.g. `deployscout https://panel.example.com deployments`.",
        BASE_URL_ENV_VARS.join(", ")
    )
}
