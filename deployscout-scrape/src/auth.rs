//! Login handshake.
//!
//! GET the login page for a CSRF token, POST the credentials as a form, then
//! look for the panel's known failure phrase. Its absence counts as success;
//! [`LoginOutcome::confirmed`] adds a positive signal on top for callers
//! that want one.

use deployscout_fetch::{RequestOptions, SessionClient, extract_csrf_token};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::AuthError;

/// Login form path.
pub const LOGIN_PATH: &str = "/login";

/// Text the panel renders when the credentials are rejected.
pub const FAILURE_PHRASE: &str = "These credentials do not match our records";

/// What a successful login looked like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginOutcome {
    /// Status of the final response.
    pub status: u16,
    /// URL the login POST ended on after redirects.
    pub final_url: String,
    /// Whether the login page carried a CSRF token.
    pub csrf_token_found: bool,
    /// The final page is not the login form and the status is below 400.
    pub confirmed: bool,
}

/// Performs the login handshake on a [`SessionClient`].
#[derive(Debug, Clone)]
pub struct Authenticator {
    client: SessionClient,
}

impl Authenticator {
    /// Creates an authenticator sharing `client`'s session.
    pub fn new(client: SessionClient) -> Self {
        Self { client }
    }

    /// Logs in, leaving the session cookies and CSRF token in the client's session.
    #[instrument(skip_all, fields(base_url = %self.client.base_url()))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let base_url = self.client.base_url().to_string();
        let login_url = self.client.url_for(LOGIN_PATH);

        let page = self
            .client
            .get(LOGIN_PATH)
            .await
            .map_err(|e| AuthError::from_fetch(&base_url, e))?;

        let token = extract_csrf_token(&page.text());
        let csrf_token_found = token.is_some();
        if csrf_token_found {
            self.client.session().set_csrf_token(token);
        } else {
            warn!(status = page.status, "Login page carried no CSRF token");
        }

        let options = RequestOptions::post_form([("email", email), ("password", password)])
            .header("Referer", login_url.as_str());
        let response = self
            .client
            .request(LOGIN_PATH, &options)
            .await
            .map_err(|e| AuthError::from_fetch(&base_url, e))?;

        if contains_failure_phrase(&response.text()) {
            debug!(status = response.status, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let confirmed = response.status < 400 && !is_login_url(&response.url, &login_url);
        info!(status = response.status, confirmed, "Logged in");

        Ok(LoginOutcome {
            status: response.status,
            final_url: response.url,
            csrf_token_found,
            confirmed,
        })
    }
}

fn contains_failure_phrase(body: &str) -> bool {
    body.to_lowercase()
        .contains(&FAILURE_PHRASE.to_lowercase())
}

fn is_login_url(url: &str, login_url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.trim_end_matches('/') == login_url
}
