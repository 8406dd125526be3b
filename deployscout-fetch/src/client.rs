//! Session-aware HTTP client.
//!
//! Every request carries the session's cookies and CSRF token, and every
//! response feeds its `Set-Cookie` headers back into the session before
//! anything else happens, so the next hop of a redirect chain already sees
//! them. Redirects are followed manually against the base URL.

use std::sync::Arc;

use reqwest::header::{
    ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, COOKIE, HeaderMap, HeaderName, HeaderValue,
    LOCATION, SET_COOKIE, USER_AGENT,
};
use reqwest::{Client, Response, redirect::Policy};
use tracing::{debug, instrument, warn};

use crate::csrf::extract_csrf_token;
use crate::error::FetchError;
use crate::location::resolve_against_base;
use crate::request::{RequestBody, RequestOptions};
use crate::response::{HttpResponse, ResponseBody, ResponseHeaders};
use crate::session::Session;
use crate::settings::ClientSettings;

const BASELINE_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const BASELINE_ACCEPT_ENCODING: &str = "gzip, deflate";
const BASELINE_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

// ============================================================================
// Session Client
// ============================================================================

/// HTTP client bound to one [`Session`].
///
/// Cloning is cheap; clones share the session, so cookies picked up by one
/// clone are sent by all of them.
#[derive(Debug, Clone)]
pub struct SessionClient {
    inner: Client,
    session: Arc<Session>,
    settings: Arc<ClientSettings>,
}

impl SessionClient {
    /// Creates a client and a fresh session for `settings.base_url`.
    pub fn new(settings: ClientSettings) -> Result<Self, FetchError> {
        if settings.accept_invalid_certs {
            warn!(
                base_url = %settings.base_url,
                "TLS certificate validation disabled - only use this for self-signed panels you trust"
            );
        }

        let mut builder = Client::builder()
            .redirect(Policy::none())
            .danger_accept_invalid_certs(settings.accept_invalid_certs);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let inner = builder
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;

        Ok(Self {
            inner,
            session: Arc::new(Session::new(settings.base_url.clone())),
            settings: Arc::new(settings),
        })
    }

    /// Session shared by this client.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Settings the client was built with.
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Normalised base URL.
    pub fn base_url(&self) -> &str {
        self.session.base_url()
    }

    /// Absolute URL for a path (or an already absolute URL, unchanged).
    pub fn url_for(&self, path: &str) -> String {
        resolve_against_base(self.base_url(), path)
    }

    /// GET a path or URL.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        self.request(url, &RequestOptions::get()).await
    }

    /// Sends a request, following redirects up to the configured limit.
    ///
    /// Non-2xx statuses are returned as responses. Errors are limited to
    /// transport failures, invalid headers and redirect overflow. Each hop
    /// is re-sent with the same method, headers and body.
    #[instrument(skip(self, options), fields(method = %options.method))]
    pub async fn request(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<HttpResponse, FetchError> {
        let mut target = self.url_for(url);
        let mut hops = 0usize;

        loop {
            let response = self.send_once(&target, options).await?;
            let status = response.status().as_u16();
            self.absorb_cookies(&response);

            let location = if (300..399).contains(&status) {
                response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            } else {
                None
            };

            if let Some(location) = location {
                if hops >= self.settings.max_redirects {
                    warn!(url = %target, limit = self.settings.max_redirects, "Redirect limit reached");
                    return Err(FetchError::TooManyRedirects {
                        limit: self.settings.max_redirects,
                        url: target,
                    });
                }
                hops += 1;
                let next = self.url_for(&location);
                debug!(status, from = %target, to = %next, hop = hops, "Following redirect");
                target = next;
                continue;
            }

            let headers = ResponseHeaders::from_header_map(response.headers());
            let text = response
                .text()
                .await
                .map_err(|source| FetchError::Transport {
                    url: target.clone(),
                    source,
                })?;
            debug!(status, url = %target, bytes = text.len(), "Response received");

            self.refresh_csrf(&text);

            return Ok(HttpResponse {
                status,
                url: target,
                headers,
                body: ResponseBody::from_text(text),
            });
        }
    }

    async fn send_once(&self, url: &str, options: &RequestOptions) -> Result<Response, FetchError> {
        let headers = self.build_headers(options)?;
        let mut builder = self
            .inner
            .request(options.method.clone(), url)
            .headers(headers);

        match &options.body {
            Some(RequestBody::Form(pairs)) => builder = builder.form(pairs),
            Some(RequestBody::Text(text)) => builder = builder.body(text.clone()),
            None => {}
        }

        builder
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })
    }

    /// Baseline headers, then caller headers, then session cookies and CSRF token.
    fn build_headers(&self, options: &RequestOptions) -> Result<HeaderMap, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value("User-Agent", &self.settings.user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_static(BASELINE_ACCEPT));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static(BASELINE_ACCEPT_ENCODING));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(BASELINE_ACCEPT_LANGUAGE));

        for (name, value) in &options.headers {
            headers.insert(header_name(name)?, header_value(name, value)?);
        }

        if let Some(cookie) = self.session.cookie_header() {
            headers.insert(COOKIE, header_value("Cookie", &cookie)?);
        }

        if let Some(token) = self.session.csrf_token() {
            let name = &self.settings.csrf_header;
            headers.insert(header_name(name)?, header_value(name, &token)?);
        }

        Ok(headers)
    }

    fn absorb_cookies(&self, response: &Response) {
        let values: Vec<&str> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        if !values.is_empty() {
            self.session.apply_cookies(values);
        }
    }

    fn refresh_csrf(&self, body: &str) {
        if let Some(token) = extract_csrf_token(body) {
            if self.session.csrf_token().as_deref() != Some(token.as_str()) {
                debug!("CSRF token refreshed from page");
                self.session.set_csrf_token(Some(token));
            }
        }
    }
}

fn header_name(name: &str) -> Result<HeaderName, FetchError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| FetchError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, FetchError> {
    HeaderValue::from_str(value).map_err(|e| FetchError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SessionClient {
        SessionClient::new(ClientSettings::new("https://panel.test").unwrap()).unwrap()
    }

    #[test]
    fn test_baseline_headers() {
        let client = client();
        let headers = client.build_headers(&RequestOptions::get()).unwrap();
        assert!(headers.get(USER_AGENT).unwrap().to_str().unwrap().starts_with("Mozilla/5.0"));
        assert_eq!(headers.get(ACCEPT_ENCODING).unwrap(), "gzip, deflate");
        assert!(headers.get(COOKIE).is_none());
        assert!(headers.get("x-csrf-token").is_none());
    }

    #[test]
    fn test_caller_headers_overlay_baseline() {
        let client = client();
        let options = RequestOptions::get().header("Accept", "application/json");
        let headers = client.build_headers(&options).unwrap();
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
    }

    #[test]
    fn test_session_state_is_attached() {
        let client = client();
        client.session().apply_cookies(["a=1; Path=/", "b=2"]);
        client.session().set_csrf_token(Some("tok".into()));

        let options = RequestOptions::post_form([("k", "v")]);
        let headers = client.build_headers(&options).unwrap();
        assert_eq!(headers.get(COOKIE).unwrap(), "a=1; b=2");
        assert_eq!(headers.get("x-csrf-token").unwrap(), "tok");
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        let client = client();
        let options = RequestOptions::get().header("bad header", "x");
        assert!(matches!(
            client.build_headers(&options),
            Err(FetchError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_clones_share_session() {
        let a = client();
        let b = a.clone();
        a.session().apply_cookies(["s=1"]);
        assert_eq!(b.session().cookie_header().as_deref(), Some("s=1"));
    }

    #[test]
    fn test_url_for() {
        let client = client();
        assert_eq!(client.url_for("/login"), "https://panel.test/login");
        assert_eq!(client.url_for("https://other.test/x"), "https://other.test/x");
    }
}
