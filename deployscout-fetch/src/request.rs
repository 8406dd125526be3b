//! Request options.
//!
//! Options are reused unchanged for every hop of a redirect chain, so they
//! own their data and are cheap to clone.

use reqwest::Method;

/// Request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded` pairs.
    Form(Vec<(String, String)>),
    /// Raw text sent as-is.
    Text(String),
}

/// Method, extra headers and body of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: Method,
    /// Headers laid over the client's baseline headers.
    pub headers: Vec<(String, String)>,
    /// Optional body.
    pub body: Option<RequestBody>,
}

impl RequestOptions {
    /// A plain GET.
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
        }
    }

    /// A POST carrying form-encoded pairs.
    pub fn post_form<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            method: Method::POST,
            headers: Vec::new(),
            body: Some(RequestBody::Form(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            )),
        }
    }

    /// Adds a header; later values for the same name win.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}
