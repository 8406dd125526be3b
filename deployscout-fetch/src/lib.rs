// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `DeployScout` Fetch
//!
//! Session-aware HTTP plumbing for talking to a server-rendered panel.
//!
//! - [`session::Session`] - Cookie jar, CSRF token and resolved resources
//! - [`client::SessionClient`] - Issues requests, follows redirects, feeds
//!   `Set-Cookie` headers back into the session
//! - [`settings::ClientSettings`] - Base URL, timeouts, redirect limit, TLS
//! - [`response::HttpResponse`] - Status, headers and opportunistically parsed body
//!
//! ## Example
//!
//! ```ignore
//! use deployscout_fetch::{ClientSettings, SessionClient};
//!
//! let client = SessionClient::new(ClientSettings::new("panel.example.com")?)?;
//! let page = client.get("/login").await?;
//! println!("{} {}", page.status, client.session().csrf_token().unwrap_or_default());
//! ```

pub mod client;
pub mod csrf;
pub mod error;
pub mod location;
pub mod request;
pub mod response;
pub mod session;
pub mod settings;

pub use client::SessionClient;
pub use csrf::{DEFAULT_CSRF_HEADER, extract_csrf_token};
pub use error::FetchError;
pub use location::{normalize_base_url, resolve_against_base};
pub use request::{RequestBody, RequestOptions};
pub use response::{HttpResponse, ResponseBody, ResponseHeaders};
pub use session::{CookieJar, Session};
pub use settings::{
    BASE_URL_ENV_VARS, ClientSettings, DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};
