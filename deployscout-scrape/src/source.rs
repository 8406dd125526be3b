//! Where pages come from.
//!
//! Discovery and deployment listing only need "GET this path, give me the
//! markup", so they work against [`PageSource`] rather than the HTTP client
//! directly. Tests plug in fixtures.

use async_trait::async_trait;
use deployscout_fetch::{FetchError, SessionClient};
use tracing::debug;

/// A fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Final URL after redirects.
    pub url: String,
    /// HTTP status.
    pub status: u16,
    /// Raw body text.
    pub body: String,
}

/// Supplies rendered pages by path.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Base URL that paths are relative to.
    fn base_url(&self) -> &str;

    /// Fetches a page. Non-2xx statuses are pages too.
    async fn fetch_page(&self, path: &str) -> Result<Page, FetchError>;
}

#[async_trait]
impl PageSource for SessionClient {
    fn base_url(&self) -> &str {
        SessionClient::base_url(self)
    }

    async fn fetch_page(&self, path: &str) -> Result<Page, FetchError> {
        let response = self.get(path).await?;
        if !response.is_success() {
            debug!(status = response.status, url = %response.url, "Page returned non-success status");
        }
        let body = response.text().into_owned();
        Ok(Page {
            url: response.url,
            status: response.status,
            body,
        })
    }
}

#[async_trait]
impl<T: PageSource + ?Sized> PageSource for &T {
    fn base_url(&self) -> &str {
        (**self).base_url()
    }

    async fn fetch_page(&self, path: &str) -> Result<Page, FetchError> {
        (**self).fetch_page(path).await
    }
}
