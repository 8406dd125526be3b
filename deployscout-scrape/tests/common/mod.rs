//! In-memory page source for discovery and listing tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use deployscout_fetch::FetchError;
use deployscout_scrape::{Page, PageSource};

pub const BASE: &str = "https://panel.test";

/// Serves fixed pages by path; unknown paths are empty 404s.
#[derive(Debug, Default)]
pub struct Fixtures {
    pages: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

impl Fixtures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, path: &str, body: impl Into<String>) -> Self {
        self.pages.insert(path.to_string(), body.into());
        self
    }

    /// Paths requested so far, in order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for Fixtures {
    fn base_url(&self) -> &str {
        BASE
    }

    async fn fetch_page(&self, path: &str) -> Result<Page, FetchError> {
        self.requested.lock().unwrap().push(path.to_string());
        let (status, body) = match self.pages.get(path) {
            Some(body) => (200, body.clone()),
            None => (404, String::new()),
        };
        Ok(Page {
            url: format!("{BASE}{path}"),
            status,
            body,
        })
    }
}
