//! Mock page fetcher for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

use super::{CompileError, PageFetcher};

/// A fetcher that serves predefined pages and records every request.
///
/// Unknown URLs answer with HTTP 404.
#[derive(Debug, Default)]
pub struct MockFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    /// Create a new mock fetcher with no pages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`.
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch_page(&self, url: &Url) -> Result<String, CompileError> {
        self.requests.lock().unwrap().push(url.to_string());

        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| CompileError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}
