//! HTTP client utilities.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use url::Url;

use crate::compiler::{CompileError, PageFetcher};

/// Shared HTTP client with sensible defaults
///
/// No request timeout is configured; calls rely on the transport defaults.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a new HTTP client identifying itself as this crate
    pub fn new() -> reqwest::Result<Self> {
        Self::with_user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
    }

    /// Create a new HTTP client with a custom user agent
    pub fn with_user_agent(user_agent: &str) -> reqwest::Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Get the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_page(&self, url: &Url) -> Result<String, CompileError> {
        tracing::debug!(%url, "fetching page");

        let response = self
            .client
            .get(url.clone())
            .header("Accept", "text/html")
            .send()
            .await
            .map_err(|e| CompileError::Network(format!("Failed to fetch {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompileError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| CompileError::Network(format!("Failed to read {}: {}", url, e)))
    }
}
