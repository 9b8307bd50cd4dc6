use anyhow::{Context, Result};
use tracing::info;
use wreq::Client;
use wreq_util::Emulation;

use crate::config::HeaderConfig;

/// Status code and body of one fetched page
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub status: u16,
    pub body: String,
}

impl PageResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that can fetch a search-results page. Transport errors are returned as `Err`;
/// a non-success HTTP status is a normal response.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch(&self, url: &str) -> Result<PageResponse>;
}

/// Browser-emulating HTTP client for live scraping
pub struct HttpPageSource {
    client: Client,
    headers: HeaderConfig,
}

impl HttpPageSource {
    pub fn new(headers: HeaderConfig) -> Result<Self> {
        let client = Client::builder()
            .emulation(Emulation::Firefox136)
            .build()?;

        Ok(HttpPageSource { client, headers })
    }
}

impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &str) -> Result<PageResponse> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", self.headers.user_agent.as_str())
            .header("Accept-Language", self.headers.accept_language.as_str())
            .send()
            .await
            .with_context(|| format!("Network error fetching {}", url))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;

        info!("Fetched {} characters from {} (HTTP {})", body.len(), url, status);
        Ok(PageResponse { status, body })
    }
}
