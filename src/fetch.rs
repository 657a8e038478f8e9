//! Upstream fetch source: the paginated content-search API client.
//!
//! The first-page request carries the full parameter set (token, quoted
//! query, page size). Subsequent requests send only the opaque cursor the
//! upstream returned - the source encodes query state inside the cursor
//! itself, so no parameters are re-sent.

use crate::config::IngestConfig;
use crate::error::{Error, Result};
use crate::types::Page;
use async_trait::async_trait;
use tracing::debug;
use url::Url;

/// Maximum number of body bytes carried into an upstream error message
const ERROR_BODY_EXCERPT: usize = 256;

/// A source of paginated article pages.
///
/// Implementations raise [`Error::Network`] on transport faults (retried by
/// the driver) and [`Error::UpstreamStatus`] when the source reports an HTTP
/// error status (never retried).
#[async_trait]
pub trait FetchSource: Send + Sync {
    /// Fetch the first page for a query
    async fn fetch_first_page(&self, query: &str, page_size: u32) -> Result<Page>;

    /// Fetch a subsequent page using the cursor from the previous page
    async fn fetch_next_page(&self, cursor: &str) -> Result<Page>;
}

/// HTTP client for a webz.io-style news search API
#[derive(Debug)]
pub struct WebzClient {
    http_client: reqwest::Client,
    base_url: Url,
    token: String,
}

impl WebzClient {
    /// Create a client from ingestion configuration
    ///
    /// # Errors
    /// Returns an error if the search URL is malformed or the HTTP client
    /// cannot be created.
    pub fn new(config: &IngestConfig) -> Result<Self> {
        let base_url = Url::parse(&config.search_url).map_err(|e| Error::Config {
            message: format!("search_url is not a valid URL: {}", e),
            key: Some("search_url".to_string()),
        })?;

        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent("news-ingest")
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            token: config.api_token.clone(),
        })
    }

    /// Resolve a pagination cursor: absolute URLs are used verbatim,
    /// relative paths are resolved against the configured base.
    fn resolve_cursor(&self, cursor: &str) -> Result<Url> {
        match Url::parse(cursor) {
            Ok(url) => Ok(url),
            Err(_) => self.base_url.join(cursor).map_err(|e| {
                Error::Other(format!("invalid pagination cursor {:?}: {}", cursor, e))
            }),
        }
    }

    async fn get_page(&self, url: Url) -> Result<Page> {
        let response = self.http_client.get(url).send().await?;

        // A reported error status is authoritative and never retried;
        // capture a body excerpt for the error message.
        let status = response.status();
        if !status.is_success() {
            let mut message = response.text().await.unwrap_or_default();
            message.truncate(ERROR_BODY_EXCERPT);
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                message,
            });
        }

        let page = response.json::<Page>().await?;
        Ok(page)
    }
}

#[async_trait]
impl FetchSource for WebzClient {
    async fn fetch_first_page(&self, query: &str, page_size: u32) -> Result<Page> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("token", &self.token)
            // the upstream expects the query string wrapped in quotes
            .append_pair("q", &format!("\"{}\"", query))
            .append_pair("size", &page_size.to_string());

        debug!(%query, page_size, "Fetching first page");
        self.get_page(url).await
    }

    async fn fetch_next_page(&self, cursor: &str) -> Result<Page> {
        let url = self.resolve_cursor(cursor)?;
        debug!(%url, "Fetching next page");
        self.get_page(url).await
    }
}
