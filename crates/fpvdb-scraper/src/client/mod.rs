//! HTTP client for the page retrieval service.

mod origin;

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde_json::json;

use crate::error::ScraperError;
use crate::types::{ScrapeResponse, ScrapedPage};

pub use origin::extract_origin;
pub(crate) use origin::extract_domain;

/// Anything that turns a URL into page markdown plus metadata.
///
/// [`FirecrawlClient`] is the production implementation; tests substitute
/// canned pages.
pub trait PageSource {
    fn scrape(&self, url: &str) -> impl Future<Output = Result<ScrapedPage, ScraperError>> + Send;
}

/// Client for a Firecrawl-compatible scrape API.
///
/// Sends one `POST {api_url}/v1/scrape` per page, asking for markdown only.
/// HTTP 429 maps to [`ScraperError::RateLimited`]; retrying is left to
/// [`crate::scrape_with_retry`].
pub struct FirecrawlClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl FirecrawlClient {
    /// Creates a client with configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::MissingApiKey`] when `api_key` is `None` or blank.
    /// - [`ScraperError::InvalidUrl`] when `api_url` is not an absolute URL.
    /// - [`ScraperError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        api_url: &str,
        api_key: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ScraperError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ScraperError::MissingApiKey)?;
        let endpoint = Self::scrape_endpoint(api_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_owned(),
        })
    }

    fn scrape_endpoint(api_url: &str) -> Result<String, ScraperError> {
        let base = api_url.trim_end_matches('/');
        let url = reqwest::Url::parse(&format!("{base}/v1/scrape")).map_err(|e| {
            ScraperError::InvalidUrl {
                url: api_url.to_owned(),
                reason: e.to_string(),
            }
        })?;
        Ok(url.to_string())
    }

    /// Retrieves `url` as markdown plus page metadata.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] on HTTP 429.
    /// - [`ScraperError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ScraperError::Deserialize`] if the body is not the expected JSON.
    /// - [`ScraperError::Scrape`] when the service reports `success: false`.
    /// - [`ScraperError::Http`] on network or TLS failure.
    pub async fn scrape_page(&self, url: &str) -> Result<ScrapedPage, ScraperError> {
        tracing::debug!(url, "scraping page");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({ "url": url, "formats": ["markdown"] }))
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ScraperError::RateLimited {
                domain: extract_domain(&self.endpoint),
                retry_after_secs,
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<ScrapeResponse>(&body).map_err(|e| {
            ScraperError::Deserialize {
                context: format!("scrape response for {url}"),
                source: e,
            }
        })?;

        if !parsed.success {
            return Err(ScraperError::Scrape {
                url: url.to_owned(),
                reason: parsed
                    .error
                    .unwrap_or_else(|| "service reported failure".to_owned()),
            });
        }

        Ok(parsed.data.unwrap_or_default())
    }
}

impl PageSource for FirecrawlClient {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage, ScraperError> {
        self.scrape_page(url).await
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
