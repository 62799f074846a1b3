//! HTTP client for the member-day source pages.

use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;
use crate::extract::SiteExtractor;

/// Fetches source pages and hands them to a [`SiteExtractor`].
///
/// No retries are attempted; a failed fetch is reported to the caller as-is.
#[derive(Debug, Clone)]
pub struct PageClient {
    client: Client,
}

impl PageClient {
    /// Creates a `PageClient` with the given request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches `url` and returns the decoded body.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`] for any non-2xx response.
    /// - [`ScraperError::Http`] on network or body decoding failure.
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "source page returned non-success status");
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }

    /// Fetches `url` and runs `extractor` over the parsed page.
    ///
    /// # Errors
    ///
    /// Fetch failures from [`PageClient::fetch_page`], or
    /// [`ScraperError::MissingStructure`] from the extractor.
    pub async fn scrape<E: SiteExtractor>(
        &self,
        url: &str,
        extractor: &E,
    ) -> Result<E::Output, ScraperError> {
        let body = self.fetch_page(url).await?;
        tracing::debug!(url, bytes = body.len(), "fetched source page");
        extractor.extract_html(&body)
    }
}
