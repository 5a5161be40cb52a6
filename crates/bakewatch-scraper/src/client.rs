//! HTTP client for the RapidAPI-hosted Instagram post feed.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::ScraperError;
use crate::types::{FeedResponse, ScrapedPost};

const DEFAULT_BASE_URL: &str = "https://instagram-scraper-stable-api.p.rapidapi.com";
const POSTS_ENDPOINT: &str = "get_ig_user_posts.php";

/// Client for the Instagram-scraping provider.
///
/// Manages the HTTP client, API key, and base URL. Use
/// [`InstagramScrapeClient::new`] for production or
/// [`InstagramScrapeClient::with_base_url`] to point at a mock server in
/// tests. The `x-rapidapi-host` header is derived from the base URL.
pub struct InstagramScrapeClient {
    client: Client,
    api_key: String,
    endpoint: Url,
    host_header: String,
}

impl InstagramScrapeClient {
    /// Creates a new client pointed at the production provider.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, ScraperError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ScraperError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("bakewatch/0.1 (bakery-feed-watcher)")
            .build()?;

        let invalid = |reason: String| ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };

        // Normalise: ensure the base URL ends with exactly one slash so that
        // join appends the endpoint rather than replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
        let host_header = parsed
            .host_str()
            .ok_or_else(|| invalid("missing host".to_owned()))?
            .to_owned();
        let endpoint = parsed
            .join(POSTS_ENDPOINT)
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
            host_header,
        })
    }

    /// Fetches the most recent posts for an account, capped at `limit`.
    ///
    /// Sends the provider's form-encoded `user_name` request and extracts
    /// items from either accepted response shape. Items without a shortcode
    /// are dropped.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] on network failure or a non-2xx HTTP status.
    /// - [`ScraperError::Deserialize`] if the response body is not the
    ///   expected JSON shape.
    pub async fn fetch_recent_posts(
        &self,
        handle: &str,
        limit: usize,
    ) -> Result<Vec<ScrapedPost>, ScraperError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host_header)
            .form(&[("user_name", handle)])
            .send()
            .await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;

        let feed: FeedResponse =
            serde_json::from_str(&body).map_err(|e| ScraperError::Deserialize {
                context: format!("get_ig_user_posts(user_name={handle})"),
                source: e,
            })?;

        let posts = feed.into_posts(limit);
        tracing::debug!(handle, count = posts.len(), "fetched recent posts");
        Ok(posts)
    }
}
