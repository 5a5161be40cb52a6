//! HTTP client for the hosted Instagram-scraping provider.
//!
//! Wraps `reqwest` with the provider's RapidAPI key headers, form-encoded
//! request body, and tolerant extraction of the two response shapes the
//! provider has been observed to return.

pub mod client;
pub mod error;
pub mod types;

pub use client::InstagramScrapeClient;
pub use error::ScraperError;
pub use types::{post_url, FeedResponse, ScrapedPost};
