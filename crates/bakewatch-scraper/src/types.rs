//! Response shapes for the scraping provider's post-feed endpoint.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A scraped post, reduced to the fields the pipeline persists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedPost {
    pub url: String,
    pub content: String,
    /// `None` when the provider reported no timestamp (or epoch zero).
    pub published_at: Option<DateTime<Utc>>,
}

/// Canonical post URL for an Instagram shortcode.
#[must_use]
pub fn post_url(code: &str) -> String {
    format!("https://www.instagram.com/p/{code}/")
}

/// Top-level response envelope.
///
/// Depending on the provider version, the item list arrives under
/// `data.items` or at the top level as `items`; both are accepted, and a
/// present-but-empty `data.items` falls through to the top-level list.
#[derive(Debug, Deserialize)]
pub struct FeedResponse {
    #[serde(default)]
    data: Option<FeedData>,
    #[serde(default)]
    items: Option<Vec<PostItem>>,
}

#[derive(Debug, Deserialize)]
struct FeedData {
    #[serde(default)]
    items: Option<Vec<PostItem>>,
}

#[derive(Debug, Deserialize)]
struct PostItem {
    #[serde(default)]
    caption: Option<Caption>,
    #[serde(default)]
    code: Option<String>,
    /// Unix epoch seconds; zero means unknown.
    #[serde(default)]
    taken_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Caption {
    #[serde(default)]
    text: Option<String>,
}

impl FeedResponse {
    fn into_items(self) -> Vec<PostItem> {
        match self.data.and_then(|d| d.items) {
            Some(items) if !items.is_empty() => items,
            _ => self.items.unwrap_or_default(),
        }
    }

    /// Converts the first `limit` items into [`ScrapedPost`]s, dropping any
    /// item without a shortcode (no URL to key the upsert on).
    #[must_use]
    pub fn into_posts(self, limit: usize) -> Vec<ScrapedPost> {
        self.into_items()
            .into_iter()
            .take(limit)
            .filter_map(PostItem::into_post)
            .collect()
    }
}

impl PostItem {
    fn into_post(self) -> Option<ScrapedPost> {
        let code = self.code.filter(|c| !c.is_empty())?;
        let content = self.caption.and_then(|c| c.text).unwrap_or_default();
        let published_at = self
            .taken_at
            .filter(|&secs| secs != 0)
            .and_then(|secs| DateTime::from_timestamp(secs, 0));

        Some(ScrapedPost {
            url: post_url(&code),
            content,
            published_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> FeedResponse {
        serde_json::from_str(body).expect("test body should parse")
    }

    #[test]
    fn nested_data_items_shape_is_extracted() {
        let feed = parse(
            r#"{"data": {"items": [
                {"caption": {"text": "fresh sourdough"}, "code": "ABC123", "taken_at": 1754600000}
            ]}}"#,
        );

        let posts = feed.into_posts(3);

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].url, "https://www.instagram.com/p/ABC123/");
        assert_eq!(posts[0].content, "fresh sourdough");
        assert!(posts[0].published_at.is_some());
    }

    #[test]
    fn top_level_items_shape_is_extracted() {
        let feed = parse(r#"{"items": [{"code": "XYZ789", "taken_at": 1754600000}]}"#);

        let posts = feed.into_posts(3);

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].url, "https://www.instagram.com/p/XYZ789/");
        assert_eq!(posts[0].content, "");
    }

    #[test]
    fn empty_nested_items_falls_through_to_top_level() {
        let feed = parse(r#"{"data": {"items": []}, "items": [{"code": "FALLBACK"}]}"#);

        let posts = feed.into_posts(3);

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].url, "https://www.instagram.com/p/FALLBACK/");
    }

    #[test]
    fn items_beyond_the_limit_are_dropped() {
        let feed = parse(
            r#"{"items": [
                {"code": "A"}, {"code": "B"}, {"code": "C"}, {"code": "D"}, {"code": "E"}
            ]}"#,
        );

        let posts = feed.into_posts(3);

        assert_eq!(posts.len(), 3);
        assert_eq!(posts[2].url, "https://www.instagram.com/p/C/");
    }

    #[test]
    fn item_without_code_is_skipped() {
        let feed = parse(
            r#"{"items": [
                {"caption": {"text": "no code"}},
                {"code": "", "caption": {"text": "empty code"}},
                {"code": "KEEP"}
            ]}"#,
        );

        let posts = feed.into_posts(3);

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].url, "https://www.instagram.com/p/KEEP/");
    }

    #[test]
    fn zero_timestamp_becomes_none() {
        let feed = parse(r#"{"items": [{"code": "A", "taken_at": 0}]}"#);

        let posts = feed.into_posts(3);

        assert!(posts[0].published_at.is_none());
    }

    #[test]
    fn missing_timestamp_becomes_none() {
        let feed = parse(r#"{"items": [{"code": "A"}]}"#);

        let posts = feed.into_posts(3);

        assert!(posts[0].published_at.is_none());
    }

    #[test]
    fn empty_response_yields_no_posts() {
        let feed = parse("{}");
        assert!(feed.into_posts(3).is_empty());
    }
}
