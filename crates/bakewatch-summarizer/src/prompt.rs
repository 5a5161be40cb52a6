//! Prompt construction for the summarization call.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d";
const UNKNOWN_DATE: &str = "unknown";

/// A stored post as fed into the prompt.
#[derive(Debug, Clone)]
pub struct SourcePost {
    pub content: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// Builds the single prompt sent to the model for one account.
///
/// Embeds today's date, the account handle, and each post's display date,
/// content, and link. The model is told to ignore posts older than 30 days
/// (pinned-post filtering) and to answer with the strict JSON payload
/// described in [`crate::types`].
#[must_use]
pub fn build_summary_prompt(handle: &str, today: DateTime<Utc>, posts: &[SourcePost]) -> String {
    let today_str = today.format(DATE_FORMAT).to_string();

    let mut posts_text = String::new();
    for (i, post) in posts.iter().enumerate() {
        let published = post
            .published_at
            .map_or_else(|| UNKNOWN_DATE.to_string(), |d| d.format(DATE_FORMAT).to_string());
        let content = if post.content.is_empty() {
            "(no caption)"
        } else {
            post.content.as_str()
        };
        let _ = write!(
            posts_text,
            "\n[Post {n}]\nPublished: {published}\nContent: {content}\nLink: {url}\n",
            n = i + 1,
            url = post.url,
        );
    }

    format!(
        r#"Today's date is {today_str}.
Below are the {count} most recent posts from the bakery Instagram account @{handle}.
{posts_text}
[Instructions]
1. Using each post's "Published" date, completely exclude and ignore any post more than 30 days older than today's date ({today_str}). This filters out old pinned posts.
2. From the remaining posts only, extract:
- sale notices (opening hours, lineup, sold-out items)
- new menu launches
- temporary closures
- event information (events, discounts, pop-ups — very important)

[Output format — must be valid JSON]
You are the parsing engine of a display app. Answer with a single renderable JSON object in exactly the format below and nothing else.
The block type must be one of "news", "event", "sale", "holiday", "info". You may use <strong> tags for emphasis inside text.
Most important: every entry in "items" must end with the actual source link in the form [https://www.instagram.com/p/...] — the real URL, never the words "post link".

```json
{{
  "excerpt": "One key sentence covering the posts as a whole",
  "blocks": [
    {{
      "type": "news",
      "title": "New menu",
      "items": [
        "Seasonal <strong>persimmon tart</strong> launched [https://www.instagram.com/p/ABCDE12345/]"
      ]
    }}
  ]
}}
```
If none of the four categories apply, return a single block with type "info", an empty "items" list, and a "text" property of "No notable announcements or events today.".
Never include greetings or commentary. Output pure JSON only."#,
        count = posts.len(),
    )
}
