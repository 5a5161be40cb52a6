//! The structured summary payload the model is asked to produce.

use serde::{Deserialize, Serialize};

/// Parsed summary: a one-line excerpt plus an ordered list of typed blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryPayload {
    pub excerpt: String,
    pub blocks: Vec<SummaryBlock>,
}

/// One rendered block of the summary.
///
/// Category blocks carry a `title` and `items`; the no-news fallback block
/// carries `text` with empty `items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryBlock {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Allowed block categories. Anything else fails parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    News,
    Event,
    Sale,
    Holiday,
    Info,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_round_trips_through_json() {
        let payload = SummaryPayload {
            excerpt: "Seasonal persimmon tart launch".to_string(),
            blocks: vec![SummaryBlock {
                kind: BlockKind::News,
                title: Some("New menu".to_string()),
                items: vec![
                    "Seasonal <strong>persimmon tart</strong> [https://www.instagram.com/p/ABCDE12345/]"
                        .to_string(),
                ],
                text: None,
            }],
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["blocks"][0]["type"], "news");

        let back: SummaryPayload = serde_json::from_value(value).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn fallback_info_block_parses_without_title() {
        let payload: SummaryPayload = serde_json::from_str(
            r#"{
                "excerpt": "Nothing new today",
                "blocks": [
                    {"type": "info", "items": [], "text": "No notable announcements or events today."}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(payload.blocks.len(), 1);
        assert_eq!(payload.blocks[0].kind, BlockKind::Info);
        assert!(payload.blocks[0].title.is_none());
        assert!(payload.blocks[0].items.is_empty());
        assert!(payload.blocks[0].text.is_some());
    }

    #[test]
    fn unknown_block_type_is_rejected() {
        let result = serde_json::from_str::<SummaryPayload>(
            r#"{"excerpt": "x", "blocks": [{"type": "gossip", "items": []}]}"#,
        );

        assert!(result.is_err());
    }
}
