//! Turning the model's raw text answer into a validated payload.

use crate::error::SummarizerError;
use crate::types::SummaryPayload;

/// Strips an optional surrounding markdown code fence from a response.
#[must_use]
pub fn strip_code_fence(raw: &str) -> &str {
    raw.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Parses the model's raw answer into a [`SummaryPayload`].
///
/// # Errors
///
/// Returns [`SummarizerError::InvalidPayload`] when the (fence-stripped)
/// text is not the expected JSON shape — including unknown block types.
pub fn parse_summary(raw: &str) -> Result<SummaryPayload, SummarizerError> {
    serde_json::from_str(strip_code_fence(raw))
        .map_err(|source| SummarizerError::InvalidPayload { source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BlockKind;

    const VALID: &str = r#"{
        "excerpt": "Persimmon tart week",
        "blocks": [
            {"type": "sale", "title": "This week", "items": ["Open 10:00 [https://www.instagram.com/p/A/]"]}
        ]
    }"#;

    #[test]
    fn strip_code_fence_removes_json_fence() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("{}"), "{}");
    }

    #[test]
    fn parses_bare_payload() {
        let payload = parse_summary(VALID).unwrap();
        assert_eq!(payload.excerpt, "Persimmon tart week");
        assert_eq!(payload.blocks[0].kind, BlockKind::Sale);
    }

    #[test]
    fn parses_fenced_payload() {
        let fenced = format!("```json\n{VALID}\n```");
        let payload = parse_summary(&fenced).unwrap();
        assert_eq!(payload.blocks.len(), 1);
    }

    #[test]
    fn rejects_prose_answer() {
        let result = parse_summary("Sorry, I could not find any posts to summarize.");
        assert!(matches!(result, Err(SummarizerError::InvalidPayload { .. })));
    }

    #[test]
    fn rejects_unknown_block_type() {
        let result =
            parse_summary(r#"{"excerpt": "x", "blocks": [{"type": "weather", "items": []}]}"#);
        assert!(matches!(result, Err(SummarizerError::InvalidPayload { .. })));
    }
}
