//! Integration tests for `GeminiClient` using wiremock HTTP mocks.

use bakewatch_summarizer::{parse_summary, GeminiClient, SummarizerError};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> GeminiClient {
    GeminiClient::with_base_url("test-key", "gemini-2.5-flash", 30, base_url)
        .expect("client construction should not fail")
}

fn candidate_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] } }
        ]
    })
}

#[tokio::test]
async fn generate_returns_candidate_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_string_contains("summarize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("the answer")))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let text = client
        .generate("please summarize these posts")
        .await
        .expect("should return text");

    assert_eq!(text, "the answer");
}

#[tokio::test]
async fn fenced_answer_parses_into_payload() {
    let server = MockServer::start().await;

    let answer = "```json\n{\"excerpt\": \"Tart week\", \"blocks\": [{\"type\": \"news\", \"title\": \"New menu\", \"items\": [\"Persimmon tart [https://www.instagram.com/p/A/]\"]}]}\n```";

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(answer)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let raw = client.generate("prompt").await.expect("should return text");
    let payload = parse_summary(&raw).expect("fenced payload should parse");

    assert_eq!(payload.excerpt, "Tart week");
    assert_eq!(payload.blocks.len(), 1);
}

#[tokio::test]
async fn error_status_surfaces_as_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"error": {"message": "API key not valid"}})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.generate("prompt").await;

    match result {
        Err(SummarizerError::Api { status, message }) => {
            assert_eq!(status, 400);
            assert!(
                message.contains("API key not valid"),
                "expected provider message, got: {message}"
            );
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn empty_candidate_list_is_an_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.generate("prompt").await;

    assert!(matches!(result, Err(SummarizerError::EmptyResponse)));
}
