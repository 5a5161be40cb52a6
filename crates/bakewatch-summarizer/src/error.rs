use thiserror::Error;

/// Errors returned by the summarization client and payload parser.
#[derive(Debug, Error)]
pub enum SummarizerError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("summarization API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The configured base URL could not be parsed.
    #[error("invalid summarizer base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    /// The response envelope could not be deserialized.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The provider returned no candidate text at all.
    #[error("summarization response contained no text")]
    EmptyResponse,

    /// The model's answer was not the expected JSON payload.
    #[error("summary payload is not valid JSON: {source}")]
    InvalidPayload {
        #[source]
        source: serde_json::Error,
    },
}
