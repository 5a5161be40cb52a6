//! Client and payload handling for the hosted summarization model.
//!
//! One prompt-completion call per account: the prompt embeds the account's
//! latest posts and instructs the model to answer with a strict JSON payload
//! (`excerpt` plus typed content blocks). The raw answer may arrive wrapped
//! in a markdown code fence; [`parse::parse_summary`] strips it and enforces
//! the payload schema.

pub mod client;
pub mod error;
pub mod parse;
pub mod prompt;
pub mod types;

pub use client::GeminiClient;
pub use error::SummarizerError;
pub use parse::parse_summary;
pub use prompt::{build_summary_prompt, SourcePost};
pub use types::{BlockKind, SummaryBlock, SummaryPayload};
