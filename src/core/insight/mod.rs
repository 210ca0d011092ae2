//! Speaker sentiment insight generation over a chat-completion API.

pub mod client;
pub mod config;
pub mod prompt;

use thiserror::Error;

pub use client::{InsightClient, format_speaker_lines};
pub use config::{DEFAULT_INSIGHT_URL, InsightConfig};
pub use prompt::{ChatMessage, PromptConfig, build_messages};

/// Errors produced by the insight client.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InsightError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("network error: {0}")]
    Network(String),

    /// 429 from the remote API; retried internally with backoff.
    #[error("rate limited by upstream")]
    RateLimited {
        retry_after: Option<std::time::Duration>,
    },

    #[error("upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("protocol error: {0}")]
    Protocol(String),
}
