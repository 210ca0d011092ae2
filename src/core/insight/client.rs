//! Chat-completion client for speaker sentiment insights.
//!
//! The remote call is treated as opaque: messages in, one completion out.
//! The only retry behavior is exponential backoff on rate-limit (429)
//! responses, honoring `Retry-After`; every other upstream failure surfaces
//! immediately.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::InsightConfig;
use super::prompt::{ChatMessage, PromptConfig, build_messages};
use super::InsightError;

/// Matches per-speaker markers like `[Speaker_1]` or `[speaker 2]`.
static SPEAKER_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[speaker[ _]?\d+\]").expect("valid speaker marker pattern"));

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    error: UpstreamErrorDetail,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorDetail {
    message: String,
    #[serde(default, rename = "type")]
    error_type: Option<String>,
}

/// Sentiment insight generator. Construct once with an injected configuration
/// and reuse across requests.
pub struct InsightClient {
    http_client: Client,
    config: InsightConfig,
}

impl InsightClient {
    pub fn new(config: InsightConfig) -> Result<Self, InsightError> {
        config.validate()?;
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InsightError::Configuration(format!("HTTP client build failed: {e}")))?;
        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    /// Generate per-speaker sentiment insights for a conversation.
    pub async fn generate_insight(
        &self,
        conversation: &str,
        prompt: &PromptConfig,
    ) -> Result<String, InsightError> {
        let messages = build_messages(conversation, prompt);
        let mut attempt = 0u32;

        let content = loop {
            match self.send_request(&messages).await {
                Ok(content) => break content,
                Err(InsightError::RateLimited { retry_after }) if attempt < self.config.max_retries => {
                    let delay = retry_after
                        .unwrap_or_else(|| self.config.base_retry_delay * 2u32.pow(attempt));
                    attempt += 1;
                    warn!(
                        "insight request rate limited, attempt {} retrying in {:?}",
                        attempt, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        };

        info!("insight generated ({} chars)", content.len());
        Ok(format_speaker_lines(&content))
    }

    async fn send_request(&self, messages: &[ChatMessage]) -> Result<String, InsightError> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .http_client
            .post(self.config.api_url()?)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| InsightError::Network(format!("request failed: {e}")))?;

        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            debug!("rate limited, retry-after: {retry_after:?}");
            return Err(InsightError::RateLimited { retry_after });
        }

        let body = response
            .text()
            .await
            .map_err(|e| InsightError::Network(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<UpstreamErrorBody>(&body) {
                Ok(err) => match err.error.error_type {
                    Some(kind) => format!("{} ({kind})", err.error.message),
                    None => err.error.message,
                },
                Err(_) => body,
            };
            return Err(InsightError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| InsightError::Protocol(format!("unparseable response body: {e}")))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| InsightError::Protocol("completion carried no content".to_string()))
    }
}

/// Force one finding per line: each `[Speaker_N]` marker starts a new line,
/// and surrounding whitespace is trimmed.
pub fn format_speaker_lines(text: &str) -> String {
    let mut starts: Vec<usize> = SPEAKER_MARKER.find_iter(text).map(|m| m.start()).collect();
    if starts.first() != Some(&0) {
        starts.insert(0, 0);
    }
    starts.push(text.len());

    let mut segments = Vec::with_capacity(starts.len());
    for window in starts.windows(2) {
        let segment = text[window[0]..window[1]].trim();
        if !segment.is_empty() {
            segments.push(segment);
        }
    }
    segments.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_api_key() {
        assert!(matches!(
            InsightClient::new(InsightConfig::new("")),
            Err(InsightError::Configuration(_))
        ));
    }

    #[test]
    fn test_format_speaker_lines_splits_on_markers() {
        let raw = "[Speaker_1] seems anxious. [Speaker_2] is calm and supportive.";
        assert_eq!(
            format_speaker_lines(raw),
            "[Speaker_1] seems anxious.\n[Speaker_2] is calm and supportive."
        );
    }

    #[test]
    fn test_format_speaker_lines_keeps_preamble() {
        let raw = "Overall the tone is tense.\n[Speaker 1] dominates the exchange.";
        assert_eq!(
            format_speaker_lines(raw),
            "Overall the tone is tense.\n[Speaker 1] dominates the exchange."
        );
    }

    #[test]
    fn test_format_speaker_lines_without_markers_is_trimmed_passthrough() {
        assert_eq!(format_speaker_lines("  plain summary  "), "plain summary");
    }
}
