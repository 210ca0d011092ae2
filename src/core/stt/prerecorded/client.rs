//! Batch transcription REST client.
//!
//! Used by the upload path: the whole audio file is posted in one request and
//! the formatted transcript comes back in the response body. Transient
//! upstream failures (429, 5xx) are retried with bounded exponential backoff,
//! honoring `Retry-After` when present.

use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, info, warn};

use super::config::PrerecordedConfig;
use super::messages::{PrerecordedResponse, UpstreamErrorResponse};
use crate::core::stt::base::{SttError, SttResult};

/// A failed request plus the upstream's retry hint, if it gave one.
struct RequestFailure {
    error: SttError,
    retry_after: Option<Duration>,
}

impl From<SttError> for RequestFailure {
    fn from(error: SttError) -> Self {
        Self {
            error,
            retry_after: None,
        }
    }
}

/// Batch transcription client. Construct once with an injected configuration
/// and reuse across requests.
pub struct PrerecordedClient {
    http_client: Client,
    config: PrerecordedConfig,
}

impl PrerecordedClient {
    pub fn new(config: PrerecordedConfig) -> SttResult<Self> {
        config.validate()?;
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| SttError::ConfigurationError(format!("HTTP client build failed: {e}")))?;
        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &PrerecordedConfig {
        &self.config
    }

    /// Transcribe one complete audio payload.
    ///
    /// `content_type` is the sniffed MIME type of the audio bytes.
    pub async fn transcribe(&self, audio: Bytes, content_type: &str) -> SttResult<String> {
        let started = Instant::now();
        let mut attempt = 0u32;

        let transcript = loop {
            match self.send_request(audio.clone(), content_type).await {
                Ok(transcript) => break transcript,
                Err(failure)
                    if failure.error.is_retryable() && attempt < self.config.max_retries =>
                {
                    let delay = failure
                        .retry_after
                        .unwrap_or_else(|| self.config.base_retry_delay * 2u32.pow(attempt));
                    attempt += 1;
                    warn!(
                        "batch transcription attempt {} failed ({}), retrying in {:?}",
                        attempt, failure.error, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(failure) => return Err(failure.error),
            }
        };

        info!(
            "batch transcription finished in {:?} ({} bytes in, {} chars out)",
            started.elapsed(),
            audio.len(),
            transcript.len()
        );
        Ok(transcript)
    }

    async fn send_request(
        &self,
        audio: Bytes,
        content_type: &str,
    ) -> Result<String, RequestFailure> {
        let url = self.config.api_url()?;
        let response = self
            .http_client
            .post(url)
            .header("Authorization", format!("Token {}", self.config.api_key))
            .header("Content-Type", content_type)
            .body(audio)
            .send()
            .await
            .map_err(|e| SttError::TransportError(format!("request failed: {e}")))?;

        let status = response.status();

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs);

        if let Some(request_id) = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
        {
            debug!("batch transcription request id: {request_id}");
        }

        let body = response
            .text()
            .await
            .map_err(|e| SttError::TransportError(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<UpstreamErrorResponse>(&body) {
                Ok(err) => {
                    let code = err.err_code.unwrap_or_else(|| "unknown".to_string());
                    let msg = err.err_msg.unwrap_or_else(|| body.clone());
                    format!("{code}: {msg}")
                }
                Err(_) => body,
            };
            return Err(RequestFailure {
                error: SttError::UpstreamError {
                    status: status.as_u16(),
                    message,
                },
                retry_after,
            });
        }

        let parsed: PrerecordedResponse = serde_json::from_str(&body)
            .map_err(|e| SttError::ProtocolError(format!("unparseable response body: {e}")))?;
        Ok(parsed
            .transcript()
            .map(str::to_owned)
            .ok_or_else(|| SttError::ProtocolError("response carried no transcript".to_string()))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_api_key() {
        let result = PrerecordedClient::new(PrerecordedConfig::new(""));
        assert!(matches!(result, Err(SttError::ConfigurationError(_))));
    }

    #[test]
    fn test_new_with_valid_config() {
        let client = PrerecordedClient::new(PrerecordedConfig::new("key")).unwrap();
        assert_eq!(client.config().model, "nova");
    }
}
