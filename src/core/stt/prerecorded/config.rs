//! Configuration for the prerecorded (batch) transcription client.

use std::time::Duration;

use url::Url;

use crate::core::stt::base::{ListenVersion, SttError, SttResult};

/// Default batch endpoint host.
pub const DEFAULT_PRERECORDED_URL: &str = "https://api.deepgram.com";

/// Total request timeout. Batch transcription of long files is slow.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum retries for transient upstream errors.
pub const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff.
pub const BASE_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Options for one batch transcription call.
#[derive(Debug, Clone)]
pub struct PrerecordedConfig {
    /// API key sent as the `Authorization: Token` header.
    pub api_key: String,
    /// Endpoint base URL (`http://` or `https://`).
    pub base_url: String,
    /// Protocol version selecting the URL path.
    pub version: ListenVersion,
    /// Transcription model.
    pub model: String,
    pub smart_format: bool,
    pub punctuate: bool,
    /// Label speakers so the insight step can attribute sentiment.
    pub diarize: bool,
    /// Segment the transcript into utterances.
    pub utterances: bool,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub max_retries: u32,
    pub base_retry_delay: Duration,
}

impl PrerecordedConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_PRERECORDED_URL.to_string(),
            version: ListenVersion::default(),
            model: "nova".to_string(),
            smart_format: true,
            punctuate: true,
            diarize: true,
            utterances: true,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_retries: MAX_RETRIES,
            base_retry_delay: BASE_RETRY_DELAY,
        }
    }

    pub fn validate(&self) -> SttResult<()> {
        if self.api_key.is_empty() {
            return Err(SttError::ConfigurationError(
                "API key is required for batch transcription".to_string(),
            ));
        }
        if self.model.is_empty() {
            return Err(SttError::ConfigurationError(
                "transcription model must not be empty".to_string(),
            ));
        }
        Url::parse(&self.base_url)
            .map_err(|e| SttError::ConfigurationError(format!("invalid base URL: {e}")))?;
        Ok(())
    }

    /// Full endpoint URL including transcription options.
    pub fn api_url(&self) -> SttResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SttError::ConfigurationError(format!("invalid base URL: {e}")))?;
        url.set_path(self.version.path());
        url.query_pairs_mut()
            .append_pair("model", &self.model)
            .append_pair("smart_format", bool_str(self.smart_format))
            .append_pair("punctuate", bool_str(self.punctuate))
            .append_pair("diarize", bool_str(self.diarize))
            .append_pair("utterances", bool_str(self.utterances));
        Ok(url)
    }
}

#[inline]
fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
