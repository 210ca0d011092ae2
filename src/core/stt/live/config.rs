//! Configuration for the live transcription session.

use std::time::Duration;

use url::Url;

use crate::core::stt::base::{ListenVersion, SttError, SttResult};

/// Default live endpoint host.
pub const DEFAULT_LIVE_URL: &str = "wss://api.deepgram.com";

/// How often the keepalive loop wakes to check for cancellation.
pub const KEEPALIVE_TICK: Duration = Duration::from_secs(1);

/// Keepalive control frames are sent once per this many ticks.
pub const TICKS_PER_KEEPALIVE: u32 = 5;

/// Whether a transport fault is swallowed (a failure value is returned) or
/// re-raised to the caller.
///
/// All toggles default to fail-open: faults surface as `Error` events and
/// boolean failure values, never as raised errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaultPolicy {
    /// Raise connect failures from `start()` instead of returning `false`.
    pub raise_on_connect: bool,
    /// Raise send failures from `send()` instead of returning `false`.
    pub raise_on_send: bool,
    /// Surface receive-loop faults from `finish()` in addition to the
    /// `Error` event.
    pub raise_on_receive: bool,
}

/// Options negotiated for one live connection.
#[derive(Debug, Clone)]
pub struct LiveConfig {
    /// API key sent as the `Authorization: Token` header.
    pub api_key: String,
    /// Endpoint base URL (`ws://` or `wss://`).
    pub base_url: String,
    /// Protocol version selecting the URL path.
    pub version: ListenVersion,
    /// Transcription model.
    pub model: String,
    /// Apply punctuation and formatting to transcripts.
    pub smart_format: bool,
    /// Add punctuation.
    pub punctuate: bool,
    /// Label speakers in multi-speaker audio.
    pub diarize: bool,
    /// Deliver partial transcripts before segments finalize.
    pub interim_results: bool,
    /// Send periodic keepalive control frames while the session is open.
    pub keepalive: bool,
    /// Extra headers for the WebSocket handshake.
    pub headers: Vec<(String, String)>,
    /// Fault propagation behavior for connect/send/receive.
    pub fault_policy: FaultPolicy,
}

impl LiveConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_LIVE_URL.to_string(),
            version: ListenVersion::default(),
            model: "nova".to_string(),
            smart_format: true,
            punctuate: true,
            diarize: false,
            interim_results: true,
            keepalive: true,
            headers: Vec::new(),
            fault_policy: FaultPolicy::default(),
        }
    }

    /// Validate options before any connection is attempted.
    pub fn validate(&self) -> SttResult<()> {
        if self.api_key.is_empty() {
            return Err(SttError::ConfigurationError(
                "API key is required for live transcription".to_string(),
            ));
        }
        if self.model.is_empty() {
            return Err(SttError::ConfigurationError(
                "transcription model must not be empty".to_string(),
            ));
        }
        let url = Url::parse(&self.base_url)
            .map_err(|e| SttError::ConfigurationError(format!("invalid base URL: {e}")))?;
        match url.scheme() {
            "ws" | "wss" => Ok(()),
            other => Err(SttError::ConfigurationError(format!(
                "base URL scheme must be ws or wss, got {other}"
            ))),
        }
    }

    /// Build the full WebSocket URL including negotiated options.
    pub fn build_websocket_url(&self) -> SttResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SttError::ConfigurationError(format!("invalid base URL: {e}")))?;
        url.set_path(self.version.path());
        url.query_pairs_mut()
            .append_pair("model", &self.model)
            .append_pair("smart_format", bool_str(self.smart_format))
            .append_pair("punctuate", bool_str(self.punctuate))
            .append_pair("diarize", bool_str(self.diarize))
            .append_pair("interim_results", bool_str(self.interim_results));
        Ok(url)
    }
}

#[inline]
fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_api_key() {
        let config = LiveConfig::new("");
        assert!(matches!(
            config.validate(),
            Err(SttError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        let mut config = LiveConfig::new("key");
        config.model = String::new();
        assert!(matches!(
            config.validate(),
            Err(SttError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_http_scheme() {
        let mut config = LiveConfig::new("key");
        config.base_url = "https://api.deepgram.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(SttError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_websocket_url_contains_options() {
        let mut config = LiveConfig::new("key");
        config.diarize = true;
        let url = config.build_websocket_url().unwrap();
        let url = url.as_str();
        assert!(url.starts_with("wss://api.deepgram.com/v1/listen?"));
        assert!(url.contains("model=nova"));
        assert!(url.contains("smart_format=true"));
        assert!(url.contains("diarize=true"));
        assert!(url.contains("interim_results=true"));
    }

    #[test]
    fn test_fault_policy_defaults_fail_open() {
        let policy = FaultPolicy::default();
        assert!(!policy.raise_on_connect);
        assert!(!policy.raise_on_send);
        assert!(!policy.raise_on_receive);
    }
}
