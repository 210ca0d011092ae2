//! Configuration for the sentiment insight client.

use std::time::Duration;

use url::Url;

use super::InsightError;

/// Default chat-completion endpoint host.
pub const DEFAULT_INSIGHT_URL: &str = "https://api.openai.com";

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Maximum retries after rate-limit responses.
pub const MAX_RETRIES: u32 = 5;

/// Base delay for exponential backoff on rate limits.
pub const BASE_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Options for the insight generator, injected at construction time.
#[derive(Debug, Clone)]
pub struct InsightConfig {
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Endpoint base URL.
    pub base_url: String,
    /// Chat model name.
    pub model: String,
    /// Completion token budget.
    pub max_tokens: u32,
    pub timeout: Duration,
    pub max_retries: u32,
    pub base_retry_delay: Duration,
}

impl InsightConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_INSIGHT_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(120),
            max_retries: MAX_RETRIES,
            base_retry_delay: BASE_RETRY_DELAY,
        }
    }

    pub fn validate(&self) -> Result<(), InsightError> {
        if self.api_key.is_empty() {
            return Err(InsightError::Configuration(
                "API key is required for insight generation".to_string(),
            ));
        }
        if self.model.is_empty() {
            return Err(InsightError::Configuration(
                "model name must not be empty".to_string(),
            ));
        }
        Url::parse(&self.base_url)
            .map_err(|e| InsightError::Configuration(format!("invalid base URL: {e}")))?;
        Ok(())
    }

    /// Full chat-completions endpoint URL.
    pub fn api_url(&self) -> Result<Url, InsightError> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| InsightError::Configuration(format!("invalid base URL: {e}")))?;
        base.join("/v1/chat/completions")
            .map_err(|e| InsightError::Configuration(format!("invalid endpoint path: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url() {
        let config = InsightConfig::new("key");
        assert_eq!(
            config.api_url().unwrap().as_str(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_validate_requires_api_key() {
        assert!(matches!(
            InsightConfig::new("").validate(),
            Err(InsightError::Configuration(_))
        ));
    }
}
