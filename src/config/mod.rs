//! Server configuration.
//!
//! Configuration comes from `.env` files, environment variables, and an
//! optional YAML file. Priority: YAML > ENV vars > defaults. The loaded
//! [`ServerConfig`] is passed to each collaborator at construction time; no
//! component re-reads configuration per request.

use std::path::PathBuf;

mod yaml;

pub use yaml::YamlConfig;

/// Default listen port.
const DEFAULT_PORT: u16 = 2005;

/// Default multipart upload cap (50 MB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // Provider API keys
    pub deepgram_api_key: Option<String>,
    pub openai_api_key: Option<String>,

    // Provider endpoints, overridable for self-hosted deployments and tests
    pub deepgram_base_url: Option<String>,
    pub openai_base_url: Option<String>,

    // Model settings
    pub stt_model: String,
    pub insight_model: String,
    pub insight_max_tokens: u32,

    // Upload limits
    pub max_upload_bytes: usize,

    /// CORS allowed origins ("*" for all). None disables CORS.
    pub cors_allowed_origins: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            deepgram_api_key: None,
            openai_api_key: None,
            deepgram_base_url: None,
            openai_base_url: None,
            stt_model: "nova".to_string(),
            insight_model: "gpt-3.5-turbo".to_string(),
            insight_max_tokens: 2000,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cors_allowed_origins: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            config.port = port.parse().map_err(|e| format!("invalid PORT: {e}"))?;
        }
        config.deepgram_api_key = std::env::var("DEEPGRAM_API_KEY").ok().filter(|s| !s.is_empty());
        config.openai_api_key = std::env::var("OPENAI_API_KEY").ok().filter(|s| !s.is_empty());
        config.deepgram_base_url = std::env::var("DEEPGRAM_BASE_URL").ok().filter(|s| !s.is_empty());
        config.openai_base_url = std::env::var("OPENAI_BASE_URL").ok().filter(|s| !s.is_empty());
        if let Ok(model) = std::env::var("STT_MODEL") {
            config.stt_model = model;
        }
        if let Ok(model) = std::env::var("INSIGHT_MODEL") {
            config.insight_model = model;
        }
        if let Ok(tokens) = std::env::var("INSIGHT_MAX_TOKENS") {
            config.insight_max_tokens = tokens
                .parse()
                .map_err(|e| format!("invalid INSIGHT_MAX_TOKENS: {e}"))?;
        }
        if let Ok(bytes) = std::env::var("MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = bytes
                .parse()
                .map_err(|e| format!("invalid MAX_UPLOAD_BYTES: {e}"))?;
        }
        config.cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS").ok().filter(|s| !s.is_empty());

        Ok(config)
    }

    /// Load configuration from a YAML file, with environment variables filling
    /// any fields the file leaves unset.
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = Self::from_env()?;
        let yaml = YamlConfig::from_file(path)?;

        if let Some(host) = yaml.host {
            config.host = host;
        }
        if let Some(port) = yaml.port {
            config.port = port;
        }
        if let Some(key) = yaml.deepgram_api_key {
            config.deepgram_api_key = Some(key);
        }
        if let Some(key) = yaml.openai_api_key {
            config.openai_api_key = Some(key);
        }
        if let Some(url) = yaml.deepgram_base_url {
            config.deepgram_base_url = Some(url);
        }
        if let Some(url) = yaml.openai_base_url {
            config.openai_base_url = Some(url);
        }
        if let Some(model) = yaml.stt_model {
            config.stt_model = model;
        }
        if let Some(model) = yaml.insight_model {
            config.insight_model = model;
        }
        if let Some(tokens) = yaml.insight_max_tokens {
            config.insight_max_tokens = tokens;
        }
        if let Some(bytes) = yaml.max_upload_bytes {
            config.max_upload_bytes = bytes;
        }
        if let Some(origins) = yaml.cors_allowed_origins {
            config.cors_allowed_origins = Some(origins);
        }

        Ok(config)
    }

    /// Socket address string for binding.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// API key for a provider, or a descriptive error naming the variable to
    /// set.
    pub fn get_api_key(&self, provider: &str) -> Result<String, String> {
        let (key, var) = match provider {
            "deepgram" => (&self.deepgram_api_key, "DEEPGRAM_API_KEY"),
            "openai" => (&self.openai_api_key, "OPENAI_API_KEY"),
            other => return Err(format!("unknown provider: {other}")),
        };
        key.clone()
            .ok_or_else(|| format!("{provider} API key not configured (set {var})"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.stt_model, "nova");
        assert_eq!(config.address(), format!("0.0.0.0:{DEFAULT_PORT}"));
    }

    #[test]
    fn test_from_file_yaml_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "host: 127.0.0.1\nport: 9000\ndeepgram_api_key: dg\nopenai_api_key: oa"
        )
        .unwrap();

        let config = ServerConfig::from_file(&file.path().to_path_buf()).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.get_api_key("deepgram").unwrap(), "dg");
        assert_eq!(config.get_api_key("openai").unwrap(), "oa");
    }

    #[test]
    fn test_get_api_key_errors_name_the_variable() {
        let config = ServerConfig::default();
        let err = config.get_api_key("deepgram").unwrap_err();
        assert!(err.contains("DEEPGRAM_API_KEY"));
        assert!(config.get_api_key("nonesuch").is_err());
    }
}
