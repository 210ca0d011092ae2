//! YAML configuration file loading.

use std::path::Path;

use serde::Deserialize;

/// Raw YAML configuration. Every field is optional; missing values fall back
/// to environment variables and then to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub deepgram_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub deepgram_base_url: Option<String>,
    pub openai_base_url: Option<String>,
    pub stt_model: Option<String>,
    pub insight_model: Option<String>,
    pub insight_max_tokens: Option<u32>,
    pub max_upload_bytes: Option<usize>,
    pub cors_allowed_origins: Option<String>,
}

impl YamlConfig {
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        let config = serde_yaml::from_str(&contents)
            .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;
        Ok(config)
    }
}
