//! Shared application state.

use crate::config::ServerConfig;
use crate::core::insight::{InsightClient, InsightConfig, PromptConfig};
use crate::core::pipeline::AnalysisPipeline;
use crate::core::stt::prerecorded::{PrerecordedClient, PrerecordedConfig};

/// State shared across request handlers. Collaborator clients are built once
/// here from the loaded configuration and injected, never re-created per
/// request.
pub struct AppState {
    pub config: ServerConfig,
    pub pipeline: AnalysisPipeline,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let mut stt_config = PrerecordedConfig::new(config.get_api_key("deepgram")?);
        stt_config.model = config.stt_model.clone();
        if let Some(url) = &config.deepgram_base_url {
            stt_config.base_url = url.clone();
        }
        let transcriber = PrerecordedClient::new(stt_config)?;

        let mut insight_config = InsightConfig::new(config.get_api_key("openai")?);
        insight_config.model = config.insight_model.clone();
        insight_config.max_tokens = config.insight_max_tokens;
        if let Some(url) = &config.openai_base_url {
            insight_config.base_url = url.clone();
        }
        let insight = InsightClient::new(insight_config)?;

        let pipeline = AnalysisPipeline::new(transcriber, insight, PromptConfig::default());

        Ok(Self { config, pipeline })
    }
}
