//! Upload orchestration: classify an uploaded file and run it through
//! transcription (audio) or directly (text), then generate speaker insights.
//!
//! Pure sequential glue with no retry logic of its own; retries live inside
//! the collaborator clients.

use bytes::Bytes;
use thiserror::Error;
use tracing::info;

use crate::core::insight::{InsightClient, InsightError, PromptConfig};
use crate::core::stt::prerecorded::PrerecordedClient;
use crate::core::stt::base::SttError;
use crate::utils::sniff_audio;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Stt(#[from] SttError),

    #[error(transparent)]
    Insight(#[from] InsightError),

    #[error("uploaded file is neither audio nor UTF-8 text")]
    UnsupportedContent,

    #[error("uploaded file contains no text to analyse")]
    EmptyContent,
}

/// Owns the collaborator clients for the upload path. Constructed once at
/// startup with injected configuration.
pub struct AnalysisPipeline {
    transcriber: PrerecordedClient,
    insight: InsightClient,
    prompt: PromptConfig,
}

impl AnalysisPipeline {
    pub fn new(
        transcriber: PrerecordedClient,
        insight: InsightClient,
        prompt: PromptConfig,
    ) -> Self {
        Self {
            transcriber,
            insight,
            prompt,
        }
    }

    /// Classify the upload, extract its conversation text, and return the
    /// formatted speaker insight string.
    pub async fn classify_and_dispatch(
        &self,
        filename: &str,
        bytes: Bytes,
    ) -> Result<String, PipelineError> {
        let text = match sniff_audio(&bytes) {
            Some(mime) => {
                info!("upload {filename:?} classified as {mime}, transcribing");
                self.transcriber.transcribe(bytes, mime).await?
            }
            None => {
                info!("upload {filename:?} treated as conversation text");
                String::from_utf8(bytes.to_vec())
                    .map_err(|_| PipelineError::UnsupportedContent)?
            }
        };

        if text.trim().is_empty() {
            return Err(PipelineError::EmptyContent);
        }

        let insight = self.insight.generate_insight(&text, &self.prompt).await?;
        Ok(insight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::insight::InsightConfig;
    use crate::core::stt::prerecorded::PrerecordedConfig;

    fn pipeline() -> AnalysisPipeline {
        AnalysisPipeline::new(
            PrerecordedClient::new(PrerecordedConfig::new("stt-key")).unwrap(),
            InsightClient::new(InsightConfig::new("llm-key")).unwrap(),
            PromptConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_binary_garbage_is_unsupported() {
        let result = pipeline()
            .classify_and_dispatch("blob.bin", Bytes::from(vec![0x80, 0x81, 0x82, 0xFF]))
            .await;
        assert_eq!(result, Err(PipelineError::UnsupportedContent));
    }

    #[tokio::test]
    async fn test_blank_text_is_empty_content() {
        let result = pipeline()
            .classify_and_dispatch("empty.txt", Bytes::from_static(b"   \n  "))
            .await;
        assert_eq!(result, Err(PipelineError::EmptyContent));
    }
}
