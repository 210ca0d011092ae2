//! Response models for the batch transcription API.

use serde::Deserialize;

/// Top-level batch transcription response.
#[derive(Debug, Clone, Deserialize)]
pub struct PrerecordedResponse {
    pub results: TranscriptionResults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionResults {
    #[serde(default)]
    pub channels: Vec<Channel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Alternative {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub confidence: f64,
    /// Paragraph-formatted transcript, present when smart formatting is on.
    /// Carries speaker labels when diarization is enabled.
    #[serde(default)]
    pub paragraphs: Option<Paragraphs>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paragraphs {
    #[serde(default)]
    pub transcript: String,
}

impl PrerecordedResponse {
    /// Best transcript for the first channel: the paragraph-formatted text
    /// when available, otherwise the plain alternative transcript.
    pub fn transcript(&self) -> Option<&str> {
        let alternative = self.results.channels.first()?.alternatives.first()?;
        match &alternative.paragraphs {
            Some(paragraphs) if !paragraphs.transcript.is_empty() => Some(&paragraphs.transcript),
            _ if !alternative.transcript.is_empty() => Some(&alternative.transcript),
            _ => None,
        }
    }
}

/// Error body returned by the service on failure statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamErrorResponse {
    #[serde(default)]
    pub err_code: Option<String>,
    #[serde(default)]
    pub err_msg: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
}
