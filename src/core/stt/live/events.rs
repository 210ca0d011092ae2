//! Typed events for the live transcription WebSocket protocol.
//!
//! Every inbound text frame is JSON carrying a `"type"` discriminant. Known
//! discriminants map onto [`LiveEvent`] variants; anything else is degraded to
//! a synthesized `Error` event by the receive loop instead of being dropped.
//!
//! Events are immutable once parsed.

use serde::Deserialize;

use crate::core::stt::base::SttError;

/// Discriminant tag identifying which variant a received frame represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Open,
    Transcript,
    Metadata,
    SpeechStarted,
    UtteranceEnd,
    Error,
    Close,
}

impl EventKind {
    /// All event kinds, in no particular order.
    pub const ALL: [EventKind; 7] = [
        EventKind::Open,
        EventKind::Transcript,
        EventKind::Metadata,
        EventKind::SpeechStarted,
        EventKind::UtteranceEnd,
        EventKind::Error,
        EventKind::Close,
    ];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Open => "Open",
            EventKind::Transcript => "Transcript",
            EventKind::Metadata => "Metadata",
            EventKind::SpeechStarted => "SpeechStarted",
            EventKind::UtteranceEnd => "UtteranceEnd",
            EventKind::Error => "Error",
            EventKind::Close => "Close",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transcription result, partial or final.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TranscriptEvent {
    /// Transcribed text for this segment.
    pub transcript: String,
    /// Whether this segment will not be revised further.
    #[serde(default)]
    pub is_final: bool,
    /// Confidence score for the segment (0.0 to 1.0).
    #[serde(default)]
    pub confidence: f64,
}

/// Stream metadata, typically delivered once per session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetadataEvent {
    #[serde(default)]
    pub request_id: Option<String>,
    /// Audio duration processed so far, in seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub channels: Option<u32>,
}

/// The service detected the start of speech.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpeechStartedEvent {
    /// Offset of the detected speech start, in seconds.
    #[serde(default)]
    pub timestamp: f64,
}

/// The service detected the end of an utterance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UtteranceEndEvent {
    /// End time of the last word in the utterance, in seconds.
    #[serde(default)]
    pub last_word_end: f64,
}

/// Error reported by the service, or synthesized locally for unknown frames
/// and transport faults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorEvent {
    #[serde(default)]
    pub code: Option<String>,
    pub description: String,
}

/// A tagged message received over the live connection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum LiveEvent {
    Open,
    Transcript(TranscriptEvent),
    Metadata(MetadataEvent),
    SpeechStarted(SpeechStartedEvent),
    UtteranceEnd(UtteranceEndEvent),
    Error(ErrorEvent),
    Close,
}

impl LiveEvent {
    /// Parse one inbound text frame.
    ///
    /// Unknown `"type"` tags and malformed JSON are both protocol errors;
    /// callers decide whether to degrade them to a synthesized `Error` event.
    pub fn parse(text: &str) -> Result<Self, SttError> {
        serde_json::from_str(text)
            .map_err(|e| SttError::ProtocolError(format!("unrecognized frame: {e}")))
    }

    /// Synthesize an `Error` event from a protocol or transport fault.
    pub fn from_fault(code: &str, error: &SttError) -> Self {
        LiveEvent::Error(ErrorEvent {
            code: Some(code.to_string()),
            description: error.to_string(),
        })
    }

    /// The discriminant for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            LiveEvent::Open => EventKind::Open,
            LiveEvent::Transcript(_) => EventKind::Transcript,
            LiveEvent::Metadata(_) => EventKind::Metadata,
            LiveEvent::SpeechStarted(_) => EventKind::SpeechStarted,
            LiveEvent::UtteranceEnd(_) => EventKind::UtteranceEnd,
            LiveEvent::Error(_) => EventKind::Error,
            LiveEvent::Close => EventKind::Close,
        }
    }
}
