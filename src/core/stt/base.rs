//! Shared speech-to-text types used by both the live (WebSocket) and
//! prerecorded (REST) clients.

use thiserror::Error;

/// Errors produced by the STT clients.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SttError {
    /// Options were malformed before any connection was attempted.
    #[error("configuration error: {0}")]
    ConfigurationError(String),

    /// A session already owns a connection; one connection per session.
    #[error("session already started")]
    AlreadyStarted,

    /// Socket-level fault during connect, send, or receive.
    #[error("transport error: {0}")]
    TransportError(String),

    /// Unparseable or unknown frame on the wire.
    #[error("protocol error: {0}")]
    ProtocolError(String),

    /// The remote service returned a failure status.
    #[error("upstream error ({status}): {message}")]
    UpstreamError { status: u16, message: String },
}

pub type SttResult<T> = Result<T, SttError>;

impl SttError {
    /// Transient faults worth retrying with backoff (batch path only).
    pub fn is_retryable(&self) -> bool {
        match self {
            SttError::TransportError(_) => true,
            SttError::UpstreamError { status, .. } => {
                *status == 429 || (500..=599).contains(status)
            }
            _ => false,
        }
    }
}

/// Supported listen API protocol versions.
///
/// The version set is closed at build time; the variant selects the URL path
/// directly rather than assembling a module name from a version string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListenVersion {
    #[default]
    V1,
}

impl ListenVersion {
    /// URL path prefix for this protocol version.
    #[inline]
    pub fn path(&self) -> &'static str {
        match self {
            ListenVersion::V1 => "/v1/listen",
        }
    }
}

impl std::fmt::Display for ListenVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenVersion::V1 => write!(f, "v1"),
        }
    }
}
