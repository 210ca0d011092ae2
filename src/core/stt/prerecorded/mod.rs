//! Prerecorded (batch) transcription over REST.

pub mod client;
pub mod config;
pub mod messages;

pub use client::PrerecordedClient;
pub use config::{DEFAULT_PRERECORDED_URL, PrerecordedConfig};
pub use messages::{PrerecordedResponse, UpstreamErrorResponse};
