//! Live (streaming) transcription client.
//!
//! Opens a persistent WebSocket to the transcription service, pushes opaque
//! audio frames, and dispatches the typed event messages it receives (open,
//! partial/final transcript, metadata, speech-started, utterance-end, error,
//! close) to registered handlers in wire-arrival order.

pub mod config;
pub mod events;
pub mod registry;
pub mod session;
pub mod transport;


pub use config::{DEFAULT_LIVE_URL, FaultPolicy, LiveConfig};
pub use events::{
    ErrorEvent, EventKind, LiveEvent, MetadataEvent, SpeechStartedEvent, TranscriptEvent,
    UtteranceEndEvent,
};
pub use registry::{EventHandler, HandlerRegistry};
pub use session::{CLOSE_STREAM_FRAME, KEEPALIVE_FRAME, LiveSession, SessionState};
pub use transport::{BoxedSink, BoxedStream, FrameSink, FrameStream, WireFrame};
