pub mod insight;
pub mod pipeline;
pub mod stt;

pub use insight::{InsightClient, InsightConfig, InsightError, PromptConfig};
pub use pipeline::{AnalysisPipeline, PipelineError};
pub use stt::{
    EventKind, FaultPolicy, LiveConfig, LiveEvent, LiveSession, PrerecordedClient,
    PrerecordedConfig, SessionState, SttError,
};
