pub mod base;
pub mod live;
pub mod prerecorded;

// Re-export public types
pub use base::{ListenVersion, SttError, SttResult};
pub use live::{
    EventKind, FaultPolicy, HandlerRegistry, LiveConfig, LiveEvent, LiveSession, SessionState,
};
pub use prerecorded::{PrerecordedClient, PrerecordedConfig};
