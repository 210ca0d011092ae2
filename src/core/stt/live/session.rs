//! Live transcription session lifecycle.
//!
//! A [`LiveSession`] owns exactly one connection, one handler registry, and
//! two background tasks: the receive loop and, when keepalive is enabled, the
//! keepalive loop. Both tasks observe a shared [`CancellationToken`] at their
//! next wake-up, so cancellation is best-effort rather than instantaneous.
//! The send path is serialized by a single lock over the outbound sink, so
//! concurrent sends never interleave frames.
//!
//! State machine: `Idle → Connecting → Open → Closing → Closed`, with an
//! `Errored` absorption state reachable from `Connecting` or `Open`.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::config::{KEEPALIVE_TICK, LiveConfig, TICKS_PER_KEEPALIVE};
use super::events::{EventKind, LiveEvent};
use super::registry::HandlerRegistry;
use super::transport::{self, BoxedSink, BoxedStream, WireFrame};
use crate::core::stt::base::{SttError, SttResult};

/// Keepalive control frame, sent periodically while the session is open.
pub const KEEPALIVE_FRAME: &str = r#"{"type":"KeepAlive"}"#;

/// Control frame requesting a graceful end of the stream.
pub const CLOSE_STREAM_FRAME: &str = r#"{"type":"CloseStream"}"#;

/// Grace period between the close-stream frame and local teardown, giving the
/// remote a chance to flush trailing results.
const CLOSE_GRACE: Duration = Duration::from_millis(200);

/// Lifecycle state of a [`LiveSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    Open,
    Closing,
    Closed,
    Errored,
}

type SharedSink = Arc<tokio::sync::Mutex<Option<BoxedSink>>>;

/// One lifetime of a streaming transcription connection, from `start()` to
/// `finish()`. A session is single-use: at most one connection ever exists,
/// and a second `start()` fails with [`SttError::AlreadyStarted`].
pub struct LiveSession {
    /// Correlates log lines across the session's background tasks.
    id: Uuid,
    config: LiveConfig,
    registry: Arc<RwLock<HandlerRegistry>>,
    state: Arc<RwLock<SessionState>>,
    /// Exit flag shared with both background loops. Signaling it is the sole
    /// cancellation mechanism.
    exit: CancellationToken,
    /// Outbound sink; the lock doubles as the send serialization point.
    sink: SharedSink,
    receive_handle: Option<JoinHandle<()>>,
    keepalive_handle: Option<JoinHandle<()>>,
    /// Last transport fault observed by the receive loop.
    fault: Arc<Mutex<Option<SttError>>>,
    started: bool,
    finished: bool,
}

impl LiveSession {
    pub fn new(config: LiveConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            registry: Arc::new(RwLock::new(HandlerRegistry::new())),
            state: Arc::new(RwLock::new(SessionState::Idle)),
            exit: CancellationToken::new(),
            sink: Arc::new(tokio::sync::Mutex::new(None)),
            receive_handle: None,
            keepalive_handle: None,
            fault: Arc::new(Mutex::new(None)),
            started: false,
            finished: false,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    /// Last transport fault observed by the receive loop, if any.
    pub fn fault(&self) -> Option<SttError> {
        self.fault.lock().clone()
    }

    /// Register a callback for an event kind. Multiple handlers per kind are
    /// allowed and invoked in registration order.
    pub fn on<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(&LiveEvent) + Send + Sync + 'static,
    {
        self.registry.write().on(kind, Arc::new(handler));
    }

    /// Validate options, establish the connection, and launch the background
    /// loops.
    ///
    /// Returns `Ok(true)` on success. A connect failure transitions to
    /// `Errored` and either raises (`raise_on_connect`) or returns
    /// `Ok(false)`. Malformed options always raise
    /// [`SttError::ConfigurationError`].
    pub async fn start(&mut self) -> SttResult<bool> {
        self.config.validate()?;
        if self.started {
            return Err(SttError::AlreadyStarted);
        }

        *self.state.write() = SessionState::Connecting;
        match transport::connect(&self.config).await {
            Ok((sink, stream)) => {
                self.attach(sink, stream).await;
                Ok(true)
            }
            Err(e) => {
                *self.state.write() = SessionState::Errored;
                if self.config.fault_policy.raise_on_connect {
                    Err(e)
                } else {
                    warn!("live session connect failed: {e}");
                    Ok(false)
                }
            }
        }
    }

    /// Start the session over an already-established transport.
    ///
    /// Used when the caller owns connection establishment (proxies, tests).
    pub async fn start_with_transport(
        &mut self,
        sink: BoxedSink,
        stream: BoxedStream,
    ) -> SttResult<()> {
        self.config.validate()?;
        if self.started {
            return Err(SttError::AlreadyStarted);
        }
        self.attach(sink, stream).await;
        Ok(())
    }

    async fn attach(&mut self, sink: BoxedSink, stream: BoxedStream) {
        self.started = true;
        *self.sink.lock().await = Some(sink);
        *self.state.write() = SessionState::Open;
        self.registry.read().dispatch(&LiveEvent::Open);

        self.receive_handle = Some(tokio::spawn(receive_loop(
            stream,
            self.registry.clone(),
            self.state.clone(),
            self.fault.clone(),
            self.exit.clone(),
        )));

        if self.config.keepalive {
            self.keepalive_handle = Some(tokio::spawn(keepalive_loop(
                self.sink.clone(),
                self.state.clone(),
                self.exit.clone(),
            )));
        }

        info!("live session {} open", self.id);
    }

    /// Session identifier used in log output.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Transmit an audio payload.
    ///
    /// Returns `Ok(false)` without touching the socket once exit has been
    /// signaled or when no socket exists. Transport faults return `Ok(false)`
    /// unless `raise_on_send` is set.
    pub async fn send(&self, audio: Bytes) -> SttResult<bool> {
        if self.exit.is_cancelled() {
            return Ok(false);
        }
        let mut guard = self.sink.lock().await;
        // Re-check under the lock: finish() may have signaled exit while we
        // were waiting our turn.
        if self.exit.is_cancelled() {
            return Ok(false);
        }
        let Some(sink) = guard.as_mut() else {
            return Ok(false);
        };
        match sink.send(WireFrame::Binary(audio)).await {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!("audio send failed: {e}");
                if self.config.fault_policy.raise_on_send {
                    Err(e)
                } else {
                    Ok(false)
                }
            }
        }
    }

    /// Graceful, idempotent shutdown.
    ///
    /// Signals exit, sends the close-stream control frame, waits briefly,
    /// emits exactly one synthesized `Close` event before the socket handle is
    /// discarded, joins both background loops, and releases the sink. Safe to
    /// call from any state; a second call does nothing.
    ///
    /// When `raise_on_receive` is set, a transport fault recorded by the
    /// receive loop is re-raised here after teardown completes.
    pub async fn finish(&mut self) -> SttResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        {
            let mut state = self.state.write();
            if matches!(*state, SessionState::Connecting | SessionState::Open) {
                *state = SessionState::Closing;
            }
        }
        self.exit.cancel();

        if self.started {
            {
                let mut guard = self.sink.lock().await;
                if let Some(sink) = guard.as_mut()
                    && let Err(e) = sink.send(WireFrame::Text(CLOSE_STREAM_FRAME.to_string())).await
                {
                    debug!("close-stream frame not delivered: {e}");
                }
            }

            tokio::time::sleep(CLOSE_GRACE).await;

            // The Close event is always emitted locally before the socket
            // handle is discarded, whichever side initiated shutdown.
            self.registry.read().dispatch(&LiveEvent::Close);

            if let Some(handle) = self.receive_handle.take() {
                let _ = handle.await;
            }
            if let Some(handle) = self.keepalive_handle.take() {
                let _ = handle.await;
            }

            let mut guard = self.sink.lock().await;
            if let Some(sink) = guard.as_mut() {
                let _ = sink.send(WireFrame::Close).await;
            }
            *guard = None;
        }

        *self.state.write() = SessionState::Closed;
        info!("live session {} closed", self.id);

        if self.config.fault_policy.raise_on_receive
            && let Some(fault) = self.fault.lock().clone()
        {
            return Err(fault);
        }
        Ok(())
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        // Loops must never outlive the session's socket handle.
        self.exit.cancel();
    }
}

/// Reads one frame at a time until exit is signaled or the socket closes.
///
/// Each text frame is parsed and dispatched in wire-arrival order. Unknown or
/// malformed frames become a synthesized `Error` event. A clean remote close
/// transitions to `Closed` and ends the loop without an error; a transport
/// fault emits an `Error` event, records the fault, signals exit, and ends
/// the loop.
async fn receive_loop(
    mut stream: BoxedStream,
    registry: Arc<RwLock<HandlerRegistry>>,
    state: Arc<RwLock<SessionState>>,
    fault: Arc<Mutex<Option<SttError>>>,
    exit: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = exit.cancelled() => break,
            frame = stream.next() => match frame {
                Some(Ok(WireFrame::Text(text))) => {
                    let event = LiveEvent::parse(&text).unwrap_or_else(|e| {
                        warn!("degrading unparseable frame to error event: {e}");
                        LiveEvent::from_fault("unhandled-frame", &e)
                    });
                    registry.read().dispatch(&event);
                }
                Some(Ok(WireFrame::Binary(data))) => {
                    debug!("ignoring unexpected {}-byte binary frame", data.len());
                }
                Some(Ok(WireFrame::Close)) | None => {
                    info!("remote closed the live stream");
                    let mut state = state.write();
                    if *state != SessionState::Errored {
                        *state = SessionState::Closed;
                    }
                    break;
                }
                Some(Err(e)) => {
                    warn!("live receive fault: {e}");
                    registry.read().dispatch(&LiveEvent::from_fault("transport", &e));
                    *fault.lock() = Some(e);
                    *state.write() = SessionState::Errored;
                    exit.cancel();
                    break;
                }
            }
        }
    }
}

/// Sends one keepalive control frame per [`TICKS_PER_KEEPALIVE`] ticks of a
/// [`KEEPALIVE_TICK`] poll while the session remains open. Exits at the next
/// wake-up once exit is signaled.
async fn keepalive_loop(
    sink: SharedSink,
    state: Arc<RwLock<SessionState>>,
    exit: CancellationToken,
) {
    let mut ticks = 0u32;
    loop {
        tokio::select! {
            _ = exit.cancelled() => break,
            _ = tokio::time::sleep(KEEPALIVE_TICK) => {
                if *state.read() != SessionState::Open {
                    break;
                }
                ticks += 1;
                if ticks < TICKS_PER_KEEPALIVE {
                    continue;
                }
                ticks = 0;

                let mut guard = sink.lock().await;
                if exit.is_cancelled() {
                    break;
                }
                let Some(sink) = guard.as_mut() else { break };
                if let Err(e) = sink.send(WireFrame::Text(KEEPALIVE_FRAME.to_string())).await {
                    warn!("keepalive send failed: {e}");
                    break;
                }
                debug!("keepalive frame sent");
            }
        }
    }
}
