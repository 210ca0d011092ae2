//! Transport seam for the live transcription session.
//!
//! The session talks to the socket through the [`FrameSink`]/[`FrameStream`]
//! pair so the production WebSocket transport and in-memory test transports
//! are interchangeable. Outbound audio travels as opaque binary frames;
//! control messages and inbound events are JSON text frames.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info};

use super::config::LiveConfig;
use crate::core::stt::base::{SttError, SttResult};

/// One frame on the wire, in either direction.
#[derive(Debug, Clone, PartialEq)]
pub enum WireFrame {
    /// JSON text frame (events inbound, control messages outbound).
    Text(String),
    /// Opaque audio payload.
    Binary(Bytes),
    /// Transport-level close.
    Close,
}

/// Outbound half of the connection.
#[async_trait]
pub trait FrameSink: Send {
    async fn send(&mut self, frame: WireFrame) -> SttResult<()>;
}

/// Inbound half of the connection. `None` means the remote peer ended the
/// stream cleanly.
#[async_trait]
pub trait FrameStream: Send {
    async fn next(&mut self) -> Option<SttResult<WireFrame>>;
}

pub type BoxedSink = Box<dyn FrameSink>;
pub type BoxedStream = Box<dyn FrameStream>;

type WsSplitSink =
    futures_util::stream::SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsSplitStream = futures_util::stream::SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

struct WsSink(WsSplitSink);

#[async_trait]
impl FrameSink for WsSink {
    async fn send(&mut self, frame: WireFrame) -> SttResult<()> {
        let message = match frame {
            WireFrame::Text(text) => Message::Text(text.into()),
            WireFrame::Binary(data) => Message::Binary(data),
            WireFrame::Close => Message::Close(None),
        };
        self.0
            .send(message)
            .await
            .map_err(|e| SttError::TransportError(format!("websocket send failed: {e}")))
    }
}

struct WsStream(WsSplitStream);

#[async_trait]
impl FrameStream for WsStream {
    async fn next(&mut self) -> Option<SttResult<WireFrame>> {
        loop {
            return match self.0.next().await? {
                Ok(Message::Text(text)) => Some(Ok(WireFrame::Text(text.to_string()))),
                Ok(Message::Binary(data)) => Some(Ok(WireFrame::Binary(data))),
                Ok(Message::Close(frame)) => {
                    debug!("websocket closed by remote: {frame:?}");
                    Some(Ok(WireFrame::Close))
                }
                // Ping/pong are handled by the protocol layer; skip them.
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
                Ok(_) => continue,
                Err(e) => Some(Err(SttError::TransportError(format!(
                    "websocket receive failed: {e}"
                )))),
            };
        }
    }
}

/// Establish the WebSocket connection described by `config` and split it into
/// boxed sink and stream halves.
pub async fn connect(config: &LiveConfig) -> SttResult<(BoxedSink, BoxedStream)> {
    let url = config.build_websocket_url()?;

    let mut request = url
        .as_str()
        .into_client_request()
        .map_err(|e| SttError::ConfigurationError(format!("invalid websocket URL: {e}")))?;

    let auth_value = format!("Token {}", config.api_key)
        .parse()
        .map_err(|e| SttError::ConfigurationError(format!("invalid API key header: {e}")))?;
    request.headers_mut().insert(http::header::AUTHORIZATION, auth_value);

    for (name, value) in &config.headers {
        let name: http::header::HeaderName = name
            .parse()
            .map_err(|e| SttError::ConfigurationError(format!("invalid header name: {e}")))?;
        let value = value
            .parse()
            .map_err(|e| SttError::ConfigurationError(format!("invalid header value: {e}")))?;
        request.headers_mut().insert(name, value);
    }

    let (ws_stream, _response) = connect_async(request)
        .await
        .map_err(|e| SttError::TransportError(format!("websocket connect failed: {e}")))?;

    info!("connected to live transcription endpoint");

    let (sink, stream) = ws_stream.split();
    Ok((Box::new(WsSink(sink)), Box::new(WsStream(stream))))
}
