use crate::core::errors::ValrError;
use async_trait::async_trait;
use futures_util::future;
use futures_util::sink::Sink;
use futures_util::stream::BoxStream;
use futures_util::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::pin::Pin;
use std::time::Duration;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::tungstenite::protocol::Message;
use tracing::{debug, instrument, trace};

/// Outbound half of an open connection, carrying text frames
pub type FrameSink = Pin<Box<dyn Sink<String, Error = ValrError> + Send>>;

/// Inbound half of an open connection; ends or errors when the peer goes away
pub type FrameStream = BoxStream<'static, Result<String, ValrError>>;

/// Stream pipeline timing
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Delay before the first heartbeat, leaving room for the handshake to authenticate
    pub initial_delay_ms: u64,
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval_ms: u64,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 10_000,    // 10 seconds
            initial_delay_ms: 1_000,       // 1 second
            heartbeat_interval_ms: 25_000, // server drops idle sockets after 30s
        }
    }
}

impl WsConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }
}

/// Opens text-frame connections. The pipeline only ever talks to this trait.
#[async_trait]
pub trait WsTransport: Send + Sync + 'static {
    /// Perform the handshake with the given headers and split the connection
    async fn open(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<(FrameSink, FrameStream), ValrError>;
}

/// Tungstenite-based transport
#[derive(Debug, Clone, Default)]
pub struct TungsteniteTransport {
    config: WsConfig,
}

impl TungsteniteTransport {
    pub fn new(config: WsConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl WsTransport for TungsteniteTransport {
    #[instrument(skip(self, headers), fields(url = %url, header_count = headers.len()))]
    async fn open(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<(FrameSink, FrameStream), ValrError> {
        let mut request = url
            .into_client_request()
            .map_err(|e| ValrError::InvalidParameters(format!("Invalid WebSocket URL: {}", e)))?;

        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ValrError::InvalidParameters(format!("Invalid header name: {}", e)))?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ValrError::InvalidParameters(format!("Invalid header value: {}", e))
            })?;
            request.headers_mut().insert(name, value);
        }

        let (ws_stream, _) = tokio::time::timeout(self.config.connect_timeout(), connect_async(request))
            .await
            .map_err(|_| ValrError::NetworkError("WebSocket connection timeout".to_string()))?
            .map_err(|e| ValrError::NetworkError(format!("WebSocket connection failed: {}", e)))?;
        debug!("WebSocket handshake complete");

        let (write, read) = ws_stream.split();

        let sink = write
            .sink_map_err(|e| ValrError::NetworkError(format!("Failed to send WebSocket message: {}", e)))
            .with(|text: String| future::ready(Ok::<_, ValrError>(Message::Text(text))));

        let stream = read.filter_map(|message| {
            future::ready(match message {
                Ok(Message::Text(text)) => Some(Ok(text)),
                Ok(Message::Binary(bytes)) => Some(String::from_utf8(bytes).map_err(|e| {
                    ValrError::NetworkError(format!("Non UTF-8 binary frame: {}", e))
                })),
                Ok(Message::Close(frame)) => {
                    trace!(?frame, "Close frame received");
                    Some(Err(ValrError::ConnectionClosed))
                }
                // ping/pong are answered by tungstenite itself
                Ok(_) => None,
                Err(e) => Some(Err(ValrError::NetworkError(format!("WebSocket error: {}", e)))),
            })
        });

        Ok((Box::pin(sink), stream.boxed()))
    }
}
