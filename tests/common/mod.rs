//! Shared fixtures: an in-memory stream transport and sample wire payloads

#![allow(dead_code)]

use async_trait::async_trait;
use futures::channel::mpsc;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use valrx::core::kernel::{FrameSink, FrameStream, WsConfig, WsTransport};
use valrx::ValrError;

pub const API_KEY: &str = "test-api-key";
pub const API_SECRET: &str = "4961b74efac86b25cce8fbe4c9811c4c7a787b7a5996660afcc2e287ad864363";

/// Route library logs to the test harness; safe to call from every test
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("valrx=debug")
        .with_test_writer()
        .try_init();
}

/// Log output written while a closure runs
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn capture<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = Self::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        let text = String::from_utf8_lossy(&logs.0.lock().unwrap()).into_owned();
        (result, text)
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Timing that keeps heartbeats out of the way of ordinary tests
pub fn quiet_config() -> WsConfig {
    WsConfig {
        connect_timeout_ms: 1_000,
        initial_delay_ms: 60_000,
        heartbeat_interval_ms: 60_000,
    }
}

/// Server end of one in-memory connection
pub struct ServerEnd {
    pub url: String,
    pub headers: HashMap<String, String>,
    sent: mpsc::UnboundedReceiver<String>,
    inbound: mpsc::UnboundedSender<Result<String, ValrError>>,
}

impl ServerEnd {
    /// Deliver a frame to the client
    pub fn push(&self, frame: Value) {
        self.inbound
            .unbounded_send(Ok(frame.to_string()))
            .expect("client stream dropped");
    }

    pub fn push_text(&self, text: &str) {
        self.inbound
            .unbounded_send(Ok(text.to_string()))
            .expect("client stream dropped");
    }

    /// Hang up; the client sees the end of its stream
    pub fn hang_up(&self) {
        self.inbound.close_channel();
    }

    /// Next frame the client sent, parsed as JSON
    pub async fn next_sent(&mut self) -> Value {
        let frame = tokio::time::timeout(Duration::from_secs(2), self.sent.next())
            .await
            .expect("no frame sent in time")
            .expect("client sink closed");
        serde_json::from_str(&frame).expect("client sent invalid JSON")
    }

    /// Frame the client already sent, if any
    pub fn try_next_sent(&mut self) -> Option<Value> {
        match self.sent.try_next() {
            Ok(Some(frame)) => serde_json::from_str(&frame).ok(),
            _ => None,
        }
    }
}

/// Transport that hands every opened connection to the test
#[derive(Default)]
pub struct MemoryTransport {
    opens: AtomicUsize,
    accepted: Mutex<Vec<ServerEnd>>,
}

impl MemoryTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of handshakes performed so far
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Take the server end of the oldest connection not yet accepted
    pub fn accept(&self) -> ServerEnd {
        let mut accepted = self.accepted.lock().unwrap();
        assert!(!accepted.is_empty(), "no pending connection");
        accepted.remove(0)
    }
}

#[async_trait]
impl WsTransport for MemoryTransport {
    async fn open(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<(FrameSink, FrameStream), ValrError> {
        self.opens.fetch_add(1, Ordering::SeqCst);

        let (client_tx, sent) = mpsc::unbounded::<String>();
        let (inbound, client_rx) = mpsc::unbounded::<Result<String, ValrError>>();

        self.accepted.lock().unwrap().push(ServerEnd {
            url: url.to_string(),
            headers: headers.clone(),
            sent,
            inbound,
        });

        let sink = client_tx.sink_map_err(|_| ValrError::ConnectionClosed);
        Ok((Box::pin(sink), client_rx.boxed()))
    }
}

pub fn currency_info(symbol: &str) -> Value {
    json!({
        "symbol": symbol,
        "decimalPlaces": 8,
        "isActive": true,
        "shortName": symbol,
        "longName": format!("{} long name", symbol),
        "supportedWithdrawDecimalPlaces": 8,
    })
}

pub fn balance_update(available: &str) -> Value {
    json!({
        "currency": currency_info("BTC"),
        "available": available,
        "reserved": "0",
        "total": available,
        "updatedAt": "2019-05-16T13:48:06.185Z",
        "lendReserved": "0",
        "borrowCollateralReserved": "0",
        "borrowedAmount": "0",
    })
}

pub fn balance_frame(available: &str) -> Value {
    json!({"type": "BALANCE_UPDATE", "data": balance_update(available)})
}
