//! One long-lived stream connection.
//!
//! A pipeline owns a single transport connection and three tasks:
//!
//! - the **reader** decodes every inbound frame, drops control messages and
//!   pushes everything else onto the shared [`EventQueue`];
//! - the **writer** owns the sink and drains the outbound channel, so
//!   [`Pipeline::send`] is safe while frames are being received;
//! - the **heartbeat** sends the codec's keep-alive after an initial delay
//!   and then on a fixed interval.
//!
//! Any transport or decode error ends the pipeline. The error is kept as the
//! pipeline's terminal result and nothing is retried.

use crate::core::errors::ValrError;
use crate::core::kernel::codec::WsCodec;
use crate::core::kernel::queue::EventQueue;
use crate::core::kernel::signer::{timestamp_ms, Signer};
use crate::core::kernel::ws::{FrameSink, FrameStream, WsConfig, WsTransport};
use futures_util::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::time::{interval_at, Instant};
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Created,
    Connecting,
    Open,
    Streaming,
    Closed,
}

pub struct Pipeline<C: WsCodec> {
    url: String,
    path: String,
    signer: Option<Arc<dyn Signer>>,
    transport: Arc<dyn WsTransport>,
    codec: Arc<C>,
    queue: Arc<EventQueue<C::Message>>,
    config: WsConfig,
    opening: Mutex<Vec<C::Outgoing>>,
    outbound_tx: mpsc::UnboundedSender<String>,
    outbound_rx: Mutex<Option<mpsc::UnboundedReceiver<String>>>,
    state: watch::Sender<PipelineState>,
    terminal: Mutex<Option<ValrError>>,
}

impl<C: WsCodec> std::fmt::Debug for Pipeline<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("url", &self.url)
            .field("state", &self.state())
            .field("authenticated", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}

/// Everything a pipeline needs besides its path and opening messages
pub struct PipelineContext<C: WsCodec> {
    pub base_url: String,
    pub signer: Option<Arc<dyn Signer>>,
    pub transport: Arc<dyn WsTransport>,
    pub codec: Arc<C>,
    pub queue: Arc<EventQueue<C::Message>>,
    pub config: WsConfig,
}

impl<C: WsCodec> Clone for PipelineContext<C> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            signer: self.signer.clone(),
            transport: self.transport.clone(),
            codec: self.codec.clone(),
            queue: self.queue.clone(),
            config: self.config.clone(),
        }
    }
}

impl<C: WsCodec> Pipeline<C> {
    pub fn new(context: PipelineContext<C>, path: &str, opening: Vec<C::Outgoing>) -> Arc<Self> {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (state, _) = watch::channel(PipelineState::Created);
        Arc::new(Self {
            url: format!("{}{}", context.base_url, path),
            path: path.to_string(),
            signer: context.signer,
            transport: context.transport,
            codec: context.codec,
            queue: context.queue,
            config: context.config,
            opening: Mutex::new(opening),
            outbound_tx,
            outbound_rx: Mutex::new(Some(outbound_rx)),
            state,
            terminal: Mutex::new(None),
        })
    }

    pub fn state(&self) -> PipelineState {
        *self.state.borrow()
    }

    pub fn is_closed(&self) -> bool {
        self.state() == PipelineState::Closed
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Connect, send the opening messages in order and spawn the stream tasks
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn start(self: &Arc<Self>) -> Result<(), ValrError> {
        if !self.transition_from(PipelineState::Created, PipelineState::Connecting) {
            return Err(ValrError::InvariantViolation(format!(
                "Pipeline for {} was already started",
                self.url
            )));
        }

        match self.connect().await {
            Ok((sink, stream)) => {
                self.transition_from(PipelineState::Open, PipelineState::Streaming);
                self.spawn_tasks(sink, stream).await;
                info!("Pipeline streaming");
                Ok(())
            }
            Err(e) => {
                warn!("Pipeline failed to start: {}", e);
                self.transition(PipelineState::Closed);
                Err(e)
            }
        }
    }

    async fn connect(&self) -> Result<(FrameSink, FrameStream), ValrError> {
        // headers carry a timestamp, so they are produced right before the handshake
        let headers = match &self.signer {
            Some(signer) => signer.sign_request("GET", &self.path, "", timestamp_ms()?)?,
            None => HashMap::new(),
        };

        let (mut sink, stream) = self.transport.open(&self.url, &headers).await?;
        self.transition_from(PipelineState::Connecting, PipelineState::Open);

        let opening: Vec<C::Outgoing> = self.opening.lock().await.drain(..).collect();
        for message in &opening {
            let frame = self.codec.encode(message)?;
            debug!(frame = %frame, "Sending opening message");
            sink.send(frame).await?;
        }
        Ok((sink, stream))
    }

    async fn spawn_tasks(self: &Arc<Self>, sink: FrameSink, stream: FrameStream) {
        if let Some(outbound_rx) = self.outbound_rx.lock().await.take() {
            tokio::spawn(Arc::clone(self).run_writer(sink, outbound_rx));
        }
        tokio::spawn(Arc::clone(self).run_reader(stream));
        tokio::spawn(Arc::clone(self).run_heartbeat());
    }

    async fn run_reader(self: Arc<Self>, mut stream: FrameStream) {
        let closed = self.closed();
        tokio::pin!(closed);

        loop {
            tokio::select! {
                () = &mut closed => break,
                frame = stream.next() => match frame {
                    Some(Ok(text)) => match self.codec.decode(&text) {
                        Ok(message) if self.codec.is_control(&message) => {}
                        Ok(message) => self.queue.push(message),
                        Err(e) => {
                            self.shutdown(Some(e)).await;
                            break;
                        }
                    },
                    Some(Err(e)) => {
                        self.shutdown(Some(e)).await;
                        break;
                    }
                    None => {
                        self.shutdown(Some(ValrError::ConnectionClosed)).await;
                        break;
                    }
                },
            }
        }
        debug!(url = %self.url, "Reader stopped");
    }

    async fn run_writer(
        self: Arc<Self>,
        mut sink: FrameSink,
        mut outbound_rx: mpsc::UnboundedReceiver<String>,
    ) {
        let closed = self.closed();
        tokio::pin!(closed);

        loop {
            tokio::select! {
                () = &mut closed => break,
                frame = outbound_rx.recv() => match frame {
                    Some(frame) => {
                        if let Err(e) = sink.send(frame).await {
                            self.shutdown(Some(e)).await;
                            break;
                        }
                    }
                    None => break,
                },
            }
        }

        if let Err(e) = sink.close().await {
            debug!("Error closing sink: {}", e);
        }
        debug!(url = %self.url, "Writer stopped");
    }

    async fn run_heartbeat(self: Arc<Self>) {
        let closed = self.closed();
        tokio::pin!(closed);

        let start = Instant::now() + self.config.initial_delay();
        let mut ticker = interval_at(start, self.config.heartbeat_interval());

        loop {
            tokio::select! {
                () = &mut closed => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.send(&self.codec.heartbeat()) {
                        debug!("Heartbeat stopped: {}", e);
                        break;
                    }
                }
            }
        }
    }

    /// Queue a message for the writer
    pub fn send(&self, message: &C::Outgoing) -> Result<(), ValrError> {
        if self.is_closed() {
            return Err(ValrError::ConnectionClosed);
        }
        let frame = self.codec.encode(message)?;
        self.outbound_tx
            .send(frame)
            .map_err(|_| ValrError::ConnectionClosed)
    }

    /// Close the connection. Closed is terminal; nothing reconnects.
    pub async fn close(&self) {
        self.shutdown(None).await;
    }

    /// Resolves once the pipeline reaches `Closed`
    pub fn closed(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let mut state = self.state.subscribe();
        async move {
            let _ = state.wait_for(|s| *s == PipelineState::Closed).await;
        }
    }

    /// The error that ended the pipeline, if it ended on one
    pub async fn take_error(&self) -> Option<ValrError> {
        self.terminal.lock().await.take()
    }

    async fn shutdown(&self, cause: Option<ValrError>) {
        let mut terminal = self.terminal.lock().await;
        if self.is_closed() {
            return;
        }
        if let Some(e) = cause {
            error!(url = %self.url, "Pipeline terminated: {}", e);
            *terminal = Some(e);
        } else {
            info!(url = %self.url, "Pipeline closed");
        }
        self.transition(PipelineState::Closed);
    }

    fn transition(&self, next: PipelineState) -> bool {
        self.state.send_if_modified(|state| {
            if *state == PipelineState::Closed || *state == next {
                false
            } else {
                *state = next;
                true
            }
        })
    }

    fn transition_from(&self, expected: PipelineState, next: PipelineState) -> bool {
        self.state.send_if_modified(|state| {
            if *state == expected {
                *state = next;
                true
            } else {
                false
            }
        })
    }
}
