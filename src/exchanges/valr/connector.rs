use crate::core::config::DEFAULT_WS_URL;
use crate::core::errors::ValrError;
use crate::core::kernel::{
    EventQueue, Pipeline, PipelineContext, Signer, TungsteniteTransport, WsConfig, WsTransport,
};
use crate::exchanges::valr::codec::{Envelope, Outgoing, ValrCodec};
use crate::exchanges::valr::enums::{Channel, EventTag};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

type ValrPipeline = Pipeline<ValrCodec>;

/// Owns at most one live pipeline per channel and the queue they all feed
pub struct ValrStreamConnector {
    context: PipelineContext<ValrCodec>,
    pipelines: Mutex<HashMap<Channel, Arc<ValrPipeline>>>,
}

impl std::fmt::Debug for ValrStreamConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValrStreamConnector")
            .field("base_url", &self.context.base_url)
            .field("authenticated", &self.context.signer.is_some())
            .finish_non_exhaustive()
    }
}

impl ValrStreamConnector {
    pub fn new(context: PipelineContext<ValrCodec>) -> Self {
        Self {
            context,
            pipelines: Mutex::new(HashMap::new()),
        }
    }

    /// Connector over tokio-tungstenite against the production endpoint, signing every handshake
    pub fn with_signer(signer: Arc<dyn Signer>) -> Self {
        let config = WsConfig::default();
        Self::with_transport(
            DEFAULT_WS_URL.to_string(),
            Some(signer),
            Arc::new(TungsteniteTransport::new(config.clone())),
            config,
        )
    }

    /// Connector over any transport; tests drive it in memory
    pub fn with_transport(
        base_url: String,
        signer: Option<Arc<dyn Signer>>,
        transport: Arc<dyn WsTransport>,
        config: WsConfig,
    ) -> Self {
        Self::new(PipelineContext {
            base_url,
            signer,
            transport,
            codec: Arc::new(ValrCodec),
            queue: Arc::new(EventQueue::new()),
            config,
        })
    }

    /// Open the account stream. Account events need no subscription.
    pub async fn subscribe_account(&self) -> Result<(), ValrError> {
        self.open_channel(Channel::Account, Vec::new()).await
    }

    /// Subscribe to a market event for the given pairs
    ///
    /// The first subscription opens the trade stream with the subscription as
    /// its opening message; later ones are sent on the live connection.
    #[instrument(skip(self, symbols), fields(event = %event))]
    pub async fn subscribe_market(
        &self,
        event: EventTag,
        symbols: &[impl AsRef<str> + Send + Sync],
    ) -> Result<(), ValrError> {
        if event.channel() != Some(Channel::Market) {
            return Err(ValrError::InvalidParameters(format!(
                "{} is not a market event",
                event
            )));
        }
        let message = Outgoing::subscribe(event, symbols);

        let mut pipelines = self.pipelines.lock().await;
        if let Some(pipeline) = pipelines.get(&Channel::Market).filter(|p| !p.is_closed()) {
            debug!("Adding subscription to live market pipeline");
            return pipeline.send(&message);
        }

        let pipeline = self.start_pipeline(Channel::Market, vec![message]).await?;
        pipelines.insert(Channel::Market, pipeline);
        Ok(())
    }

    /// Open a channel with the given opening messages
    ///
    /// Fails with `InvariantViolation` if the channel already has a live
    /// pipeline; no second connection is made. A closed pipeline is replaced.
    #[instrument(skip(self, opening), fields(channel = %channel, opening = opening.len()))]
    pub async fn open_channel(
        &self,
        channel: Channel,
        opening: Vec<Outgoing>,
    ) -> Result<(), ValrError> {
        let mut pipelines = self.pipelines.lock().await;
        if let Some(existing) = pipelines.get(&channel) {
            if !existing.is_closed() {
                return Err(ValrError::InvariantViolation(format!(
                    "Already have a pipeline for {}",
                    channel
                )));
            }
            info!("Replacing closed pipeline");
        }

        let pipeline = self.start_pipeline(channel, opening).await?;
        pipelines.insert(channel, pipeline);
        Ok(())
    }

    async fn start_pipeline(
        &self,
        channel: Channel,
        opening: Vec<Outgoing>,
    ) -> Result<Arc<ValrPipeline>, ValrError> {
        let pipeline = Pipeline::new(self.context.clone(), channel.path(), opening);
        pipeline.start().await?;
        Ok(pipeline)
    }

    /// Send a message on an open channel
    pub async fn send(&self, channel: Channel, message: &Outgoing) -> Result<(), ValrError> {
        let pipelines = self.pipelines.lock().await;
        let pipeline = pipelines
            .get(&channel)
            .ok_or_else(|| ValrError::InvalidParameters(format!("No pipeline for {}", channel)))?;
        pipeline.send(message)
    }

    /// Close and forget a channel's pipeline
    ///
    /// # Returns
    /// The error that had already terminated the pipeline, if any
    pub async fn close_channel(&self, channel: Channel) -> Option<ValrError> {
        let pipeline = self.pipelines.lock().await.remove(&channel)?;
        let terminal = pipeline.take_error().await;
        pipeline.close().await;
        terminal
    }

    /// Close every pipeline
    pub async fn close(&self) {
        let pipelines: Vec<_> = self.pipelines.lock().await.drain().collect();
        for (channel, pipeline) in pipelines {
            debug!(channel = %channel, "Closing pipeline");
            pipeline.close().await;
        }
    }

    pub async fn is_open(&self, channel: Channel) -> bool {
        self.pipelines
            .lock()
            .await
            .get(&channel)
            .is_some_and(|p| !p.is_closed())
    }

    /// The pipeline currently registered for a channel, live or closed
    pub async fn pipeline(&self, channel: Channel) -> Option<Arc<ValrPipeline>> {
        self.pipelines.lock().await.get(&channel).cloned()
    }

    /// The queue every pipeline of this connector feeds
    pub fn queue(&self) -> Arc<EventQueue<Envelope>> {
        self.context.queue.clone()
    }

    /// Wait for the next data event from any channel
    pub async fn next_event(&self) -> Option<Envelope> {
        self.context.queue.pop().await
    }
}
