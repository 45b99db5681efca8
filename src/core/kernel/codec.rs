use crate::core::errors::ValrError;

/// Codec trait for handling service-specific WebSocket message encoding/decoding
///
/// This trait defines the contract for converting between raw text frames and
/// typed messages. The pipeline is generic over it and never inspects frames
/// itself.
pub trait WsCodec: Send + Sync + 'static {
    /// The type representing parsed inbound frames
    type Message: Send + 'static;

    /// Outbound messages the caller may send on an open connection
    type Outgoing: Send + 'static;

    /// Encode an outbound message into a text frame
    fn encode(&self, message: &Self::Outgoing) -> Result<String, ValrError>;

    /// Decode one inbound text frame
    ///
    /// # Returns
    /// - `Ok(message)` - Successfully decoded frame, control or data
    /// - `Err(error)` - The frame could not be classified or decoded
    fn decode(&self, frame: &str) -> Result<Self::Message, ValrError>;

    /// Control messages are consumed by the pipeline and never queued
    fn is_control(&self, message: &Self::Message) -> bool;

    /// Keep-alive message sent on the heartbeat schedule
    fn heartbeat(&self) -> Self::Outgoing;
}
