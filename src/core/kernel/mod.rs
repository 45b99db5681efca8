/// Kernel - transport layer shared by every VALR surface
///
/// The kernel contains only transport logic and generic interfaces. It knows
/// nothing about VALR's message catalogue; the `exchanges::valr` module plugs
/// its codec, signer and records into these seams.
///
/// # Architecture
///
/// ## Transport Layer
/// - `RestClient` / `ReqwestRest`: HTTP requests with optional signing
/// - `WsTransport` / `TungsteniteTransport`: text-frame stream connections
/// - `Pipeline`: one connection with reader, writer and heartbeat tasks
/// - `EventQueue`: ordered fan-in of decoded events
///
/// ## Authentication
/// - `Signer`: pluggable request authentication, shared by REST and streams
///
/// ## Message Handling
/// - `WsCodec`: service-specific frame encoding and decoding
///
/// # Example
/// ```rust,no_run
/// use valrx::core::kernel::*;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let rest_config = RestClientConfig::new("https://api.valr.com".to_string(), "valr".to_string());
/// let rest = RestClientBuilder::new(rest_config).build()?;
/// let time = rest.get("/v1/public/time", &[], false).await?;
/// println!("{}", time);
/// # Ok(())
/// # }
/// ```
pub mod codec;
pub mod pipeline;
pub mod queue;
pub mod rest;
pub mod signer;
pub mod ws;

pub use codec::WsCodec;
pub use pipeline::{Pipeline, PipelineContext, PipelineState};
pub use queue::EventQueue;
pub use rest::{BodyEncoder, ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
pub use signer::{timestamp_ms, SignatureResult, Signer};
pub use ws::{FrameSink, FrameStream, TungsteniteTransport, WsConfig, WsTransport};
