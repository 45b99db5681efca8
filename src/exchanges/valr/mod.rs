pub mod builder;
pub mod codec;
pub mod connector;
pub mod enums;
pub mod rest;
pub mod signer;
pub mod types;

// Re-export main types for easier importing
pub use builder::{build_rest_client, build_stream_connector, build_stream_connector_with};
pub use codec::{Envelope, Outgoing, Payload, ValrCodec};
pub use connector::ValrStreamConnector;
pub use enums::{
    Channel, EventTag, OrderSide, OrderType, TimeInForce, TransactionType, TriggerOrderType,
};
pub use rest::{LimitOrderRequest, OrderRef, ValrRestClient};
pub use signer::{canonical_body, generate_headers, request_signature, ValrSigner};
