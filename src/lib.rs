pub mod core;
pub mod exchanges;

pub use core::{
    config::{Credentials, ValrConfig},
    errors::{DecodeError, ValrError},
};
pub use exchanges::valr::{
    build_rest_client, build_stream_connector, Channel, Envelope, EventTag, Payload,
    ValrRestClient, ValrStreamConnector,
};
