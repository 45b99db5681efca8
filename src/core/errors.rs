use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValrError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A well-formed response whose body carries an application error code
    #[error("API error: {code} - {body}")]
    ApiError { code: String, body: serde_json::Value },

    /// Non-2xx status with a body that is not JSON
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Decode error: {0}")]
    DecodeError(#[from] DecodeError),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Connection closed")]
    ConnectionClosed,
}

/// Failures raised while turning a wire payload into a typed record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("field `{field}`: expected {expected}, received {received}")]
    Mismatch {
        field: String,
        expected: String,
        received: String,
    },

    #[error("{record} has no field `{field}`")]
    UnknownField { record: String, field: String },

    #[error("keys collapse to the same field `{key}` after normalization")]
    DuplicateKey { key: String },

    #[error("unknown event type `{0}`")]
    UnknownEvent(String),

    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    #[error("failed to build {record}: {reason}")]
    Materialize { record: String, reason: String },
}

impl DecodeError {
    pub(crate) fn mismatch(
        field: &str,
        expected: impl Into<String>,
        received: &serde_json::Value,
    ) -> Self {
        Self::Mismatch {
            field: field.to_string(),
            expected: expected.into(),
            received: received.to_string(),
        }
    }

    /// Path of the offending field, when the error is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Mismatch { field, .. } | Self::UnknownField { field, .. } => Some(field),
            Self::DuplicateKey { key } => Some(key),
            _ => None,
        }
    }
}
