use crate::core::errors::ValrError;
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Result type for signing operations: the authentication headers to attach
pub type SignatureResult = Result<HashMap<String, String>, ValrError>;

/// Signer trait for request authentication
///
/// Implementations produce the headers that authenticate one request. The
/// same signer authenticates REST calls and stream handshakes, so it is
/// shared behind an `Arc` and must be usable from any task.
pub trait Signer: Send + Sync {
    /// Sign a request and return the headers to include
    ///
    /// # Arguments
    /// * `method` - HTTP method in upper case (GET, POST, ...)
    /// * `path` - Request path including any query string, without the host
    /// * `body` - Exact body text that will be sent, empty for none
    /// * `timestamp` - Request timestamp in milliseconds
    fn sign_request(&self, method: &str, path: &str, body: &str, timestamp: u64)
        -> SignatureResult;
}

/// Wall clock in milliseconds since the Unix epoch
pub fn timestamp_ms() -> Result<u64, ValrError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .map_err(|e| ValrError::InvalidParameters(format!("System clock before epoch: {}", e)))
}
