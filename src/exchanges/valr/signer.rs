use crate::core::config::Credentials;
use crate::core::errors::ValrError;
use crate::core::kernel::{timestamp_ms, SignatureResult, Signer};
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha512;
use std::collections::HashMap;
use std::sync::Arc;

type HmacSha512 = Hmac<Sha512>;

pub const API_KEY_HEADER: &str = "X-VALR-API-KEY";
pub const SIGNATURE_HEADER: &str = "X-VALR-SIGNATURE";
pub const TIMESTAMP_HEADER: &str = "X-VALR-TIMESTAMP";
pub const SUBACCOUNT_HEADER: &str = "X-VALR-SUB-ACCOUNT-ID";

/// HMAC-SHA512 over `timestamp || METHOD || path || body || subaccount`, hex encoded
pub fn request_signature(
    api_secret: &str,
    method: &str,
    path: &str,
    body: &str,
    timestamp: u64,
    subaccount_id: Option<&str>,
) -> Result<String, ValrError> {
    let mut mac = HmacSha512::new_from_slice(api_secret.as_bytes()).map_err(|e| {
        crate::core::config::ConfigError::InvalidConfiguration(format!(
            "Invalid API secret: {}",
            e
        ))
    })?;

    mac.update(timestamp.to_string().as_bytes());
    mac.update(method.to_uppercase().as_bytes());
    mac.update(path.as_bytes());
    mac.update(body.as_bytes());
    if let Some(subaccount_id) = subaccount_id {
        mac.update(subaccount_id.as_bytes());
    }

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// The exact body text that is both signed and sent: empty for no body,
/// compact JSON with sorted keys otherwise
pub fn canonical_body(body: Option<&Value>) -> Result<String, ValrError> {
    match body {
        None | Some(Value::Null) => Ok(String::new()),
        Some(value) => Ok(serde_json::to_string(value)?),
    }
}

/// Authentication headers for a request signed at `timestamp`
pub fn headers_at(
    credentials: &Credentials,
    method: &str,
    path: &str,
    body: &str,
    timestamp: u64,
) -> SignatureResult {
    credentials.ensure_complete()?;

    let signature = request_signature(
        credentials.api_secret(),
        method,
        path,
        body,
        timestamp,
        credentials.subaccount_id(),
    )?;

    let mut headers = HashMap::with_capacity(4);
    headers.insert(API_KEY_HEADER.to_string(), credentials.api_key().to_string());
    headers.insert(SIGNATURE_HEADER.to_string(), signature);
    headers.insert(TIMESTAMP_HEADER.to_string(), timestamp.to_string());
    if let Some(subaccount_id) = credentials.subaccount_id() {
        headers.insert(SUBACCOUNT_HEADER.to_string(), subaccount_id.to_string());
    }
    Ok(headers)
}

/// Authentication headers stamped with the current wall clock
pub fn generate_headers(
    credentials: &Credentials,
    method: &str,
    path: &str,
    body: &str,
) -> SignatureResult {
    headers_at(credentials, method, path, body, timestamp_ms()?)
}

/// Signs REST requests and stream handshakes with one set of credentials
#[derive(Debug, Clone)]
pub struct ValrSigner {
    credentials: Arc<Credentials>,
}

impl ValrSigner {
    pub fn new(credentials: Arc<Credentials>) -> Self {
        Self { credentials }
    }
}

impl Signer for ValrSigner {
    fn sign_request(
        &self,
        method: &str,
        path: &str,
        body: &str,
        timestamp: u64,
    ) -> SignatureResult {
        headers_at(&self.credentials, method, path, body, timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ConfigError;
    use serde_json::json;

    const SECRET: &str = "4961b74efac86b25cce8fbe4c9811c4c7a787b7a5996660afcc2e287ad864363";

    #[test]
    fn test_known_signature() {
        let signature =
            request_signature(SECRET, "GET", "/v1/account/balances", "", 1_558_014_486_185, None)
                .unwrap();
        assert_eq!(
            signature,
            "9d52c181ed69460b49307b7891f04658e938b21181173844b5018b2fe783a6d4c62b8e67a03de4d099e7437ebfabe12c56233b73c6a0cc0f7ae87e05f6289928"
        );
    }

    #[test]
    fn test_method_is_upper_cased() {
        let lower = request_signature(SECRET, "get", "/v1/x", "", 1, None).unwrap();
        let upper = request_signature(SECRET, "GET", "/v1/x", "", 1, None).unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_subaccount_changes_signature() {
        let plain = request_signature(SECRET, "GET", "/v1/x", "", 1, None).unwrap();
        let sub = request_signature(SECRET, "GET", "/v1/x", "", 1, Some("123")).unwrap();
        assert_ne!(plain, sub);
        assert_eq!(sub.len(), 128);
    }

    #[test]
    fn test_canonical_body() {
        assert_eq!(canonical_body(None).unwrap(), "");
        assert_eq!(
            canonical_body(Some(&json!({"side": "BUY", "pair": "BTCZAR"}))).unwrap(),
            r#"{"pair":"BTCZAR","side":"BUY"}"#
        );
    }

    #[test]
    fn test_headers() {
        let credentials = Credentials::new("key", SECRET).with_subaccount("77");
        let headers = headers_at(&credentials, "GET", "/ws/account", "", 42).unwrap();
        assert_eq!(headers.len(), 4);
        assert_eq!(headers[API_KEY_HEADER], "key");
        assert_eq!(headers[TIMESTAMP_HEADER], "42");
        assert_eq!(headers[SUBACCOUNT_HEADER], "77");
        assert_eq!(
            headers[SIGNATURE_HEADER],
            request_signature(SECRET, "GET", "/ws/account", "", 42, Some("77")).unwrap()
        );
    }

    #[test]
    fn test_missing_credentials() {
        let credentials = Credentials::new("", SECRET);
        let result = generate_headers(&credentials, "GET", "/v1/account/balances", "");
        assert!(matches!(
            result,
            Err(ValrError::ConfigError(ConfigError::MissingCredentials))
        ));
    }
}
