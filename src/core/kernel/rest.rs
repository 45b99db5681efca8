use crate::core::errors::ValrError;
use crate::core::kernel::signer::{timestamp_ms, Signer};
use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tracing::{instrument, trace};

/// REST client trait for making HTTP requests
///
/// Bodies are passed as JSON values and serialized exactly once: the bytes
/// that are signed are the bytes that are sent.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Make a GET request
    ///
    /// # Arguments
    /// * `endpoint` - The API endpoint path
    /// * `query_params` - Query parameters as key-value pairs
    /// * `authenticated` - Whether to sign the request
    async fn get(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, ValrError>;

    /// Make a POST request
    ///
    /// # Arguments
    /// * `endpoint` - The API endpoint path
    /// * `body` - Request body as JSON value
    /// * `authenticated` - Whether to sign the request
    async fn post(
        &self,
        endpoint: &str,
        body: &Value,
        authenticated: bool,
    ) -> Result<Value, ValrError>;

    /// Make a DELETE request
    ///
    /// # Returns
    /// `None` when the server acknowledged the deletion without a body
    async fn delete(
        &self,
        endpoint: &str,
        body: Option<&Value>,
        authenticated: bool,
    ) -> Result<Option<Value>, ValrError>;
}

/// Produces the exact body text for a JSON payload
pub type BodyEncoder = fn(Option<&Value>) -> Result<String, ValrError>;

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Service name for logging and tracing
    pub service_name: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl RestClientConfig {
    pub fn new(base_url: String, service_name: String) -> Self {
        Self {
            base_url,
            service_name,
            timeout_seconds: 30,
            user_agent: concat!("valrx/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the user agent string
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
    body_encoder: BodyEncoder,
}

impl RestClientBuilder {
    pub fn new(config: RestClientConfig) -> Self {
        Self {
            config,
            signer: None,
            body_encoder: compact_json,
        }
    }

    /// Set the signer for authenticated requests
    #[must_use]
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Override how request bodies are serialized before signing
    #[must_use]
    pub fn with_body_encoder(mut self, body_encoder: BodyEncoder) -> Self {
        self.body_encoder = body_encoder;
        self
    }

    pub fn build(self) -> Result<ReqwestRest, ValrError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent)
            .build()?;

        Ok(ReqwestRest {
            client,
            config: self.config,
            signer: self.signer,
            body_encoder: self.body_encoder,
        })
    }
}

fn compact_json(body: Option<&Value>) -> Result<String, ValrError> {
    match body {
        None => Ok(String::new()),
        Some(value) => Ok(serde_json::to_string(value)?),
    }
}

/// Implementation of `RestClient` using reqwest
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
    body_encoder: BodyEncoder,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .field("has_signer", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}

impl ReqwestRest {
    /// Create query string from parameters
    fn create_query_string(params: &[(&str, &str)]) -> String {
        params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Handle the response and extract JSON
    ///
    /// An object carrying a truthy `code` is an application error regardless
    /// of the status line. A body that is not JSON is an error unless it
    /// acknowledges a DELETE.
    #[instrument(skip(self, response), fields(service = %self.config.service_name, status = %response.status()))]
    async fn handle_response(
        &self,
        method: &Method,
        response: Response,
    ) -> Result<Option<Value>, ValrError> {
        let status = response.status();
        let response_text = response.text().await?;

        trace!("Response body: {}", response_text);

        match serde_json::from_str::<Value>(&response_text) {
            Ok(Value::Object(map)) => match map.get("code") {
                Some(code) if is_truthy(code) => Err(ValrError::ApiError {
                    code: code_text(code),
                    body: Value::Object(map),
                }),
                _ => Ok(Some(Value::Object(map))),
            },
            Ok(value @ Value::Array(_)) => Ok(Some(value)),
            Ok(other) => Err(ValrError::InvalidParameters(format!(
                "Unrecognised response shape: {}",
                other
            ))),
            Err(e) => {
                if !status.is_success() {
                    return Err(ValrError::HttpStatus {
                        status: status.as_u16(),
                        body: response_text,
                    });
                }
                if *method == Method::DELETE
                    && matches!(status, StatusCode::OK | StatusCode::ACCEPTED)
                {
                    return Ok(None);
                }
                Err(ValrError::JsonError(e))
            }
        }
    }

    /// Make a request with the given parameters
    #[instrument(skip(self, body), fields(service = %self.config.service_name, method = %method, endpoint = %endpoint))]
    async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        query_params: &[(&str, &str)],
        body: Option<&Value>,
        authenticated: bool,
    ) -> Result<Option<Value>, ValrError> {
        let query_string = Self::create_query_string(query_params);
        let path = if query_string.is_empty() {
            endpoint.to_string()
        } else {
            format!("{}?{}", endpoint, query_string)
        };
        let body_text = (self.body_encoder)(body)?;

        let url = format!("{}{}", self.config.base_url, path);
        let mut request = self.client.request(method.clone(), &url);

        if authenticated {
            let signer = self.signer.as_ref().ok_or_else(|| {
                ValrError::ConfigError(crate::core::config::ConfigError::MissingCredentials)
            })?;
            let headers = signer.sign_request(method.as_str(), &path, &body_text, timestamp_ms()?)?;
            for (key, value) in headers {
                request = request.header(&key, &value);
            }
        }

        if !body_text.is_empty() {
            request = request
                .header("Content-Type", "application/json")
                .body(body_text);
        }

        let response = request.send().await?;
        self.handle_response(&method, response).await
    }
}

/// Truthiness of an error `code`: null, false, zero and empty values mean no error
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn code_text(code: &Value) -> String {
    match code {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(skip(self, query_params), fields(service = %self.config.service_name, endpoint = %endpoint, param_count = query_params.len()))]
    async fn get(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, ValrError> {
        self.make_request(Method::GET, endpoint, query_params, None, authenticated)
            .await
            .map(Option::unwrap_or_default)
    }

    #[instrument(skip(self, body), fields(service = %self.config.service_name, endpoint = %endpoint))]
    async fn post(
        &self,
        endpoint: &str,
        body: &Value,
        authenticated: bool,
    ) -> Result<Value, ValrError> {
        self.make_request(Method::POST, endpoint, &[], Some(body), authenticated)
            .await
            .map(Option::unwrap_or_default)
    }

    #[instrument(skip(self, body), fields(service = %self.config.service_name, endpoint = %endpoint))]
    async fn delete(
        &self,
        endpoint: &str,
        body: Option<&Value>,
        authenticated: bool,
    ) -> Result<Option<Value>, ValrError> {
        self.make_request(Method::DELETE, endpoint, &[], body, authenticated)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(-11)));
        assert!(is_truthy(&json!("E1")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&Value::Null));
    }

    #[test]
    fn test_query_string() {
        assert_eq!(
            ReqwestRest::create_query_string(&[("skip", "0"), ("limit", "10")]),
            "skip=0&limit=10"
        );
        assert_eq!(ReqwestRest::create_query_string(&[]), "");
    }
}
