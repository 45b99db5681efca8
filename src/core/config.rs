use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

pub const DEFAULT_REST_URL: &str = "https://api.valr.com";
pub const DEFAULT_WS_URL: &str = "wss://api.valr.com";

/// API credentials shared read-only by the REST client and every stream pipeline
#[derive(Debug, Clone)]
pub struct Credentials {
    api_key: Secret<String>,
    api_secret: Secret<String>,
    subaccount_id: Option<String>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            api_secret: Secret::new(api_secret.into()),
            subaccount_id: None,
        }
    }

    #[must_use]
    pub fn with_subaccount(mut self, subaccount_id: impl Into<String>) -> Self {
        self.subaccount_id = Some(subaccount_id.into());
        self
    }

    /// Both key and secret are non-empty
    pub fn is_complete(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.api_secret.expose_secret().is_empty()
    }

    /// Fail with a configuration error unless both key and secret are set
    pub fn ensure_complete(&self) -> Result<(), ConfigError> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(ConfigError::MissingCredentials)
        }
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get API secret (use carefully - exposes secret)
    pub fn api_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }

    pub fn subaccount_id(&self) -> Option<&str> {
        self.subaccount_id.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct ValrConfig {
    pub credentials: Credentials,
    pub base_url: Option<String>,
    pub ws_url: Option<String>,
}

// Never expose secrets in serialization
impl Serialize for ValrConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ValrConfig", 5)?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("api_secret", "[REDACTED]")?;
        state.serialize_field("subaccount_id", &self.credentials.subaccount_id)?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("ws_url", &self.ws_url)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ValrConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ValrConfigHelper {
            api_key: String,
            api_secret: String,
            subaccount_id: Option<String>,
            base_url: Option<String>,
            ws_url: Option<String>,
        }

        let helper = ValrConfigHelper::deserialize(deserializer)?;
        let mut credentials = Credentials::new(helper.api_key, helper.api_secret);
        credentials.subaccount_id = helper.subaccount_id;
        Ok(Self {
            credentials,
            base_url: helper.base_url,
            ws_url: helper.ws_url,
        })
    }
}

impl ValrConfig {
    /// Create a new configuration with API credentials
    #[must_use]
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            credentials: Credentials::new(api_key, api_secret),
            base_url: None,
            ws_url: None,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{PREFIX}_API_KEY` (e.g., `VALR_API_KEY`)
    /// - `{PREFIX}_API_SECRET`
    /// - `{PREFIX}_SUBACCOUNT_ID` (optional)
    /// - `{PREFIX}_BASE_URL` (optional)
    /// - `{PREFIX}_WS_URL` (optional)
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let prefix = prefix.to_uppercase();
        let api_key_var = format!("{}_API_KEY", prefix);
        let api_secret_var = format!("{}_API_SECRET", prefix);

        let api_key = env::var(&api_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(api_key_var))?;
        let api_secret = env::var(&api_secret_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(api_secret_var))?;

        let mut credentials = Credentials::new(api_key, api_secret);
        credentials.subaccount_id = env::var(format!("{}_SUBACCOUNT_ID", prefix)).ok();

        Ok(Self {
            credentials,
            base_url: env::var(format!("{}_BASE_URL", prefix)).ok(),
            ws_url: env::var(format!("{}_WS_URL", prefix)).ok(),
        })
    }

    /// Create configuration from a .env file and environment variables
    ///
    /// A missing file is not an error; system environment variables are used instead.
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(prefix: &str, env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(prefix)
    }

    /// Configuration for public endpoints only
    #[must_use]
    pub fn read_only() -> Self {
        Self::new(String::new(), String::new())
    }

    #[must_use]
    pub fn subaccount(mut self, subaccount_id: impl Into<String>) -> Self {
        self.credentials.subaccount_id = Some(subaccount_id.into());
        self
    }

    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    #[must_use]
    pub fn ws_url(mut self, ws_url: String) -> Self {
        self.ws_url = Some(ws_url);
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_complete()
    }

    pub fn rest_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_REST_URL)
    }

    pub fn stream_url(&self) -> &str {
        self.ws_url.as_deref().unwrap_or(DEFAULT_WS_URL)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("API key and secret are required for authenticated operations")]
    MissingCredentials,

    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
