use crate::core::config::ValrConfig;
use crate::core::errors::ValrError;
use crate::core::kernel::{
    ReqwestRest, RestClientBuilder, RestClientConfig, Signer, TungsteniteTransport, WsConfig,
};
use crate::exchanges::valr::connector::ValrStreamConnector;
use crate::exchanges::valr::rest::ValrRestClient;
use crate::exchanges::valr::signer::{canonical_body, ValrSigner};
use std::sync::Arc;

fn signer_for(config: &ValrConfig) -> Option<Arc<dyn Signer>> {
    config.has_credentials().then(|| {
        Arc::new(ValrSigner::new(Arc::new(config.credentials.clone()))) as Arc<dyn Signer>
    })
}

/// Create a REST client; authenticated endpoints need credentials in `config`
pub fn build_rest_client(config: &ValrConfig) -> Result<ValrRestClient<ReqwestRest>, ValrError> {
    let rest_config = RestClientConfig::new(config.rest_url().to_string(), "valr".to_string());

    let mut rest_builder = RestClientBuilder::new(rest_config).with_body_encoder(canonical_body);
    if let Some(signer) = signer_for(config) {
        rest_builder = rest_builder.with_signer(signer);
    }

    Ok(ValrRestClient::new(rest_builder.build()?))
}

/// Create a stream connector with default timing
pub fn build_stream_connector(config: &ValrConfig) -> Result<ValrStreamConnector, ValrError> {
    build_stream_connector_with(config, WsConfig::default())
}

/// Create a stream connector with custom timing
///
/// Both stream endpoints authenticate the handshake, so credentials are required.
pub fn build_stream_connector_with(
    config: &ValrConfig,
    ws_config: WsConfig,
) -> Result<ValrStreamConnector, ValrError> {
    config.credentials.ensure_complete()?;

    Ok(ValrStreamConnector::with_transport(
        config.stream_url().to_string(),
        signer_for(config),
        Arc::new(TungsteniteTransport::new(ws_config.clone())),
        ws_config,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ConfigError;

    #[test]
    fn test_stream_connector_requires_credentials() {
        let result = build_stream_connector(&ValrConfig::read_only());
        assert!(matches!(
            result,
            Err(ValrError::ConfigError(ConfigError::MissingCredentials))
        ));
    }

    #[test]
    fn test_read_only_rest_client_builds() {
        assert!(build_rest_client(&ValrConfig::read_only()).is_ok());
    }
}
