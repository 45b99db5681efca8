mod common;

use common::{currency_info, API_KEY, API_SECRET};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use valrx::core::config::ConfigError;
use valrx::exchanges::valr::signer::{
    request_signature, API_KEY_HEADER, SIGNATURE_HEADER, SUBACCOUNT_HEADER, TIMESTAMP_HEADER,
};
use valrx::exchanges::valr::{LimitOrderRequest, OrderRef, OrderSide};
use valrx::{build_rest_client, ValrConfig, ValrError};
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn authenticated(server: &MockServer) -> ValrConfig {
    ValrConfig::new(API_KEY.to_string(), API_SECRET.to_string()).base_url(server.uri())
}

fn header_value<'a>(request: &'a Request, name: &str) -> &'a str {
    request
        .headers
        .get(name)
        .unwrap_or_else(|| panic!("missing header {}", name))
        .to_str()
        .unwrap()
}

/// Recompute the signature the server should have received
fn assert_signed(request: &Request, signed_path: &str, subaccount: Option<&str>) {
    let timestamp: u64 = header_value(request, TIMESTAMP_HEADER).parse().unwrap();
    let body = String::from_utf8(request.body.clone()).unwrap();
    let expected = request_signature(
        API_SECRET,
        request.method.as_str(),
        signed_path,
        &body,
        timestamp,
        subaccount,
    )
    .unwrap();
    assert_eq!(header_value(request, SIGNATURE_HEADER), expected);
    assert_eq!(header_value(request, API_KEY_HEADER), API_KEY);
}

#[tokio::test]
async fn test_public_endpoint_is_unsigned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/public/time"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "epochTime": 1558014486,
            "time": "2019-05-16T13:48:06.185Z",
        })))
        .mount(&server)
        .await;

    let client = build_rest_client(&ValrConfig::read_only().base_url(server.uri())).unwrap();
    let time = client.server_time().await.unwrap();
    assert_eq!(time.epoch_time, 1558014486);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get(SIGNATURE_HEADER).is_none());
}

#[tokio::test]
async fn test_list_endpoint_decodes_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/public/currencies"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([currency_info("BTC"), currency_info("ZAR")])),
        )
        .mount(&server)
        .await;

    let client = build_rest_client(&ValrConfig::read_only().base_url(server.uri())).unwrap();
    let currencies = client.currencies().await.unwrap();
    assert_eq!(currencies.len(), 2);
    assert_eq!(currencies[1].symbol, "ZAR");
}

#[tokio::test]
async fn test_authenticated_get_is_signed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/account/balances"))
        .and(header_exists(SIGNATURE_HEADER))
        .and(header(API_KEY_HEADER, API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "currency": "BTC",
            "available": "0.0001",
            "reserved": "0",
            "total": "0.0001",
            "updatedAt": "2019-05-16T13:48:06.185Z",
            "lendReserved": "0",
            "borrowReserved": "0",
            "borrowedAmount": "0",
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_rest_client(&authenticated(&server)).unwrap();
    let balances = client.balances().await.unwrap();
    assert_eq!(balances[0].available.to_string(), "0.0001");

    let requests = server.received_requests().await.unwrap();
    assert_signed(&requests[0], "/v1/account/balances", None);
}

#[tokio::test]
async fn test_subaccount_header_is_signed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/orders/open"))
        .and(header(SUBACCOUNT_HEADER, "1234"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_rest_client(&authenticated(&server).subaccount("1234")).unwrap();
    assert!(client.open_orders().await.unwrap().is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_signed(&requests[0], "/v1/orders/open", Some("1234"));
}

#[tokio::test]
async fn test_trade_history_sends_paging_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/public/BTCZAR/trades"))
        .and(query_param("skip", "0"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_rest_client(&ValrConfig::read_only().base_url(server.uri())).unwrap();
    assert!(client.trade_history("BTCZAR", 0, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_signed_body_is_sent_body() {
    let server = MockServer::start().await;
    let expected = json!({
        "pair": "BTCZAR",
        "side": "SELL",
        "quantity": "0.001",
        "price": "1000000",
        "customerOrderId": "mine-1",
        "timeInForce": "GTC",
    });
    Mock::given(method("POST"))
        .and(path("/v1/orders/limit"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"id": "order-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_rest_client(&authenticated(&server)).unwrap();
    let order = LimitOrderRequest::new(
        "BTCZAR",
        OrderSide::Sell,
        Decimal::from_str("0.001").unwrap(),
        Decimal::from(1_000_000),
    )
    .customer_order_id("mine-1");
    let accepted = client.place_limit_order(&order).await.unwrap();
    assert_eq!(accepted.id, "order-1");

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8(requests[0].body.clone()).unwrap();
    assert!(!body.contains(' '), "body is not compact: {}", body);
    assert_signed(&requests[0], "/v1/orders/limit", None);
}

#[tokio::test]
async fn test_error_code_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/orders/BTCZAR/orderid/missing"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": -11,
            "message": "Order not found",
        })))
        .mount(&server)
        .await;

    let client = build_rest_client(&authenticated(&server)).unwrap();
    let err = client
        .order_status("BTCZAR", OrderRef::OrderId("missing"))
        .await
        .unwrap_err();
    match err {
        ValrError::ApiError { code, body } => {
            assert_eq!(code, "-11");
            assert_eq!(body["message"], "Order not found");
        }
        other => panic!("expected an API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_code_with_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/public/BTCZAR/marketsummary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "E42",
            "message": "Unknown pair",
        })))
        .mount(&server)
        .await;

    let client = build_rest_client(&ValrConfig::read_only().base_url(server.uri())).unwrap();
    let err = client.market_summary("BTCZAR").await.unwrap_err();
    assert!(matches!(err, ValrError::ApiError { ref code, .. } if code == "E42"));
}

#[tokio::test]
async fn test_falsy_code_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/orders/limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "o", "code": 0})))
        .mount(&server)
        .await;

    let client = build_rest_client(&authenticated(&server)).unwrap();
    let order = LimitOrderRequest::new("BTCZAR", OrderSide::Buy, Decimal::ONE, Decimal::ONE);
    // `code` is not a field of the acknowledgement, so decoding rejects it
    let err = client.place_limit_order(&order).await.unwrap_err();
    assert!(matches!(err, ValrError::DecodeError(_)));
}

#[tokio::test]
async fn test_non_json_failure_is_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/public/pairs"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let client = build_rest_client(&ValrConfig::read_only().base_url(server.uri())).unwrap();
    let err = client.currency_pairs().await.unwrap_err();
    assert!(matches!(
        err,
        ValrError::HttpStatus { status: 503, ref body } if body == "upstream unavailable"
    ));
}

#[tokio::test]
async fn test_accepted_delete_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/orders/order"))
        .and(body_json(json!({"pair": "BTCZAR", "orderId": "abc"})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_rest_client(&authenticated(&server)).unwrap();
    let response = client
        .cancel_order("BTCZAR", OrderRef::OrderId("abc"))
        .await
        .unwrap();
    assert_eq!(response, None);

    let requests = server.received_requests().await.unwrap();
    assert_signed(&requests[0], "/v1/orders/order", None);
}

#[tokio::test]
async fn test_delete_with_body_is_returned() {
    let server = MockServer::start().await;
    let body: Value = json!({"orderId": "abc", "status": "cancel requested"});
    Mock::given(method("DELETE"))
        .and(path("/v1/orders/order"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = build_rest_client(&authenticated(&server)).unwrap();
    let response = client
        .cancel_order("BTCZAR", OrderRef::CustomerOrderId("mine-1"))
        .await
        .unwrap();
    assert_eq!(response, Some(body));
}

#[tokio::test]
async fn test_authenticated_call_without_credentials() {
    let server = MockServer::start().await;

    let client = build_rest_client(&ValrConfig::read_only().base_url(server.uri())).unwrap();
    let err = client.balances().await.unwrap_err();
    assert!(matches!(
        err,
        ValrError::ConfigError(ConfigError::MissingCredentials)
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

/// Records what it was asked to sign
#[derive(Default)]
struct RecordingSigner {
    signed: std::sync::Mutex<Vec<(String, String, String)>>,
}

impl valrx::core::kernel::Signer for RecordingSigner {
    fn sign_request(
        &self,
        method: &str,
        path: &str,
        body: &str,
        _timestamp: u64,
    ) -> valrx::core::kernel::SignatureResult {
        self.signed
            .lock()
            .unwrap()
            .push((method.to_string(), path.to_string(), body.to_string()));
        Ok(std::collections::HashMap::new())
    }
}

#[tokio::test]
async fn test_query_string_is_part_of_signed_path() {
    use std::sync::Arc;
    use valrx::core::kernel::{RestClient, RestClientBuilder, RestClientConfig};

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/account/transactionhistory"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let signer = Arc::new(RecordingSigner::default());
    let rest = RestClientBuilder::new(RestClientConfig::new(server.uri(), "valr".to_string()))
        .with_signer(signer.clone())
        .build()
        .unwrap();

    rest.get("/v1/account/transactionhistory", &[("limit", "5")], true)
        .await
        .unwrap();

    let signed = signer.signed.lock().unwrap();
    assert_eq!(
        signed[0],
        (
            "GET".to_string(),
            "/v1/account/transactionhistory?limit=5".to_string(),
            String::new()
        )
    );
}
