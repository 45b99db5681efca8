use crate::core::errors::ValrError;
use crate::core::kernel::RestClient;
use crate::core::schema::{decode_list, decode_record};
use crate::exchanges::valr::enums::{OrderSide, TimeInForce};
use crate::exchanges::valr::types::{
    AggregatedOrderbook, ApiKeyInfo, CurrencyInfo, CurrencyPairInfo, HistoricalMarketTrade, MarketSummary,
    OrderAccepted, OrderStatus, RestFullOrderbook, RestOpenOrder, ServerTime, WalletBalance,
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::instrument;

const API_PREFIX: &str = "/v1";

/// Identifies an order either by exchange id or by the id the caller chose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderRef<'a> {
    OrderId(&'a str),
    CustomerOrderId(&'a str),
}

impl OrderRef<'_> {
    fn path_segment(&self) -> String {
        match self {
            Self::OrderId(id) => format!("orderid/{}", id),
            Self::CustomerOrderId(id) => format!("customerorderid/{}", id),
        }
    }

    fn body_field(&self) -> (&'static str, &str) {
        match *self {
            Self::OrderId(id) => ("orderId", id),
            Self::CustomerOrderId(id) => ("customerOrderId", id),
        }
    }
}

/// Body of `POST /v1/orders/limit`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitOrderRequest {
    pub pair: String,
    pub side: OrderSide,
    pub quantity: Decimal,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_order_id: Option<String>,
    pub time_in_force: TimeInForce,
}

impl LimitOrderRequest {
    pub fn new(pair: impl Into<String>, side: OrderSide, quantity: Decimal, price: Decimal) -> Self {
        Self {
            pair: pair.into(),
            side,
            quantity,
            price,
            post_only: None,
            customer_order_id: None,
            time_in_force: TimeInForce::Gtc,
        }
    }

    pub fn post_only(mut self, post_only: bool) -> Self {
        self.post_only = Some(post_only);
        self
    }

    pub fn customer_order_id(mut self, id: impl Into<String>) -> Self {
        self.customer_order_id = Some(id.into());
        self
    }

    pub fn time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = time_in_force;
        self
    }
}

/// Typed VALR endpoints over any `RestClient`
pub struct ValrRestClient<R: RestClient> {
    client: R,
}

impl<R: RestClient> ValrRestClient<R> {
    pub fn new(client: R) -> Self {
        Self { client }
    }

    pub fn inner(&self) -> &R {
        &self.client
    }

    fn path(endpoint: &str) -> String {
        format!("{}/{}", API_PREFIX, endpoint)
    }

    async fn get(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, ValrError> {
        self.client
            .get(&Self::path(endpoint), query_params, authenticated)
            .await
    }

    #[instrument(skip(self), fields(exchange = "valr"))]
    pub async fn server_time(&self) -> Result<ServerTime, ValrError> {
        let raw = self.get("public/time", &[], false).await?;
        Ok(decode_record(&raw)?)
    }

    #[instrument(skip(self), fields(exchange = "valr"))]
    pub async fn currencies(&self) -> Result<Vec<CurrencyInfo>, ValrError> {
        let raw = self.get("public/currencies", &[], false).await?;
        Ok(decode_list(&raw)?)
    }

    #[instrument(skip(self), fields(exchange = "valr"))]
    pub async fn currency_pairs(&self) -> Result<Vec<CurrencyPairInfo>, ValrError> {
        let raw = self.get("public/pairs", &[], false).await?;
        Ok(decode_list(&raw)?)
    }

    #[instrument(skip(self), fields(exchange = "valr"))]
    pub async fn market_summaries(&self) -> Result<Vec<MarketSummary>, ValrError> {
        let raw = self.get("public/marketsummary", &[], false).await?;
        Ok(decode_list(&raw)?)
    }

    #[instrument(skip(self), fields(exchange = "valr", pair = %pair))]
    pub async fn market_summary(&self, pair: &str) -> Result<MarketSummary, ValrError> {
        let raw = self
            .get(&format!("public/{}/marketsummary", pair), &[], false)
            .await?;
        Ok(decode_record(&raw)?)
    }

    #[instrument(skip(self), fields(exchange = "valr", pair = %pair))]
    pub async fn aggregated_orderbook(&self, pair: &str) -> Result<AggregatedOrderbook, ValrError> {
        let raw = self
            .get(&format!("public/{}/orderbook", pair), &[], false)
            .await?;
        Ok(decode_record(&raw)?)
    }

    #[instrument(skip(self), fields(exchange = "valr", pair = %pair))]
    pub async fn full_orderbook(&self, pair: &str) -> Result<RestFullOrderbook, ValrError> {
        let raw = self
            .get(&format!("public/{}/orderbook/full", pair), &[], false)
            .await?;
        Ok(decode_record(&raw)?)
    }

    /// Public trade history, newest first
    #[instrument(skip(self), fields(exchange = "valr", pair = %pair))]
    pub async fn trade_history(
        &self,
        pair: &str,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<HistoricalMarketTrade>, ValrError> {
        let skip = skip.to_string();
        let limit = limit.to_string();
        let raw = self
            .get(
                &format!("public/{}/trades", pair),
                &[("skip", skip.as_str()), ("limit", limit.as_str())],
                false,
            )
            .await?;
        Ok(decode_list(&raw)?)
    }

    #[instrument(skip(self), fields(exchange = "valr"))]
    pub async fn balances(&self) -> Result<Vec<WalletBalance>, ValrError> {
        let raw = self.get("account/balances", &[], true).await?;
        Ok(decode_list(&raw)?)
    }

    #[instrument(skip(self), fields(exchange = "valr"))]
    pub async fn api_key_info(&self) -> Result<ApiKeyInfo, ValrError> {
        let raw = self.get("account/api-keys/current", &[], true).await?;
        Ok(decode_record(&raw)?)
    }

    #[instrument(skip(self), fields(exchange = "valr"))]
    pub async fn open_orders(&self) -> Result<Vec<RestOpenOrder>, ValrError> {
        let raw = self.get("orders/open", &[], true).await?;
        Ok(decode_list(&raw)?)
    }

    #[instrument(skip(self), fields(exchange = "valr", pair = %pair))]
    pub async fn order_status(
        &self,
        pair: &str,
        order: OrderRef<'_>,
    ) -> Result<OrderStatus, ValrError> {
        let endpoint = format!("orders/{}/{}", pair, order.path_segment());
        let raw = self.get(&endpoint, &[], true).await?;
        Ok(decode_record(&raw)?)
    }

    /// Place a limit order. Acceptance only; fills arrive on the account stream.
    #[instrument(skip(self, order), fields(exchange = "valr", pair = %order.pair, side = %order.side))]
    pub async fn place_limit_order(
        &self,
        order: &LimitOrderRequest,
    ) -> Result<OrderAccepted, ValrError> {
        let body = serde_json::to_value(order)?;
        let raw = self
            .client
            .post(&Self::path("orders/limit"), &body, true)
            .await?;
        Ok(decode_record(&raw)?)
    }

    /// Cancel an order
    ///
    /// # Returns
    /// The response body, or `None` when the exchange accepted the
    /// cancellation without one
    #[instrument(skip(self), fields(exchange = "valr", pair = %pair))]
    pub async fn cancel_order(
        &self,
        pair: &str,
        order: OrderRef<'_>,
    ) -> Result<Option<Value>, ValrError> {
        let (id_field, id) = order.body_field();
        let mut body = json!({ "pair": pair });
        body[id_field] = Value::String(id.to_string());
        self.client
            .delete(&Self::path("orders/order"), Some(&body), true)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_limit_order_body() {
        let quantity = Decimal::from_str("0.001").unwrap();
        let price = Decimal::from(1_000_000);
        let order = LimitOrderRequest::new("BTCZAR", OrderSide::Buy, quantity, price).post_only(true);
        let body = serde_json::to_value(&order).unwrap();
        assert_eq!(
            body,
            json!({
                "pair": "BTCZAR",
                "side": "BUY",
                "quantity": "0.001",
                "price": "1000000",
                "postOnly": true,
                "timeInForce": "GTC",
            })
        );
    }

    #[test]
    fn test_order_ref_paths() {
        assert_eq!(OrderRef::OrderId("abc").path_segment(), "orderid/abc");
        assert_eq!(
            OrderRef::CustomerOrderId("7").body_field(),
            ("customerOrderId", "7")
        );
    }
}
