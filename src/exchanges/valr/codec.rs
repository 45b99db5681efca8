use crate::core::errors::{DecodeError, ValrError};
use crate::core::kernel::WsCodec;
use crate::core::schema::{decode_list, decode_record};
use crate::exchanges::valr::enums::{Channel, EventTag};
use crate::exchanges::valr::types::{
    AggregatedOrderbook, BalanceUpdate, FailedCancelOrderNotification,
    InstantOrderCompletedNotification, MarkPriceUpdate, MarketSummary, NewAccountHistoryRecord,
    NewAccountTrade, NewPendingReceive, NewTrade, OrderProcessedNotification, OrderStatusUpdate,
    StatusUpdate, TradeBucket, WebsocketFullOrderbook, WebsocketOpenOrderInfo,
};
use serde_json::{json, Value};
use tracing::error;

/// Decoded payload of a data frame
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    AggregatedOrderbook(AggregatedOrderbook),
    FullOrderbook(WebsocketFullOrderbook),
    MarketSummary(MarketSummary),
    TradeBucket(TradeBucket),
    NewTrade(NewTrade),
    MarkPrice(MarkPriceUpdate),
    Balance(BalanceUpdate),
    OpenOrders(Vec<WebsocketOpenOrderInfo>),
    AccountTrade(NewAccountTrade),
    InstantOrderCompleted(InstantOrderCompletedNotification),
    OrderProcessed(OrderProcessedNotification),
    FailedCancelOrder(FailedCancelOrderNotification),
    SendStatus(StatusUpdate),
    AccountHistory(NewAccountHistoryRecord),
    OrderStatus(OrderStatusUpdate),
    PendingReceive(NewPendingReceive),
}

/// One inbound frame, classified and decoded
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub tag: EventTag,
    /// Frame-level `currencyPairSymbol`, present on market frames
    pub symbol: Option<String>,
    /// `None` for control frames
    pub payload: Option<Payload>,
}

impl Envelope {
    pub fn is_control(&self) -> bool {
        self.tag.is_control()
    }

    pub fn channel(&self) -> Option<Channel> {
        self.tag.channel()
    }
}

/// Messages the client sends on a stream
#[derive(Debug, Clone, PartialEq)]
pub enum Outgoing {
    Subscribe { event: EventTag, pairs: Vec<String> },
    Unsubscribe { event: EventTag, pairs: Vec<String> },
    Ping,
    /// Any other JSON message, sent verbatim
    Raw(Value),
}

impl Outgoing {
    pub fn subscribe(event: EventTag, pairs: &[impl AsRef<str>]) -> Self {
        Self::Subscribe {
            event,
            pairs: pairs.iter().map(|p| p.as_ref().to_string()).collect(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Subscribe { event, pairs } => json!({
                "type": EventTag::Subscribe,
                "subscriptions": [{"event": event, "pairs": pairs}],
            }),
            Self::Unsubscribe { event, pairs } => json!({
                "type": EventTag::Unsubscribe,
                "subscriptions": [{"event": event, "pairs": pairs}],
            }),
            Self::Ping => json!({"type": EventTag::Ping}),
            Self::Raw(value) => value.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValrCodec;

impl ValrCodec {
    /// Classify a tag and decode its payload with the dispatch table
    pub fn decode_event(
        &self,
        tag: &str,
        payload: Option<&Value>,
        symbol: Option<String>,
    ) -> Result<Envelope, DecodeError> {
        let tag: EventTag = tag
            .parse()
            .map_err(|_| DecodeError::UnknownEvent(tag.to_string()))?;

        let payload = if tag.is_control() {
            None
        } else {
            Some(Self::decode_payload(tag, payload.unwrap_or(&Value::Null))?)
        };

        Ok(Envelope {
            tag,
            symbol,
            payload,
        })
    }

    fn decode_payload(tag: EventTag, raw: &Value) -> Result<Payload, DecodeError> {
        Ok(match tag {
            EventTag::AggregatedOrderbookUpdate => Payload::AggregatedOrderbook(decode_record(raw)?),
            EventTag::FullOrderbookUpdate => Payload::FullOrderbook(decode_record(raw)?),
            EventTag::MarketSummaryUpdate => Payload::MarketSummary(decode_record(raw)?),
            EventTag::NewTradeBucket => Payload::TradeBucket(decode_record(raw)?),
            EventTag::NewTrade => Payload::NewTrade(decode_record(raw)?),
            EventTag::MarkPriceUpdate => Payload::MarkPrice(decode_record(raw)?),
            EventTag::BalanceUpdate => Payload::Balance(decode_record(raw)?),
            EventTag::OpenOrdersUpdate => Payload::OpenOrders(decode_list(raw)?),
            EventTag::NewAccountTrade => Payload::AccountTrade(decode_record(raw)?),
            EventTag::InstantOrderCompleted => Payload::InstantOrderCompleted(decode_record(raw)?),
            EventTag::OrderProcessed => Payload::OrderProcessed(decode_record(raw)?),
            EventTag::FailedCancelOrder => Payload::FailedCancelOrder(decode_record(raw)?),
            EventTag::SendStatusUpdate => Payload::SendStatus(decode_record(raw)?),
            EventTag::NewAccountHistoryRecord => Payload::AccountHistory(decode_record(raw)?),
            EventTag::OrderStatusUpdate => Payload::OrderStatus(decode_record(raw)?),
            EventTag::NewPendingReceive => Payload::PendingReceive(decode_record(raw)?),
            control => return Err(DecodeError::UnknownEvent(control.to_string())),
        })
    }

    /// Parse a `{type, data, currencyPairSymbol?}` text frame
    pub fn decode_frame(&self, text: &str) -> Result<Envelope, DecodeError> {
        let frame: Value = serde_json::from_str(text).map_err(|e| {
            error!(frame = %text, "Frame is not JSON: {}", e);
            DecodeError::MalformedFrame(e.to_string())
        })?;

        let object = frame.as_object().ok_or_else(|| {
            error!(frame = %text, "Frame is not a JSON object");
            DecodeError::MalformedFrame(format!("expected an object, received {}", frame))
        })?;

        let tag = object.get("type").and_then(Value::as_str).ok_or_else(|| {
            error!(frame = %text, "Frame has no type");
            DecodeError::MalformedFrame("missing `type`".to_string())
        })?;

        let symbol = object
            .get("currencyPairSymbol")
            .and_then(Value::as_str)
            .map(str::to_string);

        self.decode_event(tag, object.get("data"), symbol)
    }
}

impl WsCodec for ValrCodec {
    type Message = Envelope;
    type Outgoing = Outgoing;

    fn encode(&self, message: &Outgoing) -> Result<String, ValrError> {
        Ok(serde_json::to_string(&message.to_json())?)
    }

    fn decode(&self, frame: &str) -> Result<Envelope, ValrError> {
        Ok(self.decode_frame(frame)?)
    }

    fn is_control(&self, message: &Envelope) -> bool {
        message.is_control()
    }

    fn heartbeat(&self) -> Outgoing {
        Outgoing::Ping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_frames_have_no_payload() {
        let envelope = ValrCodec.decode_frame(r#"{"type":"AUTHENTICATED"}"#).unwrap();
        assert_eq!(envelope.tag, EventTag::Authenticated);
        assert!(envelope.payload.is_none());
        assert!(envelope.is_control());

        let pong = ValrCodec.decode_frame(r#"{"type":"PONG","message":"PONG"}"#).unwrap();
        assert!(pong.is_control());
    }

    #[test]
    fn test_unknown_tag() {
        let err = ValrCodec.decode_frame(r#"{"type":"SOMETHING_NEW","data":{}}"#).unwrap_err();
        assert_eq!(err, DecodeError::UnknownEvent("SOMETHING_NEW".to_string()));
    }

    #[test]
    fn test_malformed_frames() {
        assert!(matches!(
            ValrCodec.decode_frame("not json"),
            Err(DecodeError::MalformedFrame(_))
        ));
        assert!(matches!(
            ValrCodec.decode_frame("[1,2]"),
            Err(DecodeError::MalformedFrame(_))
        ));
        assert!(matches!(
            ValrCodec.decode_frame(r#"{"data":{}}"#),
            Err(DecodeError::MalformedFrame(_))
        ));
    }

    #[test]
    fn test_data_tag_without_data() {
        let err = ValrCodec.decode_frame(r#"{"type":"BALANCE_UPDATE"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Mismatch { .. }));
    }

    #[test]
    fn test_encode_subscribe() {
        let message = Outgoing::subscribe(EventTag::AggregatedOrderbookUpdate, &["BTCZAR"]);
        let frame = ValrCodec.encode(&message).unwrap();
        let value: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "SUBSCRIBE",
                "subscriptions": [{"event": "AGGREGATED_ORDERBOOK_UPDATE", "pairs": ["BTCZAR"]}],
            })
        );
    }

    #[test]
    fn test_encode_ping() {
        assert_eq!(ValrCodec.encode(&Outgoing::Ping).unwrap(), r#"{"type":"PING"}"#);
    }
}
