use crate::core::schema::Contract::{ListOf, Optional, OptionalListOf, Required};
use crate::core::schema::{RecordSchema, Shape};
use crate::exchanges::valr::enums::{
    OrderSide, OrderType, TimeInForce, ORDER_SIDE, ORDER_TYPE, TIME_IN_FORCE,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub static SERVER_TIME: RecordSchema = RecordSchema {
    name: "ServerTime",
    fields: &[
        ("epoch_time", Required(Shape::Integer)),
        ("time", Required(Shape::Timestamp)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerTime {
    pub epoch_time: i64,
    pub time: DateTime<Utc>,
}

record!(ServerTime => SERVER_TIME);

pub static WITHDRAWAL_ADDRESS: RecordSchema = RecordSchema {
    name: "WithdrawalAddress",
    fields: &[
        ("currency", Required(Shape::String)),
        ("address", Required(Shape::String)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WithdrawalAddress {
    pub currency: String,
    pub address: String,
}

record!(WithdrawalAddress => WITHDRAWAL_ADDRESS);

pub static API_KEY_INFO: RecordSchema = RecordSchema {
    name: "ApiKeyInfo",
    fields: &[
        ("label", Required(Shape::String)),
        ("permissions", ListOf(Shape::String)),
        ("added_at", Required(Shape::Timestamp)),
        ("allowed_ip_address_cidr", Optional(Shape::String)),
        (
            "allowed_withdraw_address_list",
            OptionalListOf(Shape::Record(&WITHDRAWAL_ADDRESS)),
        ),
        ("is_subaccount", Required(Shape::Boolean)),
    ],
};

/// The key the client is signing with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiKeyInfo {
    pub label: String,
    pub permissions: Vec<String>,
    pub added_at: DateTime<Utc>,
    pub allowed_ip_address_cidr: Option<String>,
    pub allowed_withdraw_address_list: Option<Vec<WithdrawalAddress>>,
    pub is_subaccount: bool,
}

record!(ApiKeyInfo => API_KEY_INFO);

pub static REST_ORDERBOOK_ORDER: RecordSchema = RecordSchema {
    name: "RestOrderbookOrder",
    fields: &[
        ("side", Required(Shape::Enum(&ORDER_SIDE))),
        ("quantity", Required(Shape::Decimal)),
        ("price", Required(Shape::Decimal)),
        ("currency_pair", Required(Shape::String)),
        ("id", Required(Shape::String)),
        ("position_at_price", Required(Shape::Integer)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RestOrderbookOrder {
    pub side: OrderSide,
    pub quantity: Decimal,
    pub price: Decimal,
    pub currency_pair: String,
    pub id: String,
    pub position_at_price: i64,
}

record!(RestOrderbookOrder => REST_ORDERBOOK_ORDER);

pub static REST_FULL_ORDERBOOK: RecordSchema = RecordSchema {
    name: "RestFullOrderbook",
    fields: &[
        ("last_change", Required(Shape::Timestamp)),
        ("asks", ListOf(Shape::Record(&REST_ORDERBOOK_ORDER))),
        ("bids", ListOf(Shape::Record(&REST_ORDERBOOK_ORDER))),
        ("sequence_number", Required(Shape::Integer)),
        ("checksum", Optional(Shape::Integer)),
    ],
};

/// Full orderbook snapshot, one entry per resting order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RestFullOrderbook {
    pub last_change: DateTime<Utc>,
    pub asks: Vec<RestOrderbookOrder>,
    pub bids: Vec<RestOrderbookOrder>,
    pub sequence_number: i64,
    pub checksum: Option<i64>,
}

record!(RestFullOrderbook => REST_FULL_ORDERBOOK);

pub static HISTORICAL_MARKET_TRADE: RecordSchema = RecordSchema {
    name: "HistoricalMarketTrade",
    fields: &[
        ("price", Required(Shape::Decimal)),
        ("quantity", Required(Shape::Decimal)),
        ("currency_pair", Required(Shape::String)),
        ("traded_at", Required(Shape::Timestamp)),
        ("taker_side", Required(Shape::Enum(&ORDER_SIDE))),
        ("sequence_id", Required(Shape::Integer)),
        ("id", Required(Shape::String)),
        ("quote_volume", Required(Shape::Decimal)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoricalMarketTrade {
    pub price: Decimal,
    pub quantity: Decimal,
    pub currency_pair: String,
    pub traded_at: DateTime<Utc>,
    pub taker_side: OrderSide,
    pub sequence_id: i64,
    pub id: String,
    pub quote_volume: Decimal,
}

record!(HistoricalMarketTrade => HISTORICAL_MARKET_TRADE);

pub static WALLET_BALANCE: RecordSchema = RecordSchema {
    name: "WalletBalance",
    fields: &[
        ("currency", Required(Shape::String)),
        ("available", Required(Shape::Decimal)),
        ("reserved", Required(Shape::Decimal)),
        ("total", Required(Shape::Decimal)),
        ("updated_at", Optional(Shape::Timestamp)),
        ("lend_reserved", Required(Shape::Decimal)),
        ("borrow_reserved", Required(Shape::Decimal)),
        ("borrowed_amount", Required(Shape::Decimal)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WalletBalance {
    pub currency: String,
    pub available: Decimal,
    pub reserved: Decimal,
    pub total: Decimal,
    pub updated_at: Option<DateTime<Utc>>,
    pub lend_reserved: Decimal,
    pub borrow_reserved: Decimal,
    pub borrowed_amount: Decimal,
}

record!(WalletBalance => WALLET_BALANCE);

pub static REST_OPEN_ORDER: RecordSchema = RecordSchema {
    name: "RestOpenOrder",
    fields: &[
        ("order_id", Required(Shape::String)),
        ("side", Required(Shape::Enum(&ORDER_SIDE))),
        ("remaining_quantity", Required(Shape::Decimal)),
        ("price", Required(Shape::Decimal)),
        ("currency_pair", Required(Shape::String)),
        ("created_at", Required(Shape::Timestamp)),
        ("original_quantity", Required(Shape::Decimal)),
        ("filled_percentage", Required(Shape::Decimal)),
        ("stop_price", Optional(Shape::Decimal)),
        ("updated_at", Required(Shape::Timestamp)),
        ("status", Required(Shape::String)),
        ("type", Required(Shape::Enum(&ORDER_TYPE))),
        ("time_in_force", Required(Shape::Enum(&TIME_IN_FORCE))),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RestOpenOrder {
    pub order_id: String,
    pub side: OrderSide,
    pub remaining_quantity: Decimal,
    pub price: Decimal,
    pub currency_pair: String,
    pub created_at: DateTime<Utc>,
    pub original_quantity: Decimal,
    pub filled_percentage: Decimal,
    pub stop_price: Option<Decimal>,
    pub updated_at: DateTime<Utc>,
    pub status: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
}

record!(RestOpenOrder => REST_OPEN_ORDER);

pub static ORDER_STATUS: RecordSchema = RecordSchema {
    name: "OrderStatus",
    fields: &[
        ("order_id", Required(Shape::String)),
        ("order_status_type", Required(Shape::String)),
        ("currency_pair", Required(Shape::String)),
        ("original_price", Required(Shape::Decimal)),
        ("remaining_quantity", Required(Shape::Decimal)),
        ("original_quantity", Required(Shape::Decimal)),
        ("order_side", Required(Shape::Enum(&ORDER_SIDE))),
        ("order_type", Required(Shape::Enum(&ORDER_TYPE))),
        ("failed_reason", Optional(Shape::String)),
        ("order_updated_at", Required(Shape::Timestamp)),
        ("order_created_at", Required(Shape::Timestamp)),
        ("customer_order_id", Optional(Shape::String)),
        ("time_in_force", Required(Shape::Enum(&TIME_IN_FORCE))),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderStatus {
    pub order_id: String,
    pub order_status_type: String,
    pub currency_pair: String,
    pub original_price: Decimal,
    pub remaining_quantity: Decimal,
    pub original_quantity: Decimal,
    pub order_side: OrderSide,
    pub order_type: OrderType,
    pub failed_reason: Option<String>,
    pub order_updated_at: DateTime<Utc>,
    pub order_created_at: DateTime<Utc>,
    pub customer_order_id: Option<String>,
    pub time_in_force: TimeInForce,
}

record!(OrderStatus => ORDER_STATUS);

pub static ORDER_ACCEPTED: RecordSchema = RecordSchema {
    name: "OrderAccepted",
    fields: &[("id", Required(Shape::String))],
};

/// Acknowledgement of a placed order; the order itself is processed asynchronously
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderAccepted {
    pub id: String,
}

record!(OrderAccepted => ORDER_ACCEPTED);
