use crate::core::schema::Contract::{ListOf, Optional, Required};
use crate::core::schema::{RecordSchema, Shape, UnionSchema};
use crate::exchanges::valr::enums::{OrderSide, ORDER_SIDE};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub static CURRENCY_INFO: RecordSchema = RecordSchema {
    name: "CurrencyInfo",
    fields: &[
        ("symbol", Required(Shape::String)),
        ("decimal_places", Required(Shape::Integer)),
        ("is_active", Required(Shape::Boolean)),
        ("short_name", Required(Shape::String)),
        ("long_name", Required(Shape::String)),
        ("collateral", Optional(Shape::Boolean)),
        ("collateral_weight", Optional(Shape::Decimal)),
        ("id", Optional(Shape::Integer)),
        ("payment_reference_field_name", Optional(Shape::String)),
        ("supported_withdraw_decimal_places", Optional(Shape::Integer)),
        ("withdraw_decimal_places", Optional(Shape::Integer)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurrencyInfo {
    pub symbol: String,
    pub decimal_places: i64,
    pub is_active: bool,
    pub short_name: String,
    pub long_name: String,
    pub collateral: Option<bool>,
    pub collateral_weight: Option<Decimal>,
    pub id: Option<i64>,
    pub payment_reference_field_name: Option<String>,
    // REST sends `withdrawDecimalPlaces`, the stream sends `supportedWithdrawDecimalPlaces`
    pub supported_withdraw_decimal_places: Option<i64>,
    pub withdraw_decimal_places: Option<i64>,
}

record!(CurrencyInfo => CURRENCY_INFO);

impl CurrencyInfo {
    pub fn withdraw_precision(&self) -> Option<i64> {
        self.supported_withdraw_decimal_places
            .or(self.withdraw_decimal_places)
    }
}

enum InfoOrSymbol<T> {
    Info(T),
    Symbol(String),
}

// Buffered untagged enums lose arbitrary-precision numbers, so the branch is
// picked on the JSON value directly.
fn info_or_symbol<'de, D, T>(deserializer: D) -> Result<InfoOrSymbol<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::String(symbol) => Ok(InfoOrSymbol::Symbol(symbol)),
        other => serde_json::from_value(other)
            .map(InfoOrSymbol::Info)
            .map_err(D::Error::custom),
    }
}

pub static CURRENCY_OR_SYMBOL: UnionSchema = UnionSchema {
    branches: [Shape::Record(&CURRENCY_INFO), Shape::String],
};

/// A currency given either in full or by its symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CurrencyRef {
    Info(Box<CurrencyInfo>),
    Symbol(String),
}

impl<'de> Deserialize<'de> for CurrencyRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match info_or_symbol(deserializer)? {
            InfoOrSymbol::Info(info) => Self::Info(Box::new(info)),
            InfoOrSymbol::Symbol(symbol) => Self::Symbol(symbol),
        })
    }
}

impl CurrencyRef {
    pub fn symbol(&self) -> &str {
        match self {
            Self::Info(info) => &info.symbol,
            Self::Symbol(symbol) => symbol,
        }
    }
}

pub static CURRENCY_PAIR_INFO: RecordSchema = RecordSchema {
    name: "CurrencyPairInfo",
    fields: &[
        ("id", Optional(Shape::Integer)),
        ("symbol", Required(Shape::String)),
        ("base_currency", Required(Shape::Union(&CURRENCY_OR_SYMBOL))),
        ("quote_currency", Required(Shape::Union(&CURRENCY_OR_SYMBOL))),
        ("short_name", Required(Shape::String)),
        ("exchange", Optional(Shape::String)),
        ("active", Required(Shape::Boolean)),
        ("tick_size", Required(Shape::Decimal)),
        ("base_decimal_places", Required(Shape::Integer)),
        ("margin_trading_allowed", Required(Shape::Boolean)),
        ("min_base_amount", Required(Shape::Decimal)),
        ("max_base_amount", Required(Shape::Decimal)),
        ("min_quote_amount", Required(Shape::Decimal)),
        ("max_quote_amount", Required(Shape::Decimal)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurrencyPairInfo {
    pub id: Option<i64>,
    pub symbol: String,
    pub base_currency: CurrencyRef,
    pub quote_currency: CurrencyRef,
    pub short_name: String,
    pub exchange: Option<String>,
    pub active: bool,
    pub tick_size: Decimal,
    pub base_decimal_places: i64,
    pub margin_trading_allowed: bool,
    pub min_base_amount: Decimal,
    pub max_base_amount: Decimal,
    pub min_quote_amount: Decimal,
    pub max_quote_amount: Decimal,
}

record!(CurrencyPairInfo => CURRENCY_PAIR_INFO);

pub static PAIR_OR_SYMBOL: UnionSchema = UnionSchema {
    branches: [Shape::Record(&CURRENCY_PAIR_INFO), Shape::String],
};

/// A currency pair given either in full or by its symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PairRef {
    Info(Box<CurrencyPairInfo>),
    Symbol(String),
}

impl<'de> Deserialize<'de> for PairRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match info_or_symbol(deserializer)? {
            InfoOrSymbol::Info(info) => Self::Info(Box::new(info)),
            InfoOrSymbol::Symbol(symbol) => Self::Symbol(symbol),
        })
    }
}

impl PairRef {
    pub fn symbol(&self) -> &str {
        match self {
            Self::Info(info) => &info.symbol,
            Self::Symbol(symbol) => symbol,
        }
    }
}

pub static AGGREGATED_ORDERBOOK_LEVEL: RecordSchema = RecordSchema {
    name: "AggregatedOrderbookLevel",
    fields: &[
        ("side", Required(Shape::Enum(&ORDER_SIDE))),
        ("quantity", Required(Shape::Decimal)),
        ("price", Required(Shape::Decimal)),
        ("currency_pair", Required(Shape::String)),
        ("order_count", Optional(Shape::Integer)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregatedOrderbookLevel {
    pub side: OrderSide,
    pub quantity: Decimal,
    pub price: Decimal,
    pub currency_pair: String,
    pub order_count: Option<i64>,
}

record!(AggregatedOrderbookLevel => AGGREGATED_ORDERBOOK_LEVEL);

pub static AGGREGATED_ORDERBOOK: RecordSchema = RecordSchema {
    name: "AggregatedOrderbook",
    fields: &[
        ("asks", ListOf(Shape::Record(&AGGREGATED_ORDERBOOK_LEVEL))),
        ("bids", ListOf(Shape::Record(&AGGREGATED_ORDERBOOK_LEVEL))),
        ("last_change", Required(Shape::Timestamp)),
        ("sequence_number", Required(Shape::Integer)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregatedOrderbook {
    pub asks: Vec<AggregatedOrderbookLevel>,
    pub bids: Vec<AggregatedOrderbookLevel>,
    pub last_change: DateTime<Utc>,
    pub sequence_number: i64,
}

record!(AggregatedOrderbook => AGGREGATED_ORDERBOOK);

impl AggregatedOrderbook {
    pub fn best_ask(&self) -> Option<&AggregatedOrderbookLevel> {
        self.asks.first()
    }

    pub fn best_bid(&self) -> Option<&AggregatedOrderbookLevel> {
        self.bids.first()
    }
}

pub static MARKET_SUMMARY: RecordSchema = RecordSchema {
    name: "MarketSummary",
    fields: &[
        ("ask_price", Required(Shape::Decimal)),
        ("bid_price", Required(Shape::Decimal)),
        ("last_traded_price", Required(Shape::Decimal)),
        ("previous_close_price", Required(Shape::Decimal)),
        ("base_volume", Required(Shape::Decimal)),
        ("quote_volume", Required(Shape::Decimal)),
        ("high_price", Required(Shape::Decimal)),
        ("low_price", Required(Shape::Decimal)),
        ("created", Required(Shape::Timestamp)),
        ("change_from_previous", Required(Shape::Decimal)),
        ("mark_price", Required(Shape::Decimal)),
        ("currency_pair", Optional(Shape::String)),
        ("currency_pair_symbol", Optional(Shape::String)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarketSummary {
    pub ask_price: Decimal,
    pub bid_price: Decimal,
    pub last_traded_price: Decimal,
    pub previous_close_price: Decimal,
    pub base_volume: Decimal,
    pub quote_volume: Decimal,
    pub high_price: Decimal,
    pub low_price: Decimal,
    pub created: DateTime<Utc>,
    pub change_from_previous: Decimal,
    pub mark_price: Decimal,
    // REST sends `currencyPair`, the stream sends `currencyPairSymbol`
    pub currency_pair: Option<String>,
    pub currency_pair_symbol: Option<String>,
}

record!(MarketSummary => MARKET_SUMMARY);

impl MarketSummary {
    pub fn symbol(&self) -> Option<&str> {
        self.currency_pair
            .as_deref()
            .or(self.currency_pair_symbol.as_deref())
    }

    pub fn mid_price(&self) -> Decimal {
        (self.ask_price + self.bid_price) / Decimal::TWO
    }
}

pub static TRADE_BUCKET: RecordSchema = RecordSchema {
    name: "TradeBucket",
    fields: &[
        ("currency_pair_symbol", Required(Shape::String)),
        ("bucket_period_in_seconds", Required(Shape::Integer)),
        ("start_time", Required(Shape::Timestamp)),
        ("open", Required(Shape::Decimal)),
        ("high", Required(Shape::Decimal)),
        ("low", Required(Shape::Decimal)),
        ("close", Required(Shape::Decimal)),
        ("volume", Required(Shape::Decimal)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TradeBucket {
    pub currency_pair_symbol: String,
    pub bucket_period_in_seconds: i64,
    pub start_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

record!(TradeBucket => TRADE_BUCKET);

pub static NEW_TRADE: RecordSchema = RecordSchema {
    name: "NewTrade",
    fields: &[
        ("price", Required(Shape::Decimal)),
        ("quantity", Required(Shape::Decimal)),
        ("currency_pair", Required(Shape::Union(&PAIR_OR_SYMBOL))),
        ("traded_at", Required(Shape::Timestamp)),
        ("taker_side", Required(Shape::Enum(&ORDER_SIDE))),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewTrade {
    pub price: Decimal,
    pub quantity: Decimal,
    pub currency_pair: PairRef,
    pub traded_at: DateTime<Utc>,
    pub taker_side: OrderSide,
}

record!(NewTrade => NEW_TRADE);

pub static WEBSOCKET_ORDERBOOK_ORDER: RecordSchema = RecordSchema {
    name: "WebsocketOrderbookOrder",
    fields: &[
        ("order_id", Required(Shape::String)),
        ("quantity", Required(Shape::Decimal)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebsocketOrderbookOrder {
    pub order_id: String,
    pub quantity: Decimal,
}

record!(WebsocketOrderbookOrder => WEBSOCKET_ORDERBOOK_ORDER);

pub static WEBSOCKET_FULL_ORDERBOOK_LEVEL: RecordSchema = RecordSchema {
    name: "WebsocketFullOrderbookLevel",
    fields: &[
        ("price", Required(Shape::Decimal)),
        ("orders", ListOf(Shape::Record(&WEBSOCKET_ORDERBOOK_ORDER))),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebsocketFullOrderbookLevel {
    pub price: Decimal,
    pub orders: Vec<WebsocketOrderbookOrder>,
}

record!(WebsocketFullOrderbookLevel => WEBSOCKET_FULL_ORDERBOOK_LEVEL);

impl WebsocketFullOrderbookLevel {
    pub fn total_quantity(&self) -> Decimal {
        self.orders.iter().map(|order| order.quantity).sum()
    }
}

pub static WEBSOCKET_FULL_ORDERBOOK: RecordSchema = RecordSchema {
    name: "WebsocketFullOrderbook",
    fields: &[
        ("last_change", Required(Shape::Timestamp)),
        ("asks", ListOf(Shape::Record(&WEBSOCKET_FULL_ORDERBOOK_LEVEL))),
        ("bids", ListOf(Shape::Record(&WEBSOCKET_FULL_ORDERBOOK_LEVEL))),
        ("sequence_number", Required(Shape::Integer)),
        ("checksum", Optional(Shape::Integer)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebsocketFullOrderbook {
    pub last_change: DateTime<Utc>,
    pub asks: Vec<WebsocketFullOrderbookLevel>,
    pub bids: Vec<WebsocketFullOrderbookLevel>,
    pub sequence_number: i64,
    pub checksum: Option<i64>,
}

record!(WebsocketFullOrderbook => WEBSOCKET_FULL_ORDERBOOK);

pub static MARK_PRICE_UPDATE: RecordSchema = RecordSchema {
    name: "MarkPriceUpdate",
    fields: &[
        ("currency_pair_symbol", Optional(Shape::String)),
        ("mark_price", Required(Shape::Decimal)),
        ("created", Optional(Shape::Timestamp)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkPriceUpdate {
    pub currency_pair_symbol: Option<String>,
    pub mark_price: Decimal,
    pub created: Option<DateTime<Utc>>,
}

record!(MarkPriceUpdate => MARK_PRICE_UPDATE);
