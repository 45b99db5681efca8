use super::market::{CurrencyInfo, PairRef, CURRENCY_INFO, PAIR_OR_SYMBOL};
use crate::core::schema::Contract::{Optional, Required};
use crate::core::schema::{RecordSchema, Shape};
use crate::exchanges::valr::enums::{
    OrderSide, OrderType, TimeInForce, TransactionType, ORDER_SIDE, ORDER_TYPE, TIME_IN_FORCE,
    TRANSACTION_TYPE,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub static BALANCE_UPDATE: RecordSchema = RecordSchema {
    name: "BalanceUpdate",
    fields: &[
        ("currency", Required(Shape::Record(&CURRENCY_INFO))),
        ("available", Required(Shape::Decimal)),
        ("reserved", Required(Shape::Decimal)),
        ("total", Required(Shape::Decimal)),
        ("updated_at", Required(Shape::Timestamp)),
        ("lend_reserved", Required(Shape::Decimal)),
        ("borrow_collateral_reserved", Required(Shape::Decimal)),
        ("borrowed_amount", Required(Shape::Decimal)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BalanceUpdate {
    pub currency: CurrencyInfo,
    pub available: Decimal,
    pub reserved: Decimal,
    pub total: Decimal,
    pub updated_at: DateTime<Utc>,
    pub lend_reserved: Decimal,
    pub borrow_collateral_reserved: Decimal,
    pub borrowed_amount: Decimal,
}

record!(BalanceUpdate => BALANCE_UPDATE);

pub static WEBSOCKET_OPEN_ORDER_INFO: RecordSchema = RecordSchema {
    name: "WebsocketOpenOrderInfo",
    fields: &[
        ("order_id", Required(Shape::String)),
        ("side", Required(Shape::Enum(&ORDER_SIDE))),
        ("currency_pair", Required(Shape::String)),
        ("created_at", Required(Shape::Timestamp)),
        ("original_quantity", Required(Shape::Decimal)),
        ("filled_percentage", Required(Shape::Decimal)),
        ("customer_order_id", Optional(Shape::String)),
        ("quantity", Required(Shape::Decimal)),
        ("price", Required(Shape::Decimal)),
        ("type", Required(Shape::Enum(&ORDER_TYPE))),
        ("status", Required(Shape::String)),
        ("updated_at", Required(Shape::Timestamp)),
        ("time_in_force", Required(Shape::Enum(&TIME_IN_FORCE))),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebsocketOpenOrderInfo {
    pub order_id: String,
    pub side: OrderSide,
    pub currency_pair: String,
    pub created_at: DateTime<Utc>,
    pub original_quantity: Decimal,
    pub filled_percentage: Decimal,
    pub customer_order_id: Option<String>,
    pub quantity: Decimal,
    pub price: Decimal,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub status: String,
    pub updated_at: DateTime<Utc>,
    pub time_in_force: TimeInForce,
}

record!(WebsocketOpenOrderInfo => WEBSOCKET_OPEN_ORDER_INFO);

pub static NEW_ACCOUNT_TRADE: RecordSchema = RecordSchema {
    name: "NewAccountTrade",
    fields: &[
        ("price", Required(Shape::Decimal)),
        ("quantity", Required(Shape::Decimal)),
        ("currency_pair", Required(Shape::String)),
        ("traded_at", Required(Shape::Timestamp)),
        ("side", Required(Shape::Enum(&ORDER_SIDE))),
        ("order_id", Required(Shape::String)),
        ("id", Required(Shape::String)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAccountTrade {
    pub price: Decimal,
    pub quantity: Decimal,
    pub currency_pair: String,
    pub traded_at: DateTime<Utc>,
    pub side: OrderSide,
    pub order_id: String,
    pub id: String,
}

record!(NewAccountTrade => NEW_ACCOUNT_TRADE);

pub static INSTANT_ORDER_COMPLETED: RecordSchema = RecordSchema {
    name: "InstantOrderCompletedNotification",
    fields: &[
        ("order_id", Required(Shape::String)),
        ("success", Required(Shape::Boolean)),
        ("paid_amount", Required(Shape::Decimal)),
        ("paid_currency", Required(Shape::String)),
        ("received_amount", Required(Shape::Decimal)),
        ("received_currency", Required(Shape::String)),
        ("fee_amount", Required(Shape::Decimal)),
        ("fee_currency", Required(Shape::String)),
        ("order_executed_at", Required(Shape::Timestamp)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstantOrderCompletedNotification {
    pub order_id: String,
    pub success: bool,
    pub paid_amount: Decimal,
    pub paid_currency: String,
    pub received_amount: Decimal,
    pub received_currency: String,
    pub fee_amount: Decimal,
    pub fee_currency: String,
    pub order_executed_at: DateTime<Utc>,
}

record!(InstantOrderCompletedNotification => INSTANT_ORDER_COMPLETED);

pub static ORDER_PROCESSED: RecordSchema = RecordSchema {
    name: "OrderProcessedNotification",
    fields: &[
        ("order_id", Required(Shape::String)),
        ("success", Required(Shape::Boolean)),
        ("failure_reason", Required(Shape::String)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderProcessedNotification {
    pub order_id: String,
    pub success: bool,
    pub failure_reason: String,
}

record!(OrderProcessedNotification => ORDER_PROCESSED);

pub static FAILED_CANCEL_ORDER: RecordSchema = RecordSchema {
    name: "FailedCancelOrderNotification",
    fields: &[
        ("order_id", Required(Shape::String)),
        ("message", Required(Shape::String)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FailedCancelOrderNotification {
    pub order_id: String,
    pub message: String,
}

record!(FailedCancelOrderNotification => FAILED_CANCEL_ORDER);

pub static STATUS_UPDATE: RecordSchema = RecordSchema {
    name: "StatusUpdate",
    fields: &[
        ("unique_id", Required(Shape::String)),
        ("status", Required(Shape::String)),
        ("confirmations", Required(Shape::Integer)),
    ],
};

/// Crypto withdrawal status change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusUpdate {
    pub unique_id: String,
    pub status: String,
    pub confirmations: i64,
}

record!(StatusUpdate => STATUS_UPDATE);

pub static HISTORY_RECORD_ADDITIONAL_INFO: RecordSchema = RecordSchema {
    name: "HistoryRecordAdditionalInfo",
    fields: &[
        ("cost_per_coin", Required(Shape::Decimal)),
        ("cost_per_coin_symbol", Required(Shape::String)),
        ("currency_pair_symbol", Required(Shape::String)),
        ("order_id", Required(Shape::String)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryRecordAdditionalInfo {
    pub cost_per_coin: Decimal,
    pub cost_per_coin_symbol: String,
    pub currency_pair_symbol: String,
    pub order_id: String,
}

record!(HistoryRecordAdditionalInfo => HISTORY_RECORD_ADDITIONAL_INFO);

pub static TRANSACTION_TYPE_INFO: RecordSchema = RecordSchema {
    name: "TransactionTypeInfo",
    fields: &[
        ("type", Required(Shape::Enum(&TRANSACTION_TYPE))),
        ("description", Required(Shape::String)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransactionTypeInfo {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub description: String,
}

record!(TransactionTypeInfo => TRANSACTION_TYPE_INFO);

pub static NEW_ACCOUNT_HISTORY_RECORD: RecordSchema = RecordSchema {
    name: "NewAccountHistoryRecord",
    fields: &[
        ("transaction_type", Required(Shape::Record(&TRANSACTION_TYPE_INFO))),
        ("debit_currency", Required(Shape::Record(&CURRENCY_INFO))),
        ("debit_value", Required(Shape::Decimal)),
        ("credit_currency", Required(Shape::Record(&CURRENCY_INFO))),
        ("credit_value", Required(Shape::Decimal)),
        ("fee_currency", Required(Shape::Record(&CURRENCY_INFO))),
        ("fee_value", Required(Shape::Decimal)),
        ("event_at", Required(Shape::Timestamp)),
        ("additional_info", Required(Shape::Record(&HISTORY_RECORD_ADDITIONAL_INFO))),
        ("id", Required(Shape::String)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAccountHistoryRecord {
    pub transaction_type: TransactionTypeInfo,
    pub debit_currency: CurrencyInfo,
    pub debit_value: Decimal,
    pub credit_currency: CurrencyInfo,
    pub credit_value: Decimal,
    pub fee_currency: CurrencyInfo,
    pub fee_value: Decimal,
    pub event_at: DateTime<Utc>,
    pub additional_info: HistoryRecordAdditionalInfo,
    pub id: String,
}

record!(NewAccountHistoryRecord => NEW_ACCOUNT_HISTORY_RECORD);

pub static ORDER_STATUS_UPDATE: RecordSchema = RecordSchema {
    name: "OrderStatusUpdate",
    fields: &[
        ("order_id", Required(Shape::String)),
        ("order_status_type", Required(Shape::String)),
        ("currency_pair", Required(Shape::Union(&PAIR_OR_SYMBOL))),
        ("original_price", Required(Shape::Decimal)),
        ("remaining_quantity", Required(Shape::Decimal)),
        ("original_quantity", Required(Shape::Decimal)),
        ("order_side", Required(Shape::Enum(&ORDER_SIDE))),
        ("order_type", Required(Shape::Enum(&ORDER_TYPE))),
        ("failed_reason", Required(Shape::String)),
        ("order_updated_at", Required(Shape::Timestamp)),
        ("order_created_at", Required(Shape::Timestamp)),
        ("customer_order_id", Optional(Shape::String)),
        ("executed_price", Required(Shape::Decimal)),
        ("executed_quantity", Required(Shape::Decimal)),
        ("executed_fee", Required(Shape::Decimal)),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderStatusUpdate {
    pub order_id: String,
    pub order_status_type: String,
    pub currency_pair: PairRef,
    pub original_price: Decimal,
    pub remaining_quantity: Decimal,
    pub original_quantity: Decimal,
    pub order_side: OrderSide,
    pub order_type: OrderType,
    pub failed_reason: String,
    pub order_updated_at: DateTime<Utc>,
    pub order_created_at: DateTime<Utc>,
    pub customer_order_id: Option<String>,
    pub executed_price: Decimal,
    pub executed_quantity: Decimal,
    pub executed_fee: Decimal,
}

record!(OrderStatusUpdate => ORDER_STATUS_UPDATE);

pub static NEW_PENDING_RECEIVE: RecordSchema = RecordSchema {
    name: "NewPendingReceive",
    fields: &[
        ("currency", Required(Shape::Record(&CURRENCY_INFO))),
        ("receive_address", Required(Shape::String)),
        ("transaction_hash", Required(Shape::String)),
        ("amount", Required(Shape::Decimal)),
        ("created_at", Required(Shape::Timestamp)),
        ("confirmations", Required(Shape::Integer)),
        ("confirmed", Required(Shape::Boolean)),
    ],
};

/// Pending crypto deposit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewPendingReceive {
    pub currency: CurrencyInfo,
    pub receive_address: String,
    pub transaction_hash: String,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub confirmations: i64,
    pub confirmed: bool,
}

record!(NewPendingReceive => NEW_PENDING_RECEIVE);
