use crate::core::errors::DecodeError;
use crate::core::schema::coerce::coerce_enum;
use crate::core::schema::EnumSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Declares a closed string enum together with its static schema
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $schema:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant, )+
        }

        pub static $schema: EnumSchema = EnumSchema {
            name: stringify!($name),
            variants: &[$($wire),+],
        };

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $wire, )+
                }
            }

            pub fn schema() -> &'static EnumSchema {
                &$schema
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DecodeError;

            /// Accepts the wire spelling or a case/separator variation of it
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = Value::String(s.to_string());
                match coerce_enum(&raw, &$schema, stringify!($name))? {
                    $( $wire => Ok(Self::$variant), )+
                    _ => Err(DecodeError::mismatch(stringify!($name), concat!("enum ", stringify!($name)), &raw)),
                }
            }
        }
    };
}

wire_enum! {
    TimeInForce, TIME_IN_FORCE {
        /// Good till cancelled
        Gtc => "GTC",
        /// Fill or kill
        Fok => "FOK",
        /// Immediate or cancel
        Ioc => "IOC",
    }
}

wire_enum! {
    OrderType, ORDER_TYPE {
        LimitPostOnly => "LIMIT_POST_ONLY",
        Market => "MARKET",
        Limit => "LIMIT",
        Simple => "SIMPLE",
        StopLossLimit => "STOP_LOSS_LIMIT",
        TakeProfitLimit => "TAKE_PROFIT_LIMIT",
    }
}

wire_enum! {
    OrderSide, ORDER_SIDE {
        Buy => "BUY",
        Sell => "SELL",
    }
}

wire_enum! {
    TransactionType, TRANSACTION_TYPE {
        LimitBuy => "LIMIT_BUY",
        LimitSell => "LIMIT_SELL",
        MarketBuy => "MARKET_BUY",
        MarketSell => "MARKET_SELL",
        SimpleBuy => "SIMPLE_BUY",
        SimpleSell => "SIMPLE_SELL",
        AutoBuy => "AUTO_BUY",
        MakerReward => "MAKER_REWARD",
        BlockchainReceive => "BLOCKCHAIN_RECEIVE",
        BlockchainSend => "BLOCKCHAIN_SEND",
        FiatDeposit => "FIAT_DEPOSIT",
        FiatWithdrawal => "FIAT_WITHDRAWAL",
        ReferralRebate => "REFERRAL_REBATE",
        ReferralReward => "REFERRAL_REWARD",
        PromotionalRebate => "PROMOTIONAL_REBATE",
        InternalTransfer => "INTERNAL_TRANSFER",
        FiatWithdrawalReversal => "FIAT_WITHDRAWAL_REVERSAL",
        PaymentSent => "PAYMENT_SENT",
        PaymentReceived => "PAYMENT_RECEIVED",
        PaymentReversed => "PAYMENT_REVERSED",
        PaymentReward => "PAYMENT_REWARD",
        OffChainBlockchainWithdraw => "OFF_CHAIN_BLOCKCHAIN_WITHDRAW",
        OffChainBlockchainDeposit => "OFF_CHAIN_BLOCKCHAIN_DEPOSIT",
        SimpleSwapBuy => "SIMPLE_SWAP_BUY",
        SimpleSwapSell => "SIMPLE_SWAP_SELL",
        SimpleSwapFailureReversal => "SIMPLE_SWAP_FAILURE_REVERSAL",
    }
}

wire_enum! {
    TriggerOrderType, TRIGGER_ORDER_TYPE {
        StopLossLimit => "STOP_LOSS_LIMIT",
        TakeProfitLimit => "TAKE_PROFIT_LIMIT",
    }
}

wire_enum! {
    /// The `type` discriminator of every stream frame
    EventTag, EVENT_TAG {
        Authenticated => "AUTHENTICATED",
        Ping => "PING",
        Pong => "PONG",
        Subscribe => "SUBSCRIBE",
        Unsubscribe => "UNSUBSCRIBE",
        Subscribed => "SUBSCRIBED",
        Unsubscribed => "UNSUBSCRIBED",
        NoSubscriptions => "NO_SUBSCRIPTIONS",
        NewAccountHistoryRecord => "NEW_ACCOUNT_HISTORY_RECORD",
        BalanceUpdate => "BALANCE_UPDATE",
        NewAccountTrade => "NEW_ACCOUNT_TRADE",
        InstantOrderCompleted => "INSTANT_ORDER_COMPLETED",
        OpenOrdersUpdate => "OPEN_ORDERS_UPDATE",
        OrderProcessed => "ORDER_PROCESSED",
        OrderStatusUpdate => "ORDER_STATUS_UPDATE",
        FailedCancelOrder => "FAILED_CANCEL_ORDER",
        NewPendingReceive => "NEW_PENDING_RECEIVE",
        SendStatusUpdate => "SEND_STATUS_UPDATE",
        AggregatedOrderbookUpdate => "AGGREGATED_ORDERBOOK_UPDATE",
        FullOrderbookUpdate => "FULL_ORDERBOOK_UPDATE",
        MarketSummaryUpdate => "MARKET_SUMMARY_UPDATE",
        NewTradeBucket => "NEW_TRADE_BUCKET",
        NewTrade => "NEW_TRADE",
        MarkPriceUpdate => "MARK_PRICE_UPDATE",
    }
}

impl EventTag {
    /// Control tags carry no payload and are never queued
    pub fn is_control(&self) -> bool {
        matches!(
            self,
            Self::Authenticated
                | Self::Ping
                | Self::Pong
                | Self::Subscribe
                | Self::Unsubscribe
                | Self::Subscribed
                | Self::Unsubscribed
                | Self::NoSubscriptions
        )
    }

    /// Channel a data tag is delivered on; `None` for control tags
    pub fn channel(&self) -> Option<Channel> {
        match self {
            Self::AggregatedOrderbookUpdate
            | Self::FullOrderbookUpdate
            | Self::MarketSummaryUpdate
            | Self::NewTradeBucket
            | Self::NewTrade
            | Self::MarkPriceUpdate => Some(Channel::Market),
            Self::NewAccountHistoryRecord
            | Self::BalanceUpdate
            | Self::NewAccountTrade
            | Self::InstantOrderCompleted
            | Self::OpenOrdersUpdate
            | Self::OrderProcessed
            | Self::OrderStatusUpdate
            | Self::FailedCancelOrder
            | Self::NewPendingReceive
            | Self::SendStatusUpdate => Some(Channel::Account),
            _ => None,
        }
    }
}

/// The two stream endpoints. At most one pipeline per channel is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Channel {
    Account,
    #[serde(rename = "TRADE")]
    Market,
}

impl Channel {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Account => "/ws/account",
            Self::Market => "/ws/trade",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
