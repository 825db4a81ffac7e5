//! Trade records produced by matching.

use crate::order::{OrderId, Price, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade identifier. Strictly increasing in emission order within a book.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TradeId(pub u64);

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An execution pairing one buy order with one sell order.
///
/// Trades are immutable once emitted; the book returns them to the caller
/// and keeps no copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    trade_id: TradeId,
    buy_order_id: OrderId,
    sell_order_id: OrderId,
    price: Price,
    quantity: Quantity,
    symbol: String,
    /// Monotonic nanoseconds at emission.
    timestamp: u64,
}

impl Trade {
    pub(crate) fn new(
        trade_id: TradeId,
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        price: Price,
        quantity: Quantity,
        symbol: &str,
        timestamp: u64,
    ) -> Self {
        Self {
            trade_id,
            buy_order_id,
            sell_order_id,
            price,
            quantity,
            symbol: symbol.to_string(),
            timestamp,
        }
    }

    pub fn trade_id(&self) -> TradeId {
        self.trade_id
    }

    pub fn buy_order_id(&self) -> OrderId {
        self.buy_order_id
    }

    pub fn sell_order_id(&self) -> OrderId {
        self.sell_order_id
    }

    /// Execution price. Matching executes at the resting ask price.
    pub fn price(&self) -> Price {
        self.price
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trade {{ id: {}, {} {}@{} buy {} sell {} }}",
            self.trade_id,
            self.symbol,
            self.quantity,
            self.price,
            self.buy_order_id,
            self.sell_order_id
        )
    }
}
