//! Order value types: sides, statuses, identifiers and the order itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Price in fixed-point ticks. The tick scale is a venue convention (for
/// example 1 tick = 0.0001 currency units); the book only requires that all
/// prices for one symbol share it.
pub type Price = u64;

/// Quantity in whole units.
pub type Quantity = u64;

/// Side of the book an order rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Buy side (bids).
    Buy,
    /// Sell side (asks).
    Sell,
}

impl Side {
    /// Returns the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Lifecycle state of an order.
///
/// `Filled` and `Cancelled` are terminal: an order in either state is absent
/// from the book and its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Accepted, nothing executed yet.
    New,
    /// Some quantity executed, some still resting.
    PartiallyFilled,
    /// Fully executed.
    Filled,
    /// Removed by the owner before completion.
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::New => write!(f, "NEW"),
            OrderStatus::PartiallyFilled => write!(f, "PARTIALLY_FILLED"),
            OrderStatus::Filled => write!(f, "FILLED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Caller-chosen order identifier, unique per book.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct OrderId(pub u64);

impl From<u64> for OrderId {
    fn from(raw: u64) -> Self {
        OrderId(raw)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A limit order.
///
/// Callers construct orders and hand them to [`crate::OrderBook::submit`];
/// from then on the book is the only writer. Status, remaining quantity and
/// the submission timestamp are mutated exclusively by book operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    side: Side,
    price: Price,
    quantity: Quantity,
    remaining: Quantity,
    symbol: String,
    status: OrderStatus,
    /// Monotonic nanoseconds, assigned by the book at accept time. Strictly
    /// increasing within a book, which makes FIFO order within a price level
    /// decidable by timestamp alone.
    timestamp: u64,
}

impl Order {
    /// Create a new limit order. The timestamp is assigned when the order is
    /// accepted by a book, not here.
    pub fn new(
        id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
        symbol: &str,
    ) -> Self {
        Self {
            id,
            side,
            price,
            quantity,
            remaining: quantity,
            symbol: symbol.to_string(),
            status: OrderStatus::New,
            timestamp: 0,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// Original quantity at submission.
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Quantity still resting on the book.
    pub fn remaining_quantity(&self) -> Quantity {
        self.remaining
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Submission timestamp in monotonic nanoseconds. Zero until accepted.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn is_filled(&self) -> bool {
        self.status == OrderStatus::Filled
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == OrderStatus::Cancelled
    }

    /// Execute `quantity` against this order, updating remaining quantity
    /// and status.
    pub(crate) fn fill(&mut self, quantity: Quantity) {
        self.remaining = self.remaining.saturating_sub(quantity);
        if self.remaining == 0 {
            self.status = OrderStatus::Filled;
        } else if self.remaining < self.quantity {
            self.status = OrderStatus::PartiallyFilled;
        }
    }

    pub(crate) fn cancel(&mut self) {
        self.status = OrderStatus::Cancelled;
    }

    pub(crate) fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order {{ id: {}, {} {} {}@{} remaining {} [{}] }}",
            self.id,
            self.symbol,
            self.side,
            self.quantity,
            self.price,
            self.remaining,
            self.status
        )
    }
}
