//! Order book error types

use crate::order::OrderId;
use std::fmt;

/// Errors that can occur within the OrderBook
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderBookError {
    /// Order rejected before touching the book: zero quantity, zero price
    /// or a symbol that does not match the book's
    BadOrder {
        /// Description of the rejection
        message: String,
    },

    /// An order with the same id already rests in the book
    DuplicateOrderId(OrderId),

    /// Cancel target is absent: never rested, already filled or already
    /// cancelled
    OrderNotFound(OrderId),

    /// No book registered for the symbol (router only)
    UnknownSymbol(String),

    /// Internal structures disagree; should be unreachable and signals a bug
    InvariantViolation {
        /// What disagreed
        message: String,
    },
}

impl fmt::Display for OrderBookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBookError::BadOrder { message } => write!(f, "Bad order: {}", message),
            OrderBookError::DuplicateOrderId(id) => {
                write!(f, "Duplicate order id: {}", id)
            }
            OrderBookError::OrderNotFound(id) => write!(f, "Order not found: {}", id),
            OrderBookError::UnknownSymbol(symbol) => {
                write!(f, "No order book for symbol: {}", symbol)
            }
            OrderBookError::InvariantViolation { message } => {
                write!(f, "Order book invariant violated: {}", message)
            }
        }
    }
}

impl std::error::Error for OrderBookError {}
