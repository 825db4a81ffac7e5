//! Order book snapshot for market data

use super::book::OrderBook;
use crate::order::{Price, Quantity};
use crate::pricelevel::PriceLevelSnapshot;
use crate::utils::current_time_millis;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Aggregate counters captured with a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookStats {
    /// Cumulative accepted orders
    pub total_orders: u64,
    /// Resting bid orders
    pub bid_count: usize,
    /// Resting ask orders
    pub ask_count: usize,
    /// Orders currently resting on either side
    pub active_orders: usize,
    /// Cumulative trades
    pub total_trades: u64,
}

/// A snapshot of the order book state at a specific point in time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBookSnapshot {
    /// The symbol or identifier for this order book
    pub symbol: String,

    /// Timestamp when the snapshot was created (milliseconds since epoch)
    pub timestamp: u64,

    /// Best bid price, absent when the bid side is empty
    pub best_bid: Option<Price>,

    /// Best ask price, absent when the ask side is empty
    pub best_ask: Option<Price>,

    /// Bid levels, best price first
    pub bids: Vec<PriceLevelSnapshot>,

    /// Ask levels, best price first
    pub asks: Vec<PriceLevelSnapshot>,

    /// Book counters at capture time
    pub stats: BookStats,
}

impl OrderBookSnapshot {
    /// Get the best bid price and quantity
    pub fn best_bid_level(&self) -> Option<(Price, Quantity)> {
        self.bids.first().map(|level| (level.price, level.quantity))
    }

    /// Get the best ask price and quantity
    pub fn best_ask_level(&self) -> Option<(Price, Quantity)> {
        self.asks.first().map(|level| (level.price, level.quantity))
    }

    /// Calculate the total resting volume on the bid side
    pub fn total_bid_volume(&self) -> Quantity {
        self.bids.iter().map(|level| level.quantity).sum()
    }

    /// Calculate the total resting volume on the ask side
    pub fn total_ask_volume(&self) -> Quantity {
        self.asks.iter().map(|level| level.quantity).sum()
    }
}

impl OrderBook {
    /// Create a snapshot of the current order book state, reporting up to
    /// `depth` levels per side.
    pub fn snapshot(&self, depth: usize) -> OrderBookSnapshot {
        trace!("Order book {}: Creating snapshot depth {}", self.symbol, depth);
        OrderBookSnapshot {
            symbol: self.symbol.clone(),
            timestamp: current_time_millis(),
            best_bid: self.best_bid(),
            best_ask: self.best_ask(),
            bids: self.bid_levels(depth),
            asks: self.ask_levels(depth),
            stats: BookStats {
                total_orders: self.total_orders(),
                bid_count: self.bid_count(),
                ask_count: self.ask_count(),
                active_orders: self.active_orders(),
                total_trades: self.total_trades(),
            },
        }
    }
}
