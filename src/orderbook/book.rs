//! Core OrderBook implementation for managing price levels and orders

use crate::btree::{Direction, PriceTree, DEFAULT_DEGREE};
use crate::order::{Order, OrderId, Price, Side};
use crate::pricelevel::PriceLevelSnapshot;
use crate::trade::TradeId;
use crate::utils::monotonic_nanos;
use std::collections::HashMap;
use tracing::trace;

/// The OrderBook manages the price levels of one symbol on both sides and
/// matches crossed orders under price-time priority.
///
/// All mutating operations take `&mut self` and run to completion; the book
/// takes no locks and must not be shared across threads without external
/// exclusion. One book per symbol, one thread per book is the intended
/// deployment shape.
#[derive(Debug)]
pub struct OrderBook {
    /// The symbol or identifier for this order book
    pub(super) symbol: String,

    /// Bid side price levels, keyed by price
    pub(super) bids: PriceTree,

    /// Ask side price levels, keyed by price
    pub(super) asks: PriceTree,

    /// Map from order id to (side, price) so cancellation finds the level
    /// without searching either tree
    pub(super) order_index: HashMap<OrderId, (Side, Price)>,

    /// Resting orders on the bid side
    pub(super) bid_count: usize,

    /// Resting orders on the ask side
    pub(super) ask_count: usize,

    /// Cumulative accepted orders over the book's lifetime
    pub(super) total_orders: u64,

    /// Cumulative trades over the book's lifetime
    pub(super) total_trades: u64,

    /// Last issued trade id; the sequence is strictly increasing per book
    pub(super) trade_id_seq: u64,

    /// Last assigned submission timestamp, used to keep stamps strictly
    /// increasing even when the clock reads the same nanosecond twice
    pub(super) last_timestamp: u64,
}

impl OrderBook {
    /// Create a new order book for the given symbol with the default tree
    /// degree.
    pub fn new(symbol: &str) -> Self {
        Self::with_degree(symbol, DEFAULT_DEGREE)
    }

    /// Create a new order book with an explicit B+ tree minimum degree.
    ///
    /// # Panics
    ///
    /// Panics if `degree < 2`.
    pub fn with_degree(symbol: &str, degree: usize) -> Self {
        trace!("Order book {}: created with degree {}", symbol, degree);
        Self {
            symbol: symbol.to_string(),
            bids: PriceTree::with_degree(degree),
            asks: PriceTree::with_degree(degree),
            order_index: HashMap::new(),
            bid_count: 0,
            ask_count: 0,
            total_orders: 0,
            total_trades: 0,
            trade_id_seq: 0,
            last_timestamp: 0,
        }
    }

    /// Get the symbol of this order book
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Get the best bid price, if any
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.max_price()
    }

    /// Get the best ask price, if any
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.min_price()
    }

    /// Get the spread (best ask - best bid). Absent when either side is
    /// empty; while the book is crossed the saturation floors it at zero.
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.saturating_sub(bid)),
            _ => None,
        }
    }

    /// Get the mid price (average of best bid and best ask)
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid as f64 + ask as f64) / 2.0),
            _ => None,
        }
    }

    /// Up to `max_levels` bid levels, best (highest) price first.
    pub fn bid_levels(&self, max_levels: usize) -> Vec<PriceLevelSnapshot> {
        self.bids
            .iter(Direction::Descending)
            .take(max_levels)
            .map(|level| level.snapshot())
            .collect()
    }

    /// Up to `max_levels` ask levels, best (lowest) price first.
    pub fn ask_levels(&self, max_levels: usize) -> Vec<PriceLevelSnapshot> {
        self.asks
            .iter(Direction::Ascending)
            .take(max_levels)
            .map(|level| level.snapshot())
            .collect()
    }

    /// Get a resting order by id
    pub fn get_order(&self, order_id: OrderId) -> Option<&Order> {
        let (side, price) = *self.order_index.get(&order_id)?;
        let tree = match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        };
        tree.level(price)?.iter().find(|o| o.id() == order_id)
    }

    /// Number of resting bid orders
    pub fn bid_count(&self) -> usize {
        self.bid_count
    }

    /// Number of resting ask orders
    pub fn ask_count(&self) -> usize {
        self.ask_count
    }

    /// Number of orders currently resting on either side
    pub fn active_orders(&self) -> usize {
        self.order_index.len()
    }

    /// Cumulative count of accepted orders
    pub fn total_orders(&self) -> u64 {
        self.total_orders
    }

    /// Cumulative count of trades produced by matching
    pub fn total_trades(&self) -> u64 {
        self.total_trades
    }

    /// Next trade id. Strictly increasing per book.
    pub(super) fn next_trade_id(&mut self) -> TradeId {
        self.trade_id_seq += 1;
        TradeId(self.trade_id_seq)
    }

    /// Next submission timestamp: monotonic nanoseconds, bumped past the
    /// previous stamp so ordering within a level is always decidable.
    pub(super) fn next_timestamp(&mut self) -> u64 {
        let now = monotonic_nanos().max(self.last_timestamp + 1);
        self.last_timestamp = now;
        now
    }
}
