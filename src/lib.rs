//! # Matchbook
//!
//! An in-memory limit order book and matching engine for continuous-auction
//! trading, written in Rust. One [`OrderBook`] exists per symbol; it accepts
//! limit orders, matches them under strict price-time priority, and answers
//! market-data queries (best bid/ask, spread, depth of book).
//!
//! ## Key Features
//!
//! - **B+ tree price ladder**: each side of the book is a leaf-storage B+
//!   tree keyed on price. Internal nodes carry routing keys only; all price
//!   levels live in leaves that are doubly linked, so ordered depth walks
//!   cost O(1) per level emitted instead of a tree re-descent.
//!
//! - **O(1) cancellation lookup**: a hash index maps every resting order id
//!   to its side and price, so `cancel` goes straight to the right level.
//!
//! - **Deterministic matching**: `match_orders` repeatedly pairs the best
//!   bid with the best ask until the book is uncrossed. Trades execute at
//!   the resting ask price; within a level the oldest order fills first.
//!
//! - **Fixed-point prices**: prices and quantities are `u64` ticks. Float
//!   keys and equality-on-double hazards never enter the tree.
//!
//! - **Multi-symbol routing**: a [`MatchingEngine`] owns one book per symbol
//!   and forwards submissions, cancels, matching, and queries.
//!
//! ## Concurrency Model
//!
//! A book is single-threaded: every mutating operation takes `&mut self`,
//! runs to completion, and never blocks. The core takes no locks. To trade
//! many symbols in parallel, run one book per thread or shard by symbol;
//! cross-thread access to a single book is the caller's exclusion problem.
//!
//! ## Example
//!
//! ```
//! use matchbook_rs::{Order, OrderBook, OrderId, Side};
//!
//! let mut book = OrderBook::new("AAPL");
//! book.submit(Order::new(OrderId(1), Side::Buy, 100, 100, "AAPL")).unwrap();
//! book.submit(Order::new(OrderId(2), Side::Sell, 100, 50, "AAPL")).unwrap();
//!
//! let trades = book.match_orders().unwrap();
//! assert_eq!(trades.len(), 1);
//! assert_eq!(trades[0].quantity(), 50);
//! assert_eq!(book.best_bid(), Some(100));
//! assert_eq!(book.best_ask(), None);
//! ```

pub mod btree;
mod engine;
mod order;
mod orderbook;
pub mod pricelevel;
mod trade;
mod utils;

pub use btree::{Direction, PriceTree};
pub use engine::MatchingEngine;
pub use order::{Order, OrderId, OrderStatus, Price, Quantity, Side};
pub use orderbook::{
    BookStats, MatchError, OrderBook, OrderBookError, OrderBookSnapshot,
};
pub use pricelevel::{PriceLevel, PriceLevelSnapshot};
pub use trade::{Trade, TradeId};
pub use utils::{current_time_millis, monotonic_nanos, setup_logger};
