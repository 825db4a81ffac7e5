//! Multi-symbol router: one order book per symbol behind a single façade.

use crate::order::{Order, OrderId, Price};
use crate::orderbook::{MatchError, OrderBook, OrderBookError, OrderBookSnapshot};
use crate::trade::Trade;
use std::collections::HashMap;
use tracing::debug;

/// Owns one [`OrderBook`] per symbol and forwards submissions, cancels,
/// matching and market-data queries to the right one.
///
/// The engine gives no cross-book atomicity: each call touches exactly one
/// book. Like the books it owns, it is single-threaded; shard engines by
/// symbol to parallelize.
#[derive(Debug, Default)]
pub struct MatchingEngine {
    books: HashMap<String, OrderBook>,
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self {
            books: HashMap::new(),
        }
    }

    /// Register a book for `symbol` with the default tree degree. Replaces
    /// any existing book for the symbol.
    pub fn create_book(&mut self, symbol: &str) {
        debug!("Matching engine: creating book for {}", symbol);
        self.books.insert(symbol.to_string(), OrderBook::new(symbol));
    }

    /// Register a book for `symbol` with an explicit B+ tree degree.
    pub fn create_book_with_degree(&mut self, symbol: &str, degree: usize) {
        debug!(
            "Matching engine: creating book for {} with degree {}",
            symbol, degree
        );
        self.books
            .insert(symbol.to_string(), OrderBook::with_degree(symbol, degree));
    }

    pub fn book(&self, symbol: &str) -> Option<&OrderBook> {
        self.books.get(symbol)
    }

    pub fn book_mut(&mut self, symbol: &str) -> Option<&mut OrderBook> {
        self.books.get_mut(symbol)
    }

    /// Symbols with a registered book, in no particular order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.books.keys().map(String::as_str)
    }

    /// Route an order to the book for its symbol.
    pub fn submit(&mut self, order: Order) -> Result<(), OrderBookError> {
        match self.books.get_mut(order.symbol()) {
            Some(book) => book.submit(order),
            None => Err(OrderBookError::UnknownSymbol(order.symbol().to_string())),
        }
    }

    /// Cancel an order resting in the book for `symbol`.
    pub fn cancel(&mut self, symbol: &str, order_id: OrderId) -> Result<Order, OrderBookError> {
        match self.books.get_mut(symbol) {
            Some(book) => book.cancel(order_id),
            None => Err(OrderBookError::UnknownSymbol(symbol.to_string())),
        }
    }

    /// Run matching for `symbol`.
    pub fn match_symbol(&mut self, symbol: &str) -> Result<Vec<Trade>, MatchError> {
        match self.books.get_mut(symbol) {
            Some(book) => book.match_orders(),
            None => Err(MatchError {
                trades: Vec::new(),
                source: OrderBookError::UnknownSymbol(symbol.to_string()),
            }),
        }
    }

    pub fn best_bid(&self, symbol: &str) -> Option<Price> {
        self.books.get(symbol).and_then(|book| book.best_bid())
    }

    pub fn best_ask(&self, symbol: &str) -> Option<Price> {
        self.books.get(symbol).and_then(|book| book.best_ask())
    }

    /// Snapshot the book for `symbol` at the given depth.
    pub fn snapshot(&self, symbol: &str, depth: usize) -> Option<OrderBookSnapshot> {
        self.books.get(symbol).map(|book| book.snapshot(depth))
    }
}
