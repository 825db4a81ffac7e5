//! Contains the core matching engine logic for the order book.

use super::book::OrderBook;
use super::error::OrderBookError;
use crate::trade::Trade;
use crate::utils::monotonic_nanos;
use std::fmt;
use tracing::trace;

/// A matching run that had to stop early.
///
/// The trades produced before the abort are handed back alongside the
/// underlying error; they are real executions and the caller must not drop
/// them.
#[derive(Debug)]
pub struct MatchError {
    /// Trades emitted before the run aborted
    pub trades: Vec<Trade>,
    /// Why the run aborted
    pub source: OrderBookError,
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matching aborted after {} trade(s): {}",
            self.trades.len(),
            self.source
        )
    }
}

impl std::error::Error for MatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl OrderBook {
    /// Match crossed orders until the book is uncrossed.
    ///
    /// Each iteration pairs the front order of the best bid level with the
    /// front order of the best ask level, executes `min(remaining,
    /// remaining)` at the resting ask price and emits a trade. Fully filled
    /// orders are popped, erased from the index and their level pruned if it
    /// emptied. On return either one side is empty or `best_bid <
    /// best_ask` strictly.
    pub fn match_orders(&mut self) -> Result<Vec<Trade>, MatchError> {
        let mut trades = Vec::new();

        loop {
            let (Some(bid_price), Some(ask_price)) = (self.bids.max_price(), self.asks.min_price())
            else {
                break;
            };
            if bid_price < ask_price {
                break;
            }

            let buy_id;
            let sell_id;
            let quantity;
            let buy_done;
            let sell_done;
            let bid_emptied;
            let ask_emptied;
            {
                let Some(bid_level) = self.bids.level_mut(bid_price) else {
                    let source = self
                        .integrity_failure(format!("best bid {} has no level", bid_price));
                    return Err(MatchError { trades, source });
                };
                let Some(ask_level) = self.asks.level_mut(ask_price) else {
                    let source = self
                        .integrity_failure(format!("best ask {} has no level", ask_price));
                    return Err(MatchError { trades, source });
                };
                let Some(buy) = bid_level.front_mut() else {
                    let source = self
                        .integrity_failure(format!("bid level {} reachable but empty", bid_price));
                    return Err(MatchError { trades, source });
                };
                buy_id = buy.id();
                let buy_remaining = buy.remaining_quantity();
                let Some(sell) = ask_level.front_mut() else {
                    let source = self
                        .integrity_failure(format!("ask level {} reachable but empty", ask_price));
                    return Err(MatchError { trades, source });
                };
                sell_id = sell.id();

                quantity = buy_remaining.min(sell.remaining_quantity());
                if quantity == 0 {
                    // A resting order with nothing left violates the
                    // positive-quantity invariant and would spin this loop.
                    let source = self.integrity_failure(format!(
                        "zero-quantity pairing of orders {} and {}",
                        buy_id, sell_id
                    ));
                    return Err(MatchError { trades, source });
                }

                sell.fill(quantity);
                sell_done = sell.is_filled();
                if sell_done {
                    ask_level.pop_front();
                }
                ask_emptied = ask_level.is_empty();

                // Re-borrow the buy side now the quantity is settled.
                let Some(buy) = bid_level.front_mut() else {
                    let source = self
                        .integrity_failure(format!("bid level {} lost its front", bid_price));
                    return Err(MatchError { trades, source });
                };
                buy.fill(quantity);
                buy_done = buy.is_filled();
                if buy_done {
                    bid_level.pop_front();
                }
                bid_emptied = bid_level.is_empty();
            }

            // Trades execute at the resting ask price.
            let trade = Trade::new(
                self.next_trade_id(),
                buy_id,
                sell_id,
                ask_price,
                quantity,
                &self.symbol,
                monotonic_nanos(),
            );
            trace!(
                "Order book {}: Trade {} buy {} sell {} {}@{}",
                self.symbol,
                trade.trade_id(),
                buy_id,
                sell_id,
                quantity,
                ask_price
            );

            if buy_done {
                self.order_index.remove(&buy_id);
                self.bid_count -= 1;
                if bid_emptied {
                    self.bids.remove_level(bid_price);
                }
            }
            if sell_done {
                self.order_index.remove(&sell_id);
                self.ask_count -= 1;
                if ask_emptied {
                    self.asks.remove_level(ask_price);
                }
            }

            self.total_trades += 1;
            trades.push(trade);
        }

        Ok(trades)
    }
}
