//! Order book operations: submitting and cancelling orders

use super::book::OrderBook;
use super::error::OrderBookError;
use crate::order::{Order, OrderId, Price, Quantity, Side};
use tracing::{error, trace};

impl OrderBook {
    /// Submit a limit order to the book.
    ///
    /// Validation happens before any mutation: a rejected submit leaves the
    /// book exactly as it was. On accept the book stamps the order with a
    /// strictly increasing submission timestamp, appends it to the FIFO
    /// queue of its price level (creating the level if needed) and records
    /// it in the order index.
    ///
    /// Submitting does not trigger matching; call
    /// [`OrderBook::match_orders`] to drain crossed prices.
    pub fn submit(&mut self, mut order: Order) -> Result<(), OrderBookError> {
        if order.symbol() != self.symbol {
            return Err(OrderBookError::BadOrder {
                message: format!(
                    "symbol {} does not match book {}",
                    order.symbol(),
                    self.symbol
                ),
            });
        }
        if order.price() == 0 {
            return Err(OrderBookError::BadOrder {
                message: "price must be positive".to_string(),
            });
        }
        if order.quantity() == 0 {
            return Err(OrderBookError::BadOrder {
                message: "quantity must be positive".to_string(),
            });
        }
        // Checked before any tree descent so a duplicate cannot leave a
        // half-applied insert behind.
        if self.order_index.contains_key(&order.id()) {
            return Err(OrderBookError::DuplicateOrderId(order.id()));
        }

        let id = order.id();
        let side = order.side();
        let price = order.price();
        order.set_timestamp(self.next_timestamp());

        trace!(
            "Order book {}: Adding order {} {} {}@{}",
            self.symbol,
            id,
            side,
            order.quantity(),
            price
        );

        match side {
            Side::Buy => {
                self.bids.insert(price, order);
                self.bid_count += 1;
            }
            Side::Sell => {
                self.asks.insert(price, order);
                self.ask_count += 1;
            }
        }
        self.order_index.insert(id, (side, price));
        self.total_orders += 1;
        Ok(())
    }

    /// Convenience constructor-and-submit for a limit order.
    pub fn submit_limit(
        &mut self,
        id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Result<(), OrderBookError> {
        let symbol = self.symbol.clone();
        self.submit(Order::new(id, side, price, quantity, &symbol))
    }

    /// Cancel a resting order by id, returning it with status `Cancelled`.
    ///
    /// The index gives the side and price; the level queue is scanned for
    /// the order itself. A level emptied by the cancel is pruned from its
    /// tree so best-price queries never see hollow levels.
    pub fn cancel(&mut self, order_id: OrderId) -> Result<Order, OrderBookError> {
        let (side, price) = *self
            .order_index
            .get(&order_id)
            .ok_or(OrderBookError::OrderNotFound(order_id))?;

        let tree = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };

        let Some(level) = tree.level_mut(price) else {
            return Err(self.integrity_failure(format!(
                "index maps order {} to missing {} level {}",
                order_id, side, price
            )));
        };
        let Some(mut order) = level.remove(order_id) else {
            return Err(self.integrity_failure(format!(
                "index maps order {} to {} level {} but the queue does not hold it",
                order_id, side, price
            )));
        };
        if level.is_empty() {
            tree.remove_level(price);
        }

        self.order_index.remove(&order_id);
        match side {
            Side::Buy => self.bid_count -= 1,
            Side::Sell => self.ask_count -= 1,
        }
        order.cancel();

        trace!(
            "Order book {}: Cancelled order {} {} @{}",
            self.symbol,
            order_id,
            side,
            price
        );
        Ok(order)
    }

    /// Record an unreachable-state failure. Debug builds abort loudly;
    /// release builds log and fail the operation closed.
    pub(super) fn integrity_failure(&self, message: String) -> OrderBookError {
        error!("Order book {}: {}", self.symbol, message);
        debug_assert!(false, "order book invariant violated: {message}");
        OrderBookError::InvariantViolation { message }
    }
}
