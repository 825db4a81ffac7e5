//! Property-style tests: invariants that must survive arbitrary operation
//! sequences, driven with seeded randomness so failures reproduce.

use matchbook_rs::{Order, OrderBook, OrderBookError, OrderId, Side, TradeId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

fn order(id: u64, side: Side, price: u64, quantity: u64) -> Order {
    Order::new(OrderId(id), side, price, quantity, "AAPL")
}

/// Submit a batch of random orders that never cross: bids in 50..=69,
/// asks in 70..=89. Returns what was submitted.
fn submit_uncrossed(book: &mut OrderBook, rng: &mut StdRng, count: u64) -> Vec<(u64, Side, u64, u64)> {
    let mut submitted = Vec::new();
    for id in 1..=count {
        let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
        let price = match side {
            Side::Buy => rng.gen_range(50..=69u64),
            Side::Sell => rng.gen_range(70..=89u64),
        };
        let quantity = rng.gen_range(1..=500u64);
        book.submit(order(id, side, price, quantity)).unwrap();
        submitted.push((id, side, price, quantity));
    }
    submitted
}

#[test]
fn p1_index_matches_trees_after_submits_and_cancels() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut book = OrderBook::new("AAPL");
    let submitted = submit_uncrossed(&mut book, &mut rng, 2000);

    // Cancel a random third of them.
    let mut ids: Vec<u64> = submitted.iter().map(|(id, ..)| *id).collect();
    ids.shuffle(&mut rng);
    let cancelled: Vec<u64> = ids.iter().copied().take(ids.len() / 3).collect();
    for id in &cancelled {
        book.cancel(OrderId(*id)).unwrap();
    }

    assert_eq!(book.bid_count() + book.ask_count(), book.active_orders());

    for (id, side, price, _) in &submitted {
        let resting = book.get_order(OrderId(*id));
        if cancelled.contains(id) {
            assert!(resting.is_none(), "cancelled order {id} still reachable");
        } else {
            let found = resting.expect("live order must be reachable");
            assert_eq!(found.side(), *side);
            assert_eq!(found.price(), *price);
        }
    }
}

#[test]
fn p2_book_is_uncrossed_after_match() {
    for seed in 0..10u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut book = OrderBook::new("AAPL");
        for id in 1..=1000u64 {
            let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
            let price = rng.gen_range(95..=105u64);
            let quantity = rng.gen_range(1..=100u64);
            book.submit(order(id, side, price, quantity)).unwrap();
        }
        book.match_orders().unwrap();

        if let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) {
            assert!(bid < ask, "seed {seed}: crossed after match ({bid} >= {ask})");
        }
    }
}

#[test]
fn p3_reachable_levels_are_never_empty() {
    let mut rng = StdRng::seed_from_u64(23);
    let mut book = OrderBook::new("AAPL");
    for id in 1..=3000u64 {
        let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
        book.submit(order(id, side, rng.gen_range(90..=110u64), rng.gen_range(1..=50u64)))
            .unwrap();
        if id % 7 == 0 {
            let victim = rng.gen_range(1..=id);
            let _ = book.cancel(OrderId(victim));
        }
        if id % 31 == 0 {
            book.match_orders().unwrap();
        }
    }
    book.match_orders().unwrap();

    for level in book
        .bid_levels(usize::MAX)
        .iter()
        .chain(book.ask_levels(usize::MAX).iter())
    {
        assert!(level.order_count > 0, "empty level at {} reachable", level.price);
        assert!(level.quantity > 0);
    }
}

#[test]
fn p4_timestamps_non_decreasing_within_levels() {
    let mut rng = StdRng::seed_from_u64(37);
    let mut book = OrderBook::new("AAPL");
    // Few prices so levels queue deeply.
    let mut by_level: HashMap<(Side, u64), Vec<u64>> = HashMap::new();
    for id in 1..=500u64 {
        let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
        let price = match side {
            Side::Buy => rng.gen_range(60..=62u64),
            Side::Sell => rng.gen_range(70..=72u64),
        };
        book.submit(order(id, side, price, 10)).unwrap();
        by_level.entry((side, price)).or_default().push(id);
    }

    for ids in by_level.values() {
        let mut previous = 0u64;
        for id in ids {
            let ts = book.get_order(OrderId(*id)).unwrap().timestamp();
            assert!(ts > previous, "queue timestamps out of order");
            previous = ts;
        }
    }
}

#[test]
fn p5_depth_round_trips_submitted_quantities() {
    let mut rng = StdRng::seed_from_u64(41);
    let mut book = OrderBook::new("AAPL");
    let submitted = submit_uncrossed(&mut book, &mut rng, 1500);

    let mut expected: HashMap<(Side, u64), (u64, usize)> = HashMap::new();
    for (_, side, price, quantity) in &submitted {
        let entry = expected.entry((*side, *price)).or_default();
        entry.0 += quantity;
        entry.1 += 1;
    }

    let mut observed: HashMap<(Side, u64), (u64, usize)> = HashMap::new();
    for level in book.bid_levels(usize::MAX) {
        observed.insert((Side::Buy, level.price), (level.quantity, level.order_count));
    }
    for level in book.ask_levels(usize::MAX) {
        observed.insert((Side::Sell, level.price), (level.quantity, level.order_count));
    }

    assert_eq!(expected, observed);
}

#[test]
fn p6_cancel_succeeds_exactly_once() {
    let mut rng = StdRng::seed_from_u64(43);
    let mut book = OrderBook::new("AAPL");
    let submitted = submit_uncrossed(&mut book, &mut rng, 300);

    for (id, ..) in &submitted {
        assert!(book.cancel(OrderId(*id)).is_ok());
        let before = (book.active_orders(), book.bid_count(), book.ask_count());
        assert_eq!(
            book.cancel(OrderId(*id)),
            Err(OrderBookError::OrderNotFound(OrderId(*id)))
        );
        let after = (book.active_orders(), book.bid_count(), book.ask_count());
        assert_eq!(before, after, "failed cancel must not change the book");
    }
    assert_eq!(book.active_orders(), 0);
}

#[test]
fn p7_trade_quantities_conserve_fills() {
    let mut rng = StdRng::seed_from_u64(47);
    let mut book = OrderBook::new("AAPL");
    let mut original: HashMap<u64, u64> = HashMap::new();
    for id in 1..=2000u64 {
        let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
        let quantity = rng.gen_range(1..=200u64);
        book.submit(order(id, side, rng.gen_range(98..=102u64), quantity))
            .unwrap();
        original.insert(id, quantity);
    }

    let trades = book.match_orders().unwrap();

    // Per-order executed quantity according to the trade tape.
    let mut executed: HashMap<u64, u64> = HashMap::new();
    for trade in &trades {
        *executed.entry(trade.buy_order_id().0).or_default() += trade.quantity();
        *executed.entry(trade.sell_order_id().0).or_default() += trade.quantity();
    }

    let mut total_decrease = 0u64;
    for (id, quantity) in &original {
        let remaining = book
            .get_order(OrderId(*id))
            .map(|o| o.remaining_quantity())
            .unwrap_or(0);
        let decrease = quantity - remaining;
        total_decrease += decrease;
        assert_eq!(
            decrease,
            executed.get(id).copied().unwrap_or(0),
            "order {id}: tape disagrees with remaining quantity"
        );
    }

    let tape_volume: u64 = trades.iter().map(|t| t.quantity()).sum();
    assert_eq!(total_decrease, tape_volume * 2);
}

#[test]
fn p8_trade_ids_strictly_increase() {
    let mut rng = StdRng::seed_from_u64(53);
    let mut book = OrderBook::new("AAPL");
    let mut last = TradeId(0);
    let mut next_id = 1u64;

    for _ in 0..20 {
        for _ in 0..200 {
            let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
            book.submit(order(
                next_id,
                side,
                rng.gen_range(99..=101u64),
                rng.gen_range(1..=50u64),
            ))
            .unwrap();
            next_id += 1;
        }
        for trade in book.match_orders().unwrap() {
            assert!(trade.trade_id() > last, "trade ids must strictly increase");
            last = trade.trade_id();
        }
    }
}
