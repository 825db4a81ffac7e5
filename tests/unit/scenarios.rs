//! End-to-end scenarios: the flows a venue actually runs, checked literally.

use matchbook_rs::{
    MatchingEngine, Order, OrderBook, OrderBookError, OrderId, OrderStatus, Side,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn order(id: u64, side: Side, price: u64, quantity: u64) -> Order {
    Order::new(OrderId(id), side, price, quantity, "AAPL")
}

#[test]
fn basic_cross_partial_fill() {
    let mut book = OrderBook::new("AAPL");
    book.submit(order(1, Side::Buy, 100, 100)).unwrap();
    book.submit(order(2, Side::Sell, 100, 50)).unwrap();

    let trades = book.match_orders().unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].buy_order_id(), OrderId(1));
    assert_eq!(trades[0].sell_order_id(), OrderId(2));
    assert_eq!(trades[0].price(), 100);
    assert_eq!(trades[0].quantity(), 50);

    let buy = book.get_order(OrderId(1)).unwrap();
    assert_eq!(buy.remaining_quantity(), 50);
    assert_eq!(buy.status(), OrderStatus::PartiallyFilled);
    assert!(book.get_order(OrderId(2)).is_none());
}

#[test]
fn price_priority_best_bid_first() {
    let mut book = OrderBook::new("AAPL");
    book.submit(order(1, Side::Buy, 99, 100)).unwrap();
    book.submit(order(2, Side::Buy, 100, 100)).unwrap();
    book.submit(order(3, Side::Buy, 98, 100)).unwrap();
    book.submit(order(4, Side::Sell, 99, 100)).unwrap();

    let trades = book.match_orders().unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].buy_order_id(), OrderId(2));
    assert_eq!(trades[0].price(), 99);
    assert_eq!(trades[0].quantity(), 100);
}

#[test]
fn time_priority_oldest_first() {
    let mut book = OrderBook::new("AAPL");
    book.submit(order(1, Side::Buy, 100, 50)).unwrap();
    book.submit(order(2, Side::Buy, 100, 50)).unwrap();
    book.submit(order(3, Side::Buy, 100, 50)).unwrap();
    book.submit(order(4, Side::Sell, 100, 50)).unwrap();

    let trades = book.match_orders().unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].buy_order_id(), OrderId(1));
}

#[test]
fn cancel_then_requery() {
    let mut book = OrderBook::new("AAPL");
    book.submit(order(1, Side::Buy, 100, 100)).unwrap();
    book.submit(order(2, Side::Buy, 101, 100)).unwrap();

    assert!(book.cancel(OrderId(1)).is_ok());
    assert_eq!(
        book.cancel(OrderId(1)),
        Err(OrderBookError::OrderNotFound(OrderId(1)))
    );
    assert_eq!(
        book.cancel(OrderId(999)),
        Err(OrderBookError::OrderNotFound(OrderId(999)))
    );
    assert_eq!(book.best_bid(), Some(101));
}

#[test]
fn multi_level_depth_queries() {
    let mut book = OrderBook::new("AAPL");
    book.submit(order(1, Side::Buy, 99, 100)).unwrap();
    book.submit(order(2, Side::Buy, 100, 200)).unwrap();
    book.submit(order(3, Side::Sell, 101, 150)).unwrap();
    book.submit(order(4, Side::Sell, 102, 250)).unwrap();

    assert_eq!(book.best_bid(), Some(100));
    assert_eq!(book.best_ask(), Some(101));
    assert_eq!(book.spread(), Some(1));

    let bids: Vec<(u64, u64, usize)> = book
        .bid_levels(10)
        .iter()
        .map(|l| (l.price, l.quantity, l.order_count))
        .collect();
    assert_eq!(bids, vec![(100, 200, 1), (99, 100, 1)]);

    let asks: Vec<(u64, u64, usize)> = book
        .ask_levels(10)
        .iter()
        .map(|l| (l.price, l.quantity, l.order_count))
        .collect();
    assert_eq!(asks, vec![(101, 150, 1), (102, 250, 1)]);
}

#[test]
fn stress_random_orders() {
    let mut rng = StdRng::seed_from_u64(20240215);
    let mut book = OrderBook::new("AAPL");
    let total = 10_000u64;

    for id in 1..=total {
        let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
        let price = rng.gen_range(90..=110u64);
        let quantity = rng.gen_range(1..=1000u64);
        book.submit(order(id, side, price, quantity)).unwrap();
    }
    assert_eq!(book.total_orders(), total);

    let trades = book.match_orders().unwrap();
    assert!(trades.len() as u64 <= total);

    // Index and side counters agree after the dust settles.
    assert_eq!(book.bid_count() + book.ask_count(), book.active_orders());

    // The book is uncrossed or one-sided.
    if let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) {
        assert!(bid < ask);
    }

    // Every reachable level still holds orders.
    for level in book.bid_levels(usize::MAX).iter().chain(book.ask_levels(usize::MAX).iter()) {
        assert!(level.order_count > 0);
        assert!(level.quantity > 0);
    }
}

#[test]
fn empty_book_boundaries() {
    let mut book = OrderBook::new("AAPL");
    assert_eq!(book.best_bid(), None);
    assert_eq!(book.best_ask(), None);
    assert_eq!(book.spread(), None);
    assert!(book.match_orders().unwrap().is_empty());
    assert!(matches!(
        book.cancel(OrderId(1)),
        Err(OrderBookError::OrderNotFound(_))
    ));
    assert!(book.bid_levels(10).is_empty());
}

#[test]
fn root_split_boundary() {
    // Degree 2 trees overflow a root of 3 keys on the 4th distinct price.
    let mut book = OrderBook::with_degree("AAPL", 2);
    for i in 0..4u64 {
        book.submit(order(i + 1, Side::Buy, 100 + i, 10)).unwrap();
    }
    assert_eq!(book.best_bid(), Some(103));
    let prices: Vec<u64> = book.bid_levels(10).iter().map(|l| l.price).collect();
    assert_eq!(prices, vec![103, 102, 101, 100]);
    assert_eq!(book.bid_count() + book.ask_count(), book.active_orders());
}

#[test]
fn deep_book_extrema_and_walks() {
    let mut book = OrderBook::new("AAPL");
    let distinct = 100_000u64;
    for price in 1..=distinct {
        book.submit(order(price, Side::Sell, price, 1)).unwrap();
    }

    assert_eq!(book.best_ask(), Some(1));
    assert_eq!(book.best_bid(), None);

    let walk = book.ask_levels(10);
    assert_eq!(walk.len(), 10);
    let prices: Vec<u64> = walk.iter().map(|l| l.price).collect();
    assert_eq!(prices, (1..=10).collect::<Vec<u64>>());

    let all = book.ask_levels(usize::MAX);
    assert_eq!(all.len(), distinct as usize);
}

#[test]
fn engine_routes_and_isolates_symbols() {
    let mut engine = MatchingEngine::new();
    engine.create_book("AAPL");
    engine.create_book("GOOGL");

    engine
        .submit(Order::new(OrderId(1), Side::Buy, 150, 100, "AAPL"))
        .unwrap();
    engine
        .submit(Order::new(OrderId(2), Side::Sell, 150, 50, "AAPL"))
        .unwrap();
    let aapl_trades = engine.match_symbol("AAPL").unwrap();
    assert_eq!(aapl_trades.len(), 1);

    engine
        .submit(Order::new(OrderId(3), Side::Buy, 2800, 10, "GOOGL"))
        .unwrap();
    engine
        .submit(Order::new(OrderId(4), Side::Sell, 2799, 10, "GOOGL"))
        .unwrap();
    let googl_trades = engine.match_symbol("GOOGL").unwrap();
    assert_eq!(googl_trades.len(), 1);

    let unknown = engine.submit(Order::new(OrderId(5), Side::Buy, 100, 10, "TSLA"));
    assert_eq!(unknown, Err(OrderBookError::UnknownSymbol("TSLA".to_string())));

    let snapshot = engine.snapshot("AAPL", 10).unwrap();
    assert_eq!(snapshot.stats.total_trades, 1);
}
