//! Synthetic market simulation: a stream of random limit orders with
//! interleaved cancels and matching sweeps, then a depth report.
//!
//! Run with: cargo run --release --example market_simulation

use matchbook_rs::{setup_logger, Order, OrderBook, OrderId, Side, Trade};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use tracing::info;

// Simulation parameters
const SYMBOL: &str = "AAPL";
const ORDER_COUNT: u64 = 10_000;
const MIN_PRICE: u64 = 90;
const MAX_PRICE: u64 = 110;
const MIN_QUANTITY: u64 = 1;
const MAX_QUANTITY: u64 = 1_000;
const CANCEL_PROBABILITY: f64 = 0.05;
const MATCH_EVERY: u64 = 100;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logger();
    info!("Matchbook market simulation");
    info!("Symbol: {SYMBOL}");
    info!("Orders: {ORDER_COUNT}, prices {MIN_PRICE}..={MAX_PRICE}, quantities {MIN_QUANTITY}..={MAX_QUANTITY}");

    let mut rng = StdRng::seed_from_u64(0xB00C);
    let mut book = OrderBook::new(SYMBOL);
    let mut trades: Vec<Trade> = Vec::new();
    let mut cancels = 0u64;

    let started = Instant::now();
    for id in 1..=ORDER_COUNT {
        let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
        let price = rng.gen_range(MIN_PRICE..=MAX_PRICE);
        let quantity = rng.gen_range(MIN_QUANTITY..=MAX_QUANTITY);
        book.submit(Order::new(OrderId(id), side, price, quantity, SYMBOL))?;

        if rng.gen_bool(CANCEL_PROBABILITY) {
            // Aim at any id seen so far; most are still resting early on.
            let victim = OrderId(rng.gen_range(1..=id));
            if book.cancel(victim).is_ok() {
                cancels += 1;
            }
        }

        if id % MATCH_EVERY == 0 {
            trades.extend(book.match_orders()?);
        }
    }
    trades.extend(book.match_orders()?);
    let elapsed = started.elapsed();

    info!(
        "Processed {} orders in {:.2?} ({:.2} us/order)",
        ORDER_COUNT,
        elapsed,
        elapsed.as_micros() as f64 / ORDER_COUNT as f64
    );
    info!("Trades: {}, cancels: {}", trades.len(), cancels);
    let traded_volume: u64 = trades.iter().map(|t| t.quantity()).sum();
    info!("Traded volume: {traded_volume}");
    info!(
        "Resting: {} bids / {} asks, best bid {:?}, best ask {:?}, spread {:?}",
        book.bid_count(),
        book.ask_count(),
        book.best_bid(),
        book.best_ask(),
        book.spread()
    );

    println!("{}", serde_json::to_string_pretty(&book.snapshot(10))?);
    Ok(())
}
