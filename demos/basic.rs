//! Minimal driver: one engine, one book, a crossed pair of orders, a match
//! run and a JSON snapshot of what is left.
//!
//! Run with: cargo run --example basic

use matchbook_rs::{setup_logger, MatchingEngine, Order, OrderId, Side};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logger();
    info!("Matchbook order matching engine");

    let mut engine = MatchingEngine::new();
    engine.create_book("AAPL");

    engine.submit(Order::new(OrderId(1), Side::Buy, 1_000_000, 100, "AAPL"))?;
    engine.submit(Order::new(OrderId(2), Side::Buy, 999_500, 250, "AAPL"))?;
    engine.submit(Order::new(OrderId(3), Side::Sell, 1_000_500, 150, "AAPL"))?;
    info!(
        "Submitted 3 orders, best bid {:?}, best ask {:?}",
        engine.best_bid("AAPL"),
        engine.best_ask("AAPL")
    );

    // An aggressive sell crosses the top bid.
    engine.submit(Order::new(OrderId(4), Side::Sell, 1_000_000, 60, "AAPL"))?;
    let trades = engine.match_symbol("AAPL")?;
    for trade in &trades {
        info!("{trade}");
    }

    let snapshot = engine
        .snapshot("AAPL", 10)
        .expect("book was just created");
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
