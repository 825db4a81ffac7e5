//! Small shared utilities: clocks and logging bootstrap.

mod logger;
#[cfg(test)]
mod tests;
mod time;

pub use logger::setup_logger;
pub use time::{current_time_millis, monotonic_nanos};
