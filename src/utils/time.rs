//! The two clocks the book runs on.
//!
//! Order and trade stamps come from [`monotonic_nanos`]: ordering is all the
//! book needs from them, and a monotonic source guarantees they never run
//! backwards. Snapshot documents instead carry [`current_time_millis`],
//! because a snapshot timestamp has to mean something to consumers outside
//! this process.

use std::sync::OnceLock;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Wall-clock milliseconds since the UNIX epoch, for snapshot documents.
///
/// This clock can jump under NTP adjustments; nothing in the book orders by
/// it. A system clock set before 1970 reads as zero rather than failing the
/// snapshot that asked for it.
pub fn current_time_millis() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(since_epoch) => since_epoch.as_millis() as u64,
        Err(_) => 0,
    }
}

/// Returns monotonic nanoseconds since an arbitrary process-local epoch.
///
/// Backed by `Instant`, so it never goes backwards; only relative ordering
/// is meaningful. Order and trade timestamps use this clock, and the book
/// additionally bumps submission stamps so they are strictly increasing per
/// book.
pub fn monotonic_nanos() -> u64 {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    let epoch = EPOCH.get_or_init(Instant::now);
    epoch.elapsed().as_nanos() as u64
}
