//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Wall-clock milliseconds since the Unix epoch
///
/// Tap timestamps are taken from this clock. A clock stepped backwards
/// between two taps shows up as a non-positive elapsed time at session end.
pub fn now_millis() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}
