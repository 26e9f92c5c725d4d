//! Tempo core
//!
//! The learn-mode timing session, the fixed-depth sample history and the
//! store that combines them. No I/O happens in here.

pub mod history;
pub mod session;
pub mod store;

pub use history::{Extremum, SampleHistory, HISTORY_DEPTH};
pub use session::{SampleOutcome, TimingSession, MIN_TAPS};
pub use store::TempoStore;

/// Indicator toggle period for a tempo, `None` when there is no tempo
///
/// Floored at 1 ms so absurd tempos cannot spin the indicator loop.
pub fn blink_interval_ms(bpm: u32) -> Option<u32> {
    if bpm == 0 {
        None
    } else {
        Some((60_000 / bpm).max(1))
    }
}
