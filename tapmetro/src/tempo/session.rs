//! Learn-mode timing session
//!
//! `Idle -> start() -> Learning -> stop() -> Idle`. While learning, every tap
//! records its timestamp; stopping turns the tapped span into a BPM.
//!
//! The tap count includes the first tap, so a 4-tap session spans three
//! intervals but is averaged as four beats over the tapped duration.

use crate::error::{Error, Result};

/// Fewest taps that produce a BPM measurement
pub const MIN_TAPS: u32 = 4;

/// Result of closing a learning session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    /// Fewer than [`MIN_TAPS`] taps; no sample is produced
    InsufficientSamples { taps: u32 },
    /// Enough taps but a non-positive elapsed time (clock step or duplicate
    /// timestamps); produces a 0 sample
    TimingAnomaly { taps: u32 },
    /// A measured tempo
    Measured { bpm: u32, taps: u32 },
}

impl SampleOutcome {
    /// BPM to commit to the history, if any
    pub fn committed_bpm(&self) -> Option<u32> {
        match self {
            SampleOutcome::InsufficientSamples { .. } => None,
            SampleOutcome::TimingAnomaly { .. } => Some(0),
            SampleOutcome::Measured { bpm, .. } => Some(*bpm),
        }
    }

    pub fn taps(&self) -> u32 {
        match self {
            SampleOutcome::InsufficientSamples { taps }
            | SampleOutcome::TimingAnomaly { taps }
            | SampleOutcome::Measured { taps, .. } => *taps,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TapWindow {
    first_tap_ms: Option<u64>,
    last_tap_ms: u64,
    tap_count: u32,
}

/// Learn-mode state machine; `None` window means idle
#[derive(Debug, Clone, Default)]
pub struct TimingSession {
    window: Option<TapWindow>,
}

impl TimingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_learning(&self) -> bool {
        self.window.is_some()
    }

    /// Taps recorded in the open session (0 when idle)
    pub fn tap_count(&self) -> u32 {
        self.window.map(|w| w.tap_count).unwrap_or(0)
    }

    /// Enter learn mode with a fresh tap window
    pub fn start(&mut self) -> Result<()> {
        if self.window.is_some() {
            return Err(Error::AlreadyLearning);
        }
        self.window = Some(TapWindow::default());
        Ok(())
    }

    /// Record a tap at `now_ms`
    ///
    /// Returns `false` without doing anything when idle; callers only tap
    /// while learning.
    pub fn record_tap(&mut self, now_ms: u64) -> bool {
        let Some(window) = self.window.as_mut() else {
            return false;
        };
        window.first_tap_ms.get_or_insert(now_ms);
        window.last_tap_ms = now_ms;
        window.tap_count += 1;
        true
    }

    /// Leave learn mode and compute the session outcome
    pub fn stop(&mut self) -> Result<SampleOutcome> {
        let window = self.window.take().ok_or(Error::NotLearning)?;
        let taps = window.tap_count;

        if taps < MIN_TAPS {
            return Ok(SampleOutcome::InsufficientSamples { taps });
        }

        let first = window.first_tap_ms.unwrap_or(window.last_tap_ms);
        let elapsed_seconds = window.last_tap_ms.saturating_sub(first) as f64 / 1000.0;
        if elapsed_seconds <= 0.0 {
            return Ok(SampleOutcome::TimingAnomaly { taps });
        }

        let bpm = (taps as f64 * 60.0 / elapsed_seconds).round() as u32;
        Ok(SampleOutcome::Measured { bpm, taps })
    }
}
