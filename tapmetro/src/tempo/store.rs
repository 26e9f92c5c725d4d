//! Tempo store: sample history plus the in-progress timing session

use tracing::{debug, info, warn};

use super::history::{Extremum, SampleHistory, HISTORY_DEPTH};
use super::session::{SampleOutcome, TimingSession};
use super::blink_interval_ms;
use crate::error::{Error, Result};

/// Owns the BPM history and the learn-mode session
///
/// Every failing operation leaves the store unchanged.
#[derive(Debug, Clone, Default)]
pub struct TempoStore {
    history: SampleHistory,
    session: TimingSession,
}

impl TempoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an existing history
    pub fn with_history(history: SampleHistory) -> Self {
        Self {
            history,
            session: TimingSession::new(),
        }
    }

    // ------------------------------------------------------------------
    // Learn mode
    // ------------------------------------------------------------------

    pub fn start_learning(&mut self) -> Result<()> {
        self.session.start()?;
        info!("Begin timing");
        Ok(())
    }

    /// Close the session and commit its sample, if it produced one
    pub fn stop_learning(&mut self) -> Result<SampleOutcome> {
        let outcome = self.session.stop()?;
        match outcome {
            SampleOutcome::InsufficientSamples { taps } => {
                warn!("At least four taps needed for a new BPM measurement (got {})", taps);
            }
            SampleOutcome::TimingAnomaly { taps } => {
                warn!(
                    "Non-positive elapsed time across {} taps, recording BPM 0",
                    taps
                );
            }
            SampleOutcome::Measured { bpm, taps } => {
                info!("New BPM calculated: {} ({} taps)", bpm, taps);
            }
        }
        if let Some(bpm) = outcome.committed_bpm() {
            self.commit_sample(bpm);
        }
        Ok(outcome)
    }

    /// Record a tap; ignored unless learning
    pub fn record_tap(&mut self, now_ms: u64) -> bool {
        let recorded = self.session.record_tap(now_ms);
        if recorded {
            debug!("Tap {} at {} ms", self.session.tap_count(), now_ms);
        }
        recorded
    }

    pub fn is_learning(&self) -> bool {
        self.session.is_learning()
    }

    pub fn tap_count(&self) -> u32 {
        self.session.tap_count()
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Append a sample, evicting the oldest
    pub fn commit_sample(&mut self, bpm: u32) {
        self.history.push(bpm);
    }

    /// Manual BPM entry; same semantics as a session commit
    pub fn add_bpm(&mut self, bpm: u32) {
        self.commit_sample(bpm);
    }

    /// Most recent sample, 0 when the tail is the sentinel
    pub fn current_bpm(&self) -> u32 {
        self.history.latest()
    }

    /// All slots, oldest first, sentinel zeros included
    pub fn list_samples(&self) -> [u32; HISTORY_DEPTH] {
        self.history.slots()
    }

    pub fn extremum(&self, kind: Extremum) -> u32 {
        self.history.extremum(kind)
    }

    /// Zero every slot equal to the current extremum
    ///
    /// Always succeeds; returns the number of slots cleared.
    pub fn delete_extremum(&mut self, kind: Extremum) -> usize {
        let value = self.history.extremum(kind);
        let cleared = self.history.clear_all_equal(value);
        debug!("Deleted {:?} BPM {} from {} slot(s)", kind, value, cleared);
        cleared
    }

    /// Zero the first slot holding `value`
    ///
    /// Deleting 0 ("no sample") is a successful no-op.
    pub fn delete_by_value(&mut self, value: u32) -> Result<()> {
        if value == 0 {
            return Ok(());
        }
        if self.history.clear_first(value) {
            info!("BPM value {} deleted", value);
            Ok(())
        } else {
            warn!("BPM value {} not found", value);
            Err(Error::ValueNotFound(value))
        }
    }

    /// Indicator period derived from the current tempo
    pub fn blink_interval_ms(&self) -> Option<u32> {
        blink_interval_ms(self.current_bpm())
    }
}
