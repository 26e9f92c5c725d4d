//! Tempo controller
//!
//! Single owner of the tempo store, shared by the button poll loop, the
//! indicator loop and the HTTP handlers. All access goes through one
//! `std::sync::Mutex`; critical sections are synchronous and short, and
//! never span an `.await`.
//!
//! After each mutation, while still holding the lock, the controller
//! recomputes the [`IndicatorSignal`] and publishes it on a watch channel,
//! then emits the matching [`TempoEvent`]s. Readers therefore never see a
//! signal that disagrees with the history it was derived from.

use std::sync::{Arc, Mutex, MutexGuard};

use tapmetro_common::events::{EventBus, TempoEvent};
use tapmetro_common::time;
use tokio::sync::watch;
use tracing::error;

use crate::error::{Error, Result};
use crate::tempo::{Extremum, SampleOutcome, TempoStore, HISTORY_DEPTH};

/// Derived view consumed by the indicator loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndicatorSignal {
    /// Current tempo, 0 when none
    pub bpm: u32,
    /// Blink period, `None` when there is no tempo
    pub interval_ms: Option<u32>,
    /// A learning session is open
    pub learning: bool,
    /// Taps recorded in the open session
    pub taps: u32,
}

impl IndicatorSignal {
    fn from_store(store: &TempoStore) -> Self {
        Self {
            bpm: store.current_bpm(),
            interval_ms: store.blink_interval_ms(),
            learning: store.is_learning(),
            taps: store.tap_count(),
        }
    }

    /// A tempo is set
    pub fn is_active(&self) -> bool {
        self.interval_ms.is_some()
    }

    /// Period to blink at right now; blinking pauses while learning
    pub fn blink_interval(&self) -> Option<u32> {
        if self.learning {
            None
        } else {
            self.interval_ms
        }
    }
}

struct Inner {
    store: Mutex<TempoStore>,
    signal_tx: watch::Sender<IndicatorSignal>,
    events: EventBus,
}

/// Shared handle to the tempo state
///
/// Cloning is cheap and every clone refers to the same store.
#[derive(Clone)]
pub struct TempoController {
    inner: Arc<Inner>,
}

impl TempoController {
    /// Controller over an empty history
    pub fn new(events: EventBus) -> Self {
        Self::with_store(TempoStore::new(), events)
    }

    pub fn with_store(store: TempoStore, events: EventBus) -> Self {
        let (signal_tx, _) = watch::channel(IndicatorSignal::from_store(&store));
        Self {
            inner: Arc::new(Inner {
                store: Mutex::new(store),
                signal_tx,
                events,
            }),
        }
    }

    /// Receiver for indicator updates; starts at the current signal
    pub fn subscribe_indicator(&self) -> watch::Receiver<IndicatorSignal> {
        self.inner.signal_tx.subscribe()
    }

    /// Latest published indicator signal
    pub fn signal(&self) -> IndicatorSignal {
        *self.inner.signal_tx.borrow()
    }

    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    fn lock(&self) -> Result<MutexGuard<'_, TempoStore>> {
        self.inner.store.lock().map_err(|_| {
            error!("Tempo store lock poisoned");
            Error::Internal("tempo store lock poisoned".to_string())
        })
    }

    fn read<T>(&self, f: impl FnOnce(&TempoStore) -> T) -> Result<T> {
        let store = self.lock()?;
        Ok(f(&store))
    }

    /// Run one mutation and publish what changed
    fn mutate<T>(&self, f: impl FnOnce(&mut TempoStore) -> Result<T>) -> Result<T> {
        let mut store = self.lock()?;
        let before_samples = store.list_samples();
        let before_bpm = store.current_bpm();

        let value = f(&mut store)?;

        let signal = IndicatorSignal::from_store(&store);
        self.inner.signal_tx.send_if_modified(|current| {
            if *current == signal {
                false
            } else {
                *current = signal;
                true
            }
        });

        let after_samples = store.list_samples();
        if after_samples != before_samples {
            self.inner.events.emit_lossy(TempoEvent::HistoryChanged {
                bpm_list: after_samples.to_vec(),
                timestamp: time::now(),
            });
        }
        if signal.bpm != before_bpm {
            self.inner.events.emit_lossy(TempoEvent::BpmChanged {
                old_bpm: before_bpm,
                new_bpm: signal.bpm,
                timestamp: time::now(),
            });
        }

        Ok(value)
    }

    // ------------------------------------------------------------------
    // Learn mode (poll loop)
    // ------------------------------------------------------------------

    pub fn start_learning(&self) -> Result<()> {
        self.mutate(|store| {
            store.start_learning()?;
            self.inner.events.emit_lossy(TempoEvent::LearningStarted {
                timestamp: time::now(),
            });
            Ok(())
        })
    }

    pub fn stop_learning(&self) -> Result<SampleOutcome> {
        self.mutate(|store| {
            let outcome = store.stop_learning()?;
            self.inner.events.emit_lossy(TempoEvent::LearningStopped {
                tap_count: outcome.taps(),
                measured_bpm: outcome.committed_bpm(),
                timestamp: time::now(),
            });
            Ok(outcome)
        })
    }

    /// Record a tap at `now_ms`; returns `false` when not learning
    pub fn record_tap(&self, now_ms: u64) -> Result<bool> {
        self.mutate(|store| {
            let recorded = store.record_tap(now_ms);
            if recorded {
                self.inner.events.emit_lossy(TempoEvent::TapRecorded {
                    tap_count: store.tap_count(),
                    timestamp: time::now(),
                });
            }
            Ok(recorded)
        })
    }

    pub fn is_learning(&self) -> Result<bool> {
        self.read(|store| store.is_learning())
    }

    // ------------------------------------------------------------------
    // History (API handlers)
    // ------------------------------------------------------------------

    pub fn add_bpm(&self, bpm: u32) -> Result<()> {
        self.mutate(|store| {
            store.add_bpm(bpm);
            Ok(())
        })
    }

    pub fn current_bpm(&self) -> Result<u32> {
        self.read(|store| store.current_bpm())
    }

    pub fn list_samples(&self) -> Result<[u32; HISTORY_DEPTH]> {
        self.read(|store| store.list_samples())
    }

    pub fn extremum(&self, kind: Extremum) -> Result<u32> {
        self.read(|store| store.extremum(kind))
    }

    pub fn delete_extremum(&self, kind: Extremum) -> Result<usize> {
        self.mutate(|store| Ok(store.delete_extremum(kind)))
    }

    pub fn delete_by_value(&self, value: u32) -> Result<()> {
        self.mutate(|store| store.delete_by_value(value))
    }
}
