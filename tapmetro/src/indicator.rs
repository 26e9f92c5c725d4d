//! Indicator loop and the LED driver boundary
//!
//! The loop follows the controller's [`IndicatorSignal`] and tells an
//! [`IndicatorDriver`] what to do. Pin toggling itself belongs to the driver.

use std::time::Duration;

use tapmetro_common::config::PinConfig;
use tokio::sync::watch;
use tracing::{debug, info, trace};

use crate::controller::IndicatorSignal;

/// Hardware side of the tempo and tap LEDs
pub trait IndicatorDriver: Send {
    /// A tempo became set (`true`) or cleared (`false`)
    fn set_active(&mut self, active: bool);

    /// The blink period changed
    fn set_interval_ms(&mut self, interval_ms: u32);

    /// One beat: flash the tempo LED
    fn pulse(&mut self);

    /// A tap was recorded: flash the tap LED
    fn flash_tap(&mut self);
}

/// Driver that reports LED activity through `tracing`
///
/// Used when no GPIO backend is wired in.
#[derive(Debug)]
pub struct TracingIndicator {
    tempo_led: u8,
    tap_led: u8,
    pulse_ms: u64,
    beats: u64,
}

impl TracingIndicator {
    pub fn new(pins: &PinConfig, pulse_ms: u64) -> Self {
        Self {
            tempo_led: pins.tempo_led,
            tap_led: pins.tap_led,
            pulse_ms,
            beats: 0,
        }
    }

    /// Beats pulsed since startup
    pub fn beats(&self) -> u64 {
        self.beats
    }
}

impl IndicatorDriver for TracingIndicator {
    fn set_active(&mut self, active: bool) {
        if active {
            info!("Tempo LED (pin {}) blinking", self.tempo_led);
        } else {
            info!("Tempo LED (pin {}) off, no BPM set", self.tempo_led);
        }
    }

    fn set_interval_ms(&mut self, interval_ms: u32) {
        info!("Tempo LED interval set to {} ms", interval_ms);
    }

    fn pulse(&mut self) {
        self.beats += 1;
        trace!(
            "Tempo LED (pin {}) on for {} ms, beat {}",
            self.tempo_led,
            self.pulse_ms,
            self.beats
        );
    }

    fn flash_tap(&mut self) {
        debug!("Tap LED (pin {}) on for {} ms", self.tap_led, self.pulse_ms);
    }
}

/// Forward the transitions between two signals to the driver
fn apply<D: IndicatorDriver>(
    driver: &mut D,
    previous: Option<&IndicatorSignal>,
    signal: &IndicatorSignal,
) {
    if previous.map(|p| p.is_active()) != Some(signal.is_active()) {
        driver.set_active(signal.is_active());
    }

    if let Some(interval_ms) = signal.interval_ms {
        if previous.and_then(|p| p.interval_ms) != Some(interval_ms) {
            driver.set_interval_ms(interval_ms);
        }
    }

    let previous_taps = previous.filter(|p| p.learning).map(|p| p.taps).unwrap_or(0);
    if signal.learning && signal.taps > previous_taps {
        driver.flash_tap();
    }
}

/// Drive the indicator until the controller goes away
///
/// Each cycle re-reads the signal. With a tempo set and no learning
/// session open, the loop sleeps one blink interval and pulses; any signal
/// change cuts the sleep short and restarts the cycle.
pub async fn run_indicator_loop<D: IndicatorDriver>(
    mut rx: watch::Receiver<IndicatorSignal>,
    mut driver: D,
) {
    let mut applied: Option<IndicatorSignal> = None;

    loop {
        let signal = *rx.borrow_and_update();
        apply(&mut driver, applied.as_ref(), &signal);
        applied = Some(signal);

        match signal.blink_interval() {
            Some(interval_ms) => {
                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_millis(interval_ms as u64)) => {
                        driver.pulse();
                    }
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
            None => {
                if rx.changed().await.is_err() {
                    break;
                }
            }
        }
    }

    debug!("Indicator loop stopped");
}
