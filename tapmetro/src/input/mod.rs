//! Button polling
//!
//! The learn and tap buttons are read level-triggered on a fixed cadence.
//! A detected press is handled synchronously against the controller and
//! followed by a debounce pause before the buttons are read again.

pub mod keyboard;
pub mod virtual_buttons;

pub use virtual_buttons::VirtualButtons;

use std::time::Duration;

use tapmetro_common::config::InputConfig;
use tapmetro_common::time;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::controller::TempoController;
use crate::tempo::SampleOutcome;

/// The two panel buttons
pub trait ButtonPanel: Send {
    /// Learn (mode) button currently reads as pressed
    fn learn_pressed(&mut self) -> bool;

    /// Tap button currently reads as pressed
    fn tap_pressed(&mut self) -> bool;
}

/// Millisecond timestamps for taps
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// Wall-clock epoch milliseconds
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        time::now_millis()
    }
}

/// Scheduled task reading the buttons and feeding the controller
pub struct PollLoop<B, C> {
    controller: TempoController,
    buttons: B,
    clock: C,
    poll_interval: Duration,
    debounce: Duration,
}

impl<B: ButtonPanel, C: Clock> PollLoop<B, C> {
    pub fn new(controller: TempoController, buttons: B, clock: C, config: &InputConfig) -> Self {
        Self {
            controller,
            buttons,
            clock,
            poll_interval: Duration::from_millis(config.poll_interval_ms.max(1)),
            debounce: Duration::from_millis(config.debounce_ms),
        }
    }

    /// Poll forever
    pub async fn run(mut self) {
        info!(
            "Button poll loop started ({} ms cadence, {} ms debounce)",
            self.poll_interval.as_millis(),
            self.debounce.as_millis()
        );

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.poll_once().await;
        }
    }

    /// Read both buttons once and act on any press
    pub async fn poll_once(&mut self) {
        if self.buttons.learn_pressed() {
            info!("Mode button pressed");
            self.toggle_learning();
            tokio::time::sleep(self.debounce).await;
        }

        if !self.buttons.tap_pressed() {
            return;
        }

        // Taps only count inside a learning session; others are dropped
        if matches!(self.controller.is_learning(), Ok(true)) {
            let now_ms = self.clock.now_millis();
            match self.controller.record_tap(now_ms) {
                Ok(_) => info!("Tap button pressed"),
                Err(e) => error!("Failed to record tap: {}", e),
            }
            tokio::time::sleep(self.debounce).await;
        } else {
            debug!("Tap ignored outside learn mode");
        }
    }

    fn toggle_learning(&self) {
        match self.controller.is_learning() {
            Ok(false) => match self.controller.start_learning() {
                Ok(()) => info!("Now in learn mode"),
                Err(e) => error!("Failed to enter learn mode: {}", e),
            },
            Ok(true) => match self.controller.stop_learning() {
                Ok(SampleOutcome::Measured { bpm, .. }) => {
                    info!("Now in play mode at {} BPM", bpm)
                }
                Ok(outcome) => info!("Now in play mode ({:?})", outcome),
                Err(e) => error!("Failed to leave learn mode: {}", e),
            },
            Err(e) => error!("Failed to read learn state: {}", e),
        }
    }
}
