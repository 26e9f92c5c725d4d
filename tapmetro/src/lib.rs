//! # Tapmetro Library
//!
//! Tap-tempo metronome service.
//!
//! **Purpose:** A learn button opens a timing session, a tap button records
//! beat instants, the measured BPM drives a blinking tempo LED, and a small
//! HTTP API exposes and edits the last four BPM samples.
//!
//! **Architecture:** one [`TempoController`] shared by three independent
//! tokio tasks: the button poll loop, the indicator loop and the axum
//! handlers.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod indicator;
pub mod input;
pub mod tempo;

pub use controller::{IndicatorSignal, TempoController};
pub use error::{Error, Result};
