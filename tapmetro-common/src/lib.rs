//! # Tapmetro Common Library
//!
//! Shared code for the tap-tempo metronome service including:
//! - Error types
//! - Bootstrap configuration loading (TOML + platform defaults)
//! - Tempo event types and the event bus
//! - Time utilities

pub mod config;
pub mod error;
pub mod events;
pub mod time;

pub use error::{Error, Result};
