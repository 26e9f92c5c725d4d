//! Event types for the tapmetro event system
//!
//! Tempo events are emitted by the tempo controller after every state change
//! and fanned out to SSE clients through the [`EventBus`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Tempo event types
///
/// Serialized with an internal `type` tag for SSE transmission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TempoEvent {
    /// Learn mode entered; tap timestamps are now being recorded
    LearningStarted {
        timestamp: DateTime<Utc>,
    },

    /// A tap was recorded during learn mode
    TapRecorded {
        /// Taps recorded so far in this session (including this one)
        tap_count: u32,
        timestamp: DateTime<Utc>,
    },

    /// Learn mode left
    LearningStopped {
        /// Taps recorded during the session
        tap_count: u32,
        /// BPM committed to the history, `None` if too few taps were recorded
        measured_bpm: Option<u32>,
        timestamp: DateTime<Utc>,
    },

    /// The sample history changed (commit, manual add, or delete)
    HistoryChanged {
        /// Full ring, oldest first, sentinel zeros included
        bpm_list: Vec<u32>,
        timestamp: DateTime<Utc>,
    },

    /// The current tempo (tail of the history) changed value
    BpmChanged {
        old_bpm: u32,
        new_bpm: u32,
        timestamp: DateTime<Utc>,
    },
}

impl TempoEvent {
    /// Event name used for the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            TempoEvent::LearningStarted { .. } => "LearningStarted",
            TempoEvent::TapRecorded { .. } => "TapRecorded",
            TempoEvent::LearningStopped { .. } => "LearningStopped",
            TempoEvent::HistoryChanged { .. } => "HistoryChanged",
            TempoEvent::BpmChanged { .. } => "BpmChanged",
        }
    }
}

/// Broadcast bus for [`TempoEvent`]s
///
/// Cloning the bus shares the underlying channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<TempoEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// Slow subscribers that fall more than `capacity` events behind lose
    /// the oldest ones.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<TempoEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: TempoEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}
