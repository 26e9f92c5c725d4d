//! Software buttons
//!
//! Presses queue up in the order they were made. A read of a button
//! consumes the press at the head of the queue only when it belongs to that
//! button, so `t l` is never seen as `l t` and repeated presses each count.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::ButtonPanel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Press {
    Learn,
    Tap,
}

/// Learn and tap buttons driven from software (keyboard, tests)
#[derive(Debug, Clone, Default)]
pub struct VirtualButtons {
    presses: Arc<Mutex<VecDeque<Press>>>,
}

impl VirtualButtons {
    pub fn press_learn(&self) {
        self.queue().push_back(Press::Learn);
    }

    pub fn press_tap(&self) {
        self.queue().push_back(Press::Tap);
    }

    /// Number of presses not read yet
    pub fn pending(&self) -> usize {
        self.queue().len()
    }

    // The queue holds plain values, so a panicked holder cannot leave it torn
    fn queue(&self) -> MutexGuard<'_, VecDeque<Press>> {
        self.presses.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take(&self, button: Press) -> bool {
        let mut queue = self.queue();
        if queue.front() == Some(&button) {
            queue.pop_front();
            true
        } else {
            false
        }
    }
}

impl ButtonPanel for VirtualButtons {
    fn learn_pressed(&mut self) -> bool {
        self.take(Press::Learn)
    }

    fn tap_pressed(&mut self) -> bool {
        self.take(Press::Tap)
    }
}
