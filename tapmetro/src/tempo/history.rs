//! Fixed-depth BPM sample ring
//!
//! Always holds exactly [`HISTORY_DEPTH`] slots, oldest first. A slot value
//! of 0 is the sentinel for "no sample"; it is never a measured tempo.

/// Number of BPM samples kept
pub const HISTORY_DEPTH: usize = 4;

/// Which end of the sample range to select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Min,
    Max,
}

/// Ordered ring of BPM samples, oldest-evicted-first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleHistory {
    slots: [u32; HISTORY_DEPTH],
}

impl SampleHistory {
    /// Empty history (all sentinels)
    pub fn new() -> Self {
        Self::default()
    }

    /// History with the given slot contents, oldest first
    pub fn from_slots(slots: [u32; HISTORY_DEPTH]) -> Self {
        Self { slots }
    }

    /// Append a sample at the tail, evicting the oldest (index 0)
    pub fn push(&mut self, bpm: u32) {
        self.slots.rotate_left(1);
        self.slots[HISTORY_DEPTH - 1] = bpm;
    }

    /// Tail slot; 0 when it holds the sentinel
    pub fn latest(&self) -> u32 {
        self.slots[HISTORY_DEPTH - 1]
    }

    /// Copy of all slots in index order
    pub fn slots(&self) -> [u32; HISTORY_DEPTH] {
        self.slots
    }

    /// Smallest or largest slot value
    ///
    /// Sentinel zeros take part in the scan, so `Min` over a partially
    /// filled history is 0.
    pub fn extremum(&self, kind: Extremum) -> u32 {
        let pick: fn(u32, u32) -> u32 = match kind {
            Extremum::Min => u32::min,
            Extremum::Max => u32::max,
        };
        self.slots.iter().copied().fold(self.slots[0], pick)
    }

    /// Zero every slot equal to `value`, returning how many were cleared
    pub fn clear_all_equal(&mut self, value: u32) -> usize {
        let mut cleared = 0;
        for slot in self.slots.iter_mut().filter(|slot| **slot == value) {
            *slot = 0;
            cleared += 1;
        }
        cleared
    }

    /// Zero the first slot equal to `value`
    pub fn clear_first(&mut self, value: u32) -> bool {
        match self.slots.iter_mut().find(|slot| **slot == value) {
            Some(slot) => {
                *slot = 0;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_history_is_all_sentinels() {
        let history = SampleHistory::new();
        assert_eq!(history.slots(), [0, 0, 0, 0]);
        assert_eq!(history.latest(), 0);
    }

    #[test]
    fn test_push_appends_at_tail() {
        let mut history = SampleHistory::new();
        history.push(120);
        assert_eq!(history.slots(), [0, 0, 0, 120]);
        history.push(90);
        assert_eq!(history.slots(), [0, 0, 120, 90]);
        assert_eq!(history.latest(), 90);
    }

    #[test]
    fn test_push_when_full_evicts_oldest() {
        let mut history = SampleHistory::from_slots([1, 2, 3, 4]);
        history.push(5);
        assert_eq!(history.slots(), [2, 3, 4, 5]);
    }

    #[test]
    fn test_extremum_counts_sentinels() {
        let history = SampleHistory::from_slots([120, 0, 140, 100]);
        assert_eq!(history.extremum(Extremum::Min), 0);
        assert_eq!(history.extremum(Extremum::Max), 140);
    }

    #[test]
    fn test_clear_all_equal_clears_duplicates() {
        let mut history = SampleHistory::from_slots([100, 120, 100, 90]);
        assert_eq!(history.clear_all_equal(100), 2);
        assert_eq!(history.slots(), [0, 120, 0, 90]);
    }

    #[test]
    fn test_clear_first_only_clears_one() {
        let mut history = SampleHistory::from_slots([100, 120, 100, 90]);
        assert!(history.clear_first(100));
        assert_eq!(history.slots(), [0, 120, 100, 90]);
        assert!(!history.clear_first(77));
        assert_eq!(history.slots(), [0, 120, 100, 90]);
    }
}
