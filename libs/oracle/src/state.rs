//! Observation cursor for a pool

use serde::{Deserialize, Serialize};

/// Where a pool's buffer was last written and how far it may wrap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObservationState {
    /// The most recently written slot
    pub index: u16,

    /// Number of live slots eligible for wraparound
    pub cardinality: u16,

    /// Target number of live slots, reached one slot per write
    pub cardinality_next: u16,
}

impl ObservationState {
    pub fn is_initialized(&self) -> bool {
        self.cardinality > 0
    }

    /// Slot the next write lands in if capacity does not change
    pub fn next_index(&self) -> u16 {
        if self.cardinality == 0 {
            return 0;
        }
        ((u32::from(self.index) + 1) % u32::from(self.cardinality)) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_uninitialized() {
        let state = ObservationState::default();
        assert!(!state.is_initialized());
        assert_eq!(state.next_index(), 0);
    }

    #[test]
    fn test_next_index_wraps() {
        let state = ObservationState {
            index: 2,
            cardinality: 3,
            cardinality_next: 3,
        };
        assert_eq!(state.next_index(), 0);
    }
}
