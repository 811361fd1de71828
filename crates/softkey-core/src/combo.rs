//! Release buffer for multi-finger chords.

use std::collections::VecDeque;

use tracing::warn;

pub const COMBO_CAPACITY: usize = 10;

/// Bounded FIFO of release codes held back while several pointers are down.
///
/// Overflow drops the oldest code; drops are counted, never silent.
#[derive(Debug, Clone, Default)]
pub struct ComboAccumulator {
    codes: VecDeque<i32>,
    dropped: usize,
}

impl ComboAccumulator {
    pub fn new() -> Self {
        Self {
            codes: VecDeque::with_capacity(COMBO_CAPACITY),
            dropped: 0,
        }
    }

    /// Appends a code. Returns the evicted oldest code when full.
    pub fn push(&mut self, code: i32) -> Option<i32> {
        let evicted = if self.codes.len() == COMBO_CAPACITY {
            self.dropped += 1;
            let evicted = self.codes.pop_front();
            warn!(?evicted, dropped = self.dropped, "combo buffer full, dropping oldest release");
            evicted
        } else {
            None
        };
        self.codes.push_back(code);
        evicted
    }

    /// Drains the buffer in arrival order.
    pub fn take(&mut self) -> Vec<i32> {
        self.codes.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.codes.clear();
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn codes(&self) -> impl Iterator<Item = i32> + '_ {
        self.codes.iter().copied()
    }

    /// Codes dropped to overflow since creation.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_preserves_arrival_order() {
        let mut combo = ComboAccumulator::new();
        for code in [3, 1, 2] {
            assert_eq!(combo.push(code), None);
        }
        assert_eq!(combo.len(), 3);
        assert_eq!(combo.take(), vec![3, 1, 2]);
        assert!(combo.is_empty());
        assert!(combo.take().is_empty());
    }

    #[test]
    fn overflow_drops_oldest_and_counts() {
        let mut combo = ComboAccumulator::new();
        for code in 0..COMBO_CAPACITY as i32 {
            combo.push(code);
        }
        assert_eq!(combo.push(100), Some(0));
        assert_eq!(combo.push(101), Some(1));
        assert_eq!(combo.len(), COMBO_CAPACITY);
        assert_eq!(combo.dropped(), 2);
        let codes = combo.take();
        assert_eq!(codes.first(), Some(&2));
        assert_eq!(codes.last(), Some(&101));
    }

    #[test]
    fn clear_keeps_drop_count() {
        let mut combo = ComboAccumulator::new();
        for code in 0..=COMBO_CAPACITY as i32 {
            combo.push(code);
        }
        combo.clear();
        assert!(combo.is_empty());
        assert_eq!(combo.codes().count(), 0);
        assert_eq!(combo.dropped(), 1);
    }
}
