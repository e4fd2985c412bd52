//! Fixed-size comparison window.
//!
//! Each recorded sample is reduced to one bit, "at or below threshold",
//! written round-robin over the oldest slot. The window starts all-false
//! (closed), so nothing reads as open until `slot_count` consecutive
//! under-threshold samples have been seen.

use crate::error::GateError;

/// One window entry: the comparison plus the reading that produced it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slot {
    pub distance_mm: u16,
    pub under: bool,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    slots: Box<[Slot]>,
    cursor: usize,
}

impl Debouncer {
    pub fn new(slot_count: usize) -> Result<Self, GateError> {
        if slot_count == 0 {
            return Err(GateError::Config("slot_count must be >= 1".into()));
        }
        Ok(Self {
            slots: vec![Slot::default(); slot_count].into_boxed_slice(),
            cursor: 0,
        })
    }

    /// Store `distance_mm <= threshold_mm` in the next slot.
    ///
    /// Returns true when this sample completed a full cycle, i.e. every
    /// `slot_count`-th call since construction.
    pub fn record(&mut self, distance_mm: u16, threshold_mm: u16) -> bool {
        self.slots[self.cursor] = Slot {
            distance_mm,
            under: distance_mm <= threshold_mm,
        };
        self.cursor += 1;
        if self.cursor == self.slots.len() {
            self.cursor = 0;
            true
        } else {
            false
        }
    }

    pub fn is_unanimous_open(&self) -> bool {
        self.slots.iter().all(|s| s.under)
    }

    pub fn is_unanimous_closed(&self) -> bool {
        self.slots.iter().all(|s| !s.under)
    }

    /// Always equals the configured `slot_count`.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Index of the slot the next sample will overwrite.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Comparison bits in slot order (not age order).
    pub fn comparisons(&self) -> impl Iterator<Item = bool> + '_ {
        self.slots.iter().map(|s| s.under)
    }

    /// Raw readings in slot order, as shown to debug recipients.
    pub fn distances(&self) -> Vec<u16> {
        self.slots.iter().map(|s| s.distance_mm).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_slots() {
        assert!(Debouncer::new(0).is_err());
    }

    #[test]
    fn starts_closed() {
        let d = Debouncer::new(5).unwrap();
        assert!(d.is_unanimous_closed());
        assert!(!d.is_unanimous_open());
        assert_eq!(d.distances(), vec![0; 5]);
    }

    #[test]
    fn cycle_completes_every_slot_count_samples() {
        let mut d = Debouncer::new(3).unwrap();
        let flags: Vec<bool> = (0..7).map(|_| d.record(500, 200)).collect();
        assert_eq!(flags, vec![false, false, true, false, false, true, false]);
        assert_eq!(d.cursor(), 1);
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut d = Debouncer::new(1).unwrap();
        d.record(200, 200);
        assert!(d.is_unanimous_open());
        d.record(201, 200);
        assert!(d.is_unanimous_closed());
    }

    #[test]
    fn mixed_window_is_neither() {
        let mut d = Debouncer::new(5).unwrap();
        for mm in [100, 100, 300, 100, 100] {
            d.record(mm, 200);
        }
        assert!(!d.is_unanimous_open());
        assert!(!d.is_unanimous_closed());
        assert_eq!(
            d.comparisons().collect::<Vec<_>>(),
            vec![true, true, false, true, true]
        );
    }

    #[test]
    fn oldest_slot_is_overwritten_first() {
        let mut d = Debouncer::new(3).unwrap();
        for mm in [10, 20, 30, 40] {
            d.record(mm, 200);
        }
        assert_eq!(d.distances(), vec![40, 20, 30]);
    }
}
