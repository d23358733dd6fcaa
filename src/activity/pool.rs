/*!
 * Instrument Slot Pool
 * Lowest-first recycling of instrument slot indices
 */

use crate::core::types::SlotId;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Free-slot pool
///
/// # Design
/// - Min-heap of released slots: reuse is deterministic and lowest-first
/// - Fresh slots are handed out in order once the pool is empty
/// - O(log n) acquire/release instead of re-sorting on every release
#[derive(Debug, Default, Clone)]
pub struct SlotPool {
    free: BinaryHeap<Reverse<SlotId>>,
    issued: SlotId,
}

impl SlotPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the smallest free slot, or the next never-issued one
    ///
    /// With every issued slot either free or held by exactly one record,
    /// the fresh slot equals the number of live records.
    pub fn acquire(&mut self) -> SlotId {
        if let Some(Reverse(slot)) = self.free.pop() {
            slot
        } else {
            let slot = self.issued;
            self.issued += 1;
            slot
        }
    }

    /// Return a slot for reuse
    pub fn release(&mut self, slot: SlotId) {
        debug_assert!(slot < self.issued, "released slot {} was never issued", slot);
        debug_assert!(
            !self.free.iter().any(|Reverse(s)| *s == slot),
            "slot {} released twice",
            slot
        );
        self.free.push(Reverse(slot));
    }

    /// Free slots in ascending order
    pub fn free_slots(&self) -> Vec<SlotId> {
        let mut slots: Vec<SlotId> = self.free.iter().map(|Reverse(s)| *s).collect();
        slots.sort_unstable();
        slots
    }

    #[inline]
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Number of distinct slots ever handed out
    #[inline]
    pub fn issued(&self) -> SlotId {
        self.issued
    }
}
