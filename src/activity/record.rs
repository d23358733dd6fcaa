/*!
 * Activity Record
 * Per-host rolling counters, instrument binding and smoothing state
 */

use crate::core::types::{ByteCount, Level, SlotId};
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// Rolling statistics for one tracked host
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    /// Frames attributed to this host since the last reset
    pub packet_count: u64,
    /// Payload bytes since the last reset
    pub byte_total: ByteCount,
    /// Start of the current measurement window
    pub window_start: Instant,
    /// Instrument binding, held until eviction
    pub slot: SlotId,
    /// Last emitted level, used as smoothing state
    pub current_level: Level,
}

impl ActivityRecord {
    /// First observation of a host
    pub fn new(slot: SlotId, bytes: ByteCount, now: Instant) -> Self {
        Self {
            packet_count: 1,
            byte_total: bytes,
            window_start: now,
            slot,
            current_level: 0,
        }
    }

    #[inline]
    pub fn observe(&mut self, bytes: ByteCount) {
        self.packet_count += 1;
        self.byte_total += bytes;
    }

    /// Zero the counters and restart the window; slot and level are kept
    #[inline]
    pub fn reset(&mut self, now: Instant) {
        self.packet_count = 0;
        self.byte_total = 0;
        self.window_start = now;
    }

    /// Compute rates over the current window
    ///
    /// Returns `None` while the window is shorter than `min_window`,
    /// which also rules out a division by zero.
    pub fn rates(&self, now: Instant, min_window: Duration) -> Option<Rates> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < min_window || elapsed.is_zero() {
            return None;
        }
        let secs = elapsed.as_secs_f64();
        Some(Rates {
            pps: self.packet_count as f64 / secs,
            bps: self.byte_total as f64 / secs,
            elapsed,
        })
    }
}

/// Rate metrics for one record on one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rates {
    /// Packets per second
    pub pps: f64,
    /// Bytes per second
    pub bps: f64,
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates_over_window() {
        let start = Instant::now();
        let mut record = ActivityRecord::new(0, 40, start);
        for _ in 0..4 {
            record.observe(40);
        }

        let rates = record
            .rates(start + Duration::from_secs(2), Duration::from_millis(1))
            .unwrap();
        assert_eq!(rates.pps, 2.5);
        assert_eq!(rates.bps, 100.0);
    }

    #[test]
    fn test_rates_guard_empty_window() {
        let start = Instant::now();
        let record = ActivityRecord::new(0, 40, start);
        assert!(record.rates(start, Duration::from_millis(1)).is_none());
        assert!(record
            .rates(start + Duration::from_micros(300), Duration::from_millis(1))
            .is_none());
    }

    #[test]
    fn test_reset_keeps_binding() {
        let start = Instant::now();
        let mut record = ActivityRecord::new(3, 100, start);
        record.current_level = 6;

        let later = start + Duration::from_secs(1);
        record.reset(later);

        assert_eq!(record.packet_count, 0);
        assert_eq!(record.byte_total, 0);
        assert_eq!(record.window_start, later);
        assert_eq!(record.slot, 3);
        assert_eq!(record.current_level, 6);
    }
}
