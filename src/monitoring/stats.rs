/*!
 * Lock-Free Sonifier Statistics
 * Atomic counters updated from the capture path and both scheduler loops
 */

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic statistics for lock-free updates
///
/// # Performance
/// - Cache-line aligned to prevent false sharing with the store lock
/// - All operations use relaxed ordering; snapshots are approximate
#[repr(C, align(64))]
#[derive(Debug, Default)]
pub struct SonifierStats {
    frames_seen: AtomicU64,
    frames_skipped: AtomicU64,
    hosts_created: AtomicU64,
    hosts_evicted: AtomicU64,
    report_ticks: AtomicU64,
    reset_ticks: AtomicU64,
    emissions: AtomicU64,
    emit_failures: AtomicU64,
    control_updates: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub frames_seen: u64,
    pub frames_skipped: u64,
    pub hosts_created: u64,
    pub hosts_evicted: u64,
    pub report_ticks: u64,
    pub reset_ticks: u64,
    pub emissions: u64,
    pub emit_failures: u64,
    pub control_updates: u64,
}

impl SonifierStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Performance
    /// Hot path - called on every captured frame
    #[inline(always)]
    pub fn inc_frames_seen(&self) {
        self.frames_seen.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_frames_skipped(&self) {
        self.frames_skipped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_hosts_created(&self) {
        self.hosts_created.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_hosts_evicted(&self, n: u64) {
        self.hosts_evicted.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_report_ticks(&self) {
        self.report_ticks.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_reset_ticks(&self) {
        self.reset_ticks.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_emissions(&self) {
        self.emissions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_emit_failures(&self) {
        self.emit_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_control_updates(&self) {
        self.control_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn report_ticks(&self) -> u64 {
        self.report_ticks.load(Ordering::Relaxed)
    }

    pub fn reset_ticks(&self) -> u64 {
        self.reset_ticks.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            frames_seen: self.frames_seen.load(Ordering::Relaxed),
            frames_skipped: self.frames_skipped.load(Ordering::Relaxed),
            hosts_created: self.hosts_created.load(Ordering::Relaxed),
            hosts_evicted: self.hosts_evicted.load(Ordering::Relaxed),
            report_ticks: self.report_ticks.load(Ordering::Relaxed),
            reset_ticks: self.reset_ticks.load(Ordering::Relaxed),
            emissions: self.emissions.load(Ordering::Relaxed),
            emit_failures: self.emit_failures.load(Ordering::Relaxed),
            control_updates: self.control_updates.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let stats = SonifierStats::new();
        stats.inc_frames_seen();
        stats.inc_frames_seen();
        stats.add_hosts_evicted(3);
        stats.inc_emit_failures();

        let snap = stats.snapshot();
        assert_eq!(snap.frames_seen, 2);
        assert_eq!(snap.hosts_evicted, 3);
        assert_eq!(snap.emit_failures, 1);
        assert_eq!(snap.report_ticks, 0);
    }
}
