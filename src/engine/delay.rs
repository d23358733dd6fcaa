/*!
 * Delay Cell
 * Atomically replaceable report period; the reset period is derived from it
 */

use crate::core::errors::ControlError;
use crate::core::limits::{DEFAULT_REPORT_DELAY_MS, RESET_DELAY_FACTOR};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Shared tick configuration
///
/// Loops read it fresh before each sleep, so an update lands on the
/// next iteration and never interrupts a sleep in progress. A single
/// atomic keeps report and reset periods consistent with each other.
#[derive(Debug)]
pub struct DelayCell {
    report_ms: AtomicU64,
}

impl DelayCell {
    pub fn new(report_ms: u64) -> Result<Self, ControlError> {
        if report_ms == 0 {
            return Err(ControlError::InvalidDelay(0));
        }
        Ok(Self {
            report_ms: AtomicU64::new(report_ms),
        })
    }

    fn validate(ms: i64) -> Result<u64, ControlError> {
        if ms <= 0 {
            return Err(ControlError::InvalidDelay(ms));
        }
        Ok(ms as u64)
    }

    /// Replace the report period; reset becomes 4x
    ///
    /// Returns the previous report period in milliseconds.
    pub fn set_report_millis(&self, ms: i64) -> Result<u64, ControlError> {
        let ms = Self::validate(ms)?;
        Ok(self.report_ms.swap(ms, Ordering::AcqRel))
    }

    #[inline]
    pub fn report_millis(&self) -> u64 {
        self.report_ms.load(Ordering::Acquire)
    }

    #[inline]
    pub fn report(&self) -> Duration {
        Duration::from_millis(self.report_millis())
    }

    #[inline]
    pub fn reset(&self) -> Duration {
        Duration::from_millis(self.report_millis().saturating_mul(RESET_DELAY_FACTOR))
    }
}

impl Default for DelayCell {
    fn default() -> Self {
        Self {
            report_ms: AtomicU64::new(DEFAULT_REPORT_DELAY_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cell = DelayCell::default();
        assert_eq!(cell.report(), Duration::from_secs(2));
        assert_eq!(cell.reset(), Duration::from_secs(8));
    }

    #[test]
    fn test_update_derives_reset() {
        let cell = DelayCell::new(1_000).unwrap();
        assert_eq!(cell.set_report_millis(500).unwrap(), 1_000);
        assert_eq!(cell.report(), Duration::from_millis(500));
        assert_eq!(cell.reset(), Duration::from_millis(2_000));
    }

    #[test]
    fn test_rejects_non_positive() {
        let cell = DelayCell::default();
        assert_eq!(cell.set_report_millis(0), Err(ControlError::InvalidDelay(0)));
        assert_eq!(cell.set_report_millis(-5), Err(ControlError::InvalidDelay(-5)));
        assert_eq!(cell.report_millis(), DEFAULT_REPORT_DELAY_MS);
        assert!(DelayCell::new(0).is_err());
    }
}
