/*!
 * Tick Dispatch
 * Sends a tick's emissions and status lines after the store lock is released
 */

use super::level::TickReport;
use crate::emit::{ControlSink, StatusSink};
use crate::monitoring::SonifierStats;
use std::sync::Arc;
use tracing::warn;

/// Delivery counts for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub sent: usize,
    pub failed: usize,
}

/// Output side of the report loop
#[derive(Clone)]
pub struct Emitter {
    control: Arc<dyn ControlSink>,
    status: Arc<dyn StatusSink>,
    stats: Arc<SonifierStats>,
}

impl Emitter {
    pub fn new(
        control: Arc<dyn ControlSink>,
        status: Arc<dyn StatusSink>,
        stats: Arc<SonifierStats>,
    ) -> Self {
        Self {
            control,
            status,
            stats,
        }
    }

    /// Send every emission, then publish the status lines
    ///
    /// A failed send is logged and counted; the remaining messages still go out.
    pub fn dispatch(&self, report: &TickReport) -> DispatchSummary {
        let mut summary = DispatchSummary::default();

        for emission in &report.emissions {
            match self.control.send(&emission.message) {
                Ok(()) => {
                    summary.sent += 1;
                    self.stats.inc_emissions();
                }
                Err(e) => {
                    summary.failed += 1;
                    self.stats.inc_emit_failures();
                    warn!(
                        host = %emission.host,
                        address = %emission.message.address,
                        error = %e,
                        "control message not delivered"
                    );
                }
            }
        }

        for line in &report.status {
            self.status.publish(line);
        }

        summary
    }
}
