/*!
 * Tick Scheduler - Report and Reset Loops
 *
 * Two independent background tasks: the report loop recomputes levels and
 * emits, the reset loop restarts the measurement windows. Each loop reads
 * its period fresh from the shared delay cell before every sleep.
 */

use super::delay::DelayCell;
use super::emitter::Emitter;
use super::level::LevelEngine;
use crate::core::shutdown::{Shutdown, ShutdownListener};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Handle to the running report/reset loops
pub struct TickScheduler {
    delays: Arc<DelayCell>,
    shutdown: Shutdown,
    handles: Vec<JoinHandle<()>>,
}

impl TickScheduler {
    /// Spawn both loops on the current runtime
    pub fn spawn(engine: Arc<LevelEngine>, emitter: Emitter, delays: Arc<DelayCell>) -> Self {
        let shutdown = Shutdown::new();

        let report = tokio::spawn(run_report_loop(
            engine.clone(),
            emitter,
            delays.clone(),
            shutdown.listener(),
        ));
        let reset = tokio::spawn(run_reset_loop(engine, delays.clone(), shutdown.listener()));

        info!(
            report_ms = delays.report_millis(),
            reset_ms = delays.reset().as_millis() as u64,
            "tick scheduler spawned"
        );

        Self {
            delays,
            shutdown,
            handles: vec![report, reset],
        }
    }

    pub fn delays(&self) -> &Arc<DelayCell> {
        &self.delays
    }

    /// Stop both loops, letting an in-flight tick finish
    pub async fn shutdown(mut self) {
        self.shutdown.trigger();

        for handle in self.handles.drain(..) {
            if let Err(e) = handle.await {
                warn!("Tick loop shutdown error: {}", e);
            }
        }
        info!("Tick scheduler shutdown complete");
    }
}

/// Report loop: sleep, tick, dispatch
async fn run_report_loop(
    engine: Arc<LevelEngine>,
    emitter: Emitter,
    delays: Arc<DelayCell>,
    mut stop: ShutdownListener,
) {
    info!("Report loop started");
    loop {
        let delay = delays.report();
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = stop.wait() => break,
        }

        let report = engine.tick();
        let summary = emitter.dispatch(&report);
        debug!(
            hosts = report.visited,
            sent = summary.sent,
            failed = summary.failed,
            evicted = report.evicted.len(),
            "report tick"
        );
    }
    info!("Report loop stopped");
}

/// Reset loop: sleep, restart windows
async fn run_reset_loop(
    engine: Arc<LevelEngine>,
    delays: Arc<DelayCell>,
    mut stop: ShutdownListener,
) {
    info!("Reset loop started");
    loop {
        let delay = delays.reset();
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = stop.wait() => break,
        }

        let hosts = engine.reset();
        debug!(hosts, "reset tick");
    }
    info!("Reset loop stopped");
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        if !self.handles.is_empty() {
            self.shutdown.trigger();
        }
    }
}
