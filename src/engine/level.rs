/*!
 * Level Engine
 * Report and reset passes over the activity store
 */

use crate::activity::{ActivityStore, Visit};
use crate::core::limits::MIN_RATE_WINDOW;
use crate::core::types::{HostId, Level, SlotId};
use crate::emit::{ControlMessage, StatusLine};
use crate::instruments::{map_speed_level, InstrumentCatalog};
use crate::monitoring::{SonifierStats, TickSpan};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Instrument name shown for hosts whose slot has no catalog entry
pub const UNASSIGNED_INSTRUMENT: &str = "unassigned";

/// One host's output for one report tick
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub host: HostId,
    pub slot: SlotId,
    pub target: Level,
    /// Level after smoothing, the one sent
    pub level: Level,
    pub speed: Level,
    pub message: ControlMessage,
    /// This was the host's final emission
    pub evicted: bool,
}

/// Everything one report tick produced
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub emissions: Vec<Emission>,
    pub status: Vec<StatusLine>,
    pub visited: usize,
    /// Records with no measurable window yet
    pub skipped: usize,
    pub evicted: Vec<(HostId, SlotId)>,
}

impl TickReport {
    pub fn emission_for(&self, host: &HostId) -> Option<&Emission> {
        self.emissions.iter().find(|e| &e.host == host)
    }
}

/// Maps per-host rates to smoothed instrument levels
pub struct LevelEngine {
    store: Arc<ActivityStore>,
    catalog: Arc<InstrumentCatalog>,
    stats: Arc<SonifierStats>,
}

impl LevelEngine {
    pub fn new(
        store: Arc<ActivityStore>,
        catalog: Arc<InstrumentCatalog>,
        stats: Arc<SonifierStats>,
    ) -> Self {
        Self {
            store,
            catalog,
            stats,
        }
    }

    pub fn store(&self) -> &Arc<ActivityStore> {
        &self.store
    }

    pub fn catalog(&self) -> &Arc<InstrumentCatalog> {
        &self.catalog
    }

    pub fn stats(&self) -> &Arc<SonifierStats> {
        &self.stats
    }

    #[inline]
    pub fn tick(&self) -> TickReport {
        self.tick_at(Instant::now())
    }

    /// Recompute rates, map, smooth and decide evictions for every host
    ///
    /// Eviction is decided from the target level before smoothing; the
    /// evicted host still gets its emission for this tick. A host holding a
    /// slot past the end of the catalog is evicted without an emission.
    pub fn tick_at(&self, now: Instant) -> TickReport {
        let span = TickSpan::new("report");
        let _guard = span.enter();

        let catalog = &self.catalog;
        let mut emissions = Vec::new();
        let mut status = Vec::new();
        let mut skipped = 0;

        let pass = self.store.for_each(|host, record| {
            let Some(rates) = record.rates(now, MIN_RATE_WINDOW) else {
                trace!(host = %host, "window too short, skipping");
                skipped += 1;
                return Visit::Keep;
            };

            // Unbound slot: release it so the host's next frame rebinds it
            // to the lowest free slot
            let Some(instrument) = catalog.get(record.slot) else {
                trace!(host = %host, slot = record.slot, "no instrument bound to slot, releasing");
                status.push(StatusLine {
                    host: host.clone(),
                    instrument: UNASSIGNED_INSTRUMENT.to_string(),
                    pps: rates.pps,
                    bps: rates.bps,
                    elapsed: rates.elapsed,
                });
                return Visit::Evict;
            };

            let class = instrument.class;
            let target = class.map_level(rates.bps);
            let visit = if target == 0 { Visit::Evict } else { Visit::Keep };
            let speed = map_speed_level(rates.pps);

            class.adjust_level(record, target);
            let level = record.current_level;

            debug!(
                host = %host,
                instrument = %instrument.name,
                packets = record.packet_count,
                pps = rates.pps,
                bps = rates.bps,
                target,
                level,
                speed,
                "host level computed"
            );

            emissions.push(Emission {
                host: host.clone(),
                slot: record.slot,
                target,
                level,
                speed,
                message: class.emit(level, speed, &instrument.name),
                evicted: visit == Visit::Evict,
            });
            status.push(StatusLine {
                host: host.clone(),
                instrument: instrument.name.clone(),
                pps: rates.pps,
                bps: rates.bps,
                elapsed: rates.elapsed,
            });
            visit
        });

        span.record_hosts(pass.visited);
        span.record_evicted(pass.evicted.len());
        self.stats.inc_report_ticks();
        self.stats.add_hosts_evicted(pass.evicted.len() as u64);

        TickReport {
            emissions,
            status,
            visited: pass.visited,
            skipped,
            evicted: pass.evicted,
        }
    }

    #[inline]
    pub fn reset(&self) -> usize {
        self.reset_at(Instant::now())
    }

    /// Zero all counters and restart every window
    pub fn reset_at(&self, now: Instant) -> usize {
        let span = TickSpan::new("reset");
        let _guard = span.enter();

        let hosts = self.store.reset_all_at(now);
        span.record_hosts(hosts);
        self.stats.inc_reset_ticks();
        hosts
    }
}
