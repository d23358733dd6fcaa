/*!
 * Activity Store
 * Host -> activity record map plus the instrument slot pool behind one lock
 */

use super::pool::SlotPool;
use super::record::ActivityRecord;
use crate::core::types::{ByteCount, HostId, SlotId};
use ahash::RandomState;
use parking_lot::Mutex;
use std::collections::HashMap;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Decision returned by a `for_each` visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Keep,
    /// Remove the record and return its slot to the pool
    Evict,
}

/// Result of ingesting one observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Updated,
    Created { slot: SlotId },
}

/// Outcome of a `for_each` pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub visited: usize,
    pub evicted: Vec<(HostId, SlotId)>,
}

struct StoreInner {
    records: HashMap<HostId, ActivityRecord, RandomState>,
    pool: SlotPool,
}

/// Shared activity store
///
/// # Design
/// - Single coarse lock over map and pool: ingest is O(1), passes are O(hosts)
/// - Callers only see atomic operations (`ingest`, `for_each`, `reset_all`),
///   the lock is never exposed
pub struct ActivityStore {
    inner: Mutex<StoreInner>,
}

impl ActivityStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                records: HashMap::with_hasher(RandomState::new()),
                pool: SlotPool::new(),
            }),
        }
    }

    /// Count one frame of `bytes` payload for `host`
    #[inline]
    pub fn ingest(&self, host: &HostId, bytes: ByteCount) -> IngestOutcome {
        self.ingest_at(host, bytes, Instant::now())
    }

    /// Ingest with an explicit timestamp for the window of a new record
    pub fn ingest_at(&self, host: &HostId, bytes: ByteCount, now: Instant) -> IngestOutcome {
        let mut guard = self.inner.lock();
        let StoreInner { records, pool } = &mut *guard;

        if let Some(record) = records.get_mut(host) {
            record.observe(bytes);
            trace!(host = %host, bytes, packets = record.packet_count, "activity updated");
            return IngestOutcome::Updated;
        }

        let slot = pool.acquire();
        debug_assert!(
            records.values().all(|r| r.slot != slot),
            "slot {} already held",
            slot
        );
        records.insert(host.clone(), ActivityRecord::new(slot, bytes, now));
        debug!(host = %host, slot, "host tracked");
        IngestOutcome::Created { slot }
    }

    /// Visit every record under the lock
    ///
    /// The visitor may evict a record; its slot goes back to the pool.
    /// Visiting order is unspecified.
    pub fn for_each<F>(&self, mut visit: F) -> PassSummary
    where
        F: FnMut(&HostId, &mut ActivityRecord) -> Visit,
    {
        let mut guard = self.inner.lock();
        let StoreInner { records, pool } = &mut *guard;

        let mut summary = PassSummary::default();
        records.retain(|host, record| {
            summary.visited += 1;
            match visit(host, record) {
                Visit::Keep => true,
                Visit::Evict => {
                    summary.evicted.push((host.clone(), record.slot));
                    false
                }
            }
        });

        for (host, slot) in &summary.evicted {
            pool.release(*slot);
            debug!(host = %host, slot, "host evicted");
        }

        summary
    }

    /// Zero every record's counters and restart its window
    #[inline]
    pub fn reset_all(&self) -> usize {
        self.reset_all_at(Instant::now())
    }

    pub fn reset_all_at(&self, now: Instant) -> usize {
        let mut guard = self.inner.lock();
        for record in guard.records.values_mut() {
            record.reset(now);
        }
        guard.records.len()
    }

    /// Copy of one host's record
    pub fn get(&self, host: &HostId) -> Option<ActivityRecord> {
        self.inner.lock().records.get(host).cloned()
    }

    /// Copy of every live record, sorted by slot
    pub fn snapshot(&self) -> Vec<(HostId, ActivityRecord)> {
        let guard = self.inner.lock();
        let mut all: Vec<_> = guard
            .records
            .iter()
            .map(|(h, r)| (h.clone(), r.clone()))
            .collect();
        all.sort_by_key(|(_, r)| r.slot);
        all
    }

    /// Free slots in ascending order
    pub fn free_slots(&self) -> Vec<SlotId> {
        self.inner.lock().pool.free_slots()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().records.is_empty()
    }
}

impl Default for ActivityStore {
    fn default() -> Self {
        Self::new()
    }
}
