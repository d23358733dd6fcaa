/*!
 * Capture Worker
 * Dedicated thread pulling frames from a source into the activity store
 */

use super::frame::parse_ethernet;
use super::traits::{FramePoll, FrameSource};
use crate::activity::{ActivityStore, IngestOutcome};
use crate::core::errors::CaptureError;
use crate::core::limits::CAPTURE_SNAPLEN;
use crate::core::types::HostId;
use crate::monitoring::SonifierStats;
use ahash::RandomState;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{info, trace, warn};

/// Turns raw frames into store updates
#[derive(Clone)]
pub struct FrameIngestor {
    store: Arc<ActivityStore>,
    stats: Arc<SonifierStats>,
    ignored: Arc<HashSet<HostId, RandomState>>,
}

impl FrameIngestor {
    pub fn new(store: Arc<ActivityStore>, stats: Arc<SonifierStats>) -> Self {
        Self {
            store,
            stats,
            ignored: Arc::new(HashSet::with_hasher(RandomState::new())),
        }
    }

    /// Hosts whose frames are dropped before ingestion
    pub fn with_ignored(mut self, hosts: impl IntoIterator<Item = HostId>) -> Self {
        let mut ignored = HashSet::with_hasher(RandomState::new());
        ignored.extend(hosts);
        self.ignored = Arc::new(ignored);
        self
    }

    /// Ingest one frame; returns false if it was skipped
    ///
    /// Source and destination are counted independently.
    pub fn ingest_frame(&self, frame: &[u8]) -> bool {
        self.stats.inc_frames_seen();

        let Some(event) = parse_ethernet(frame) else {
            self.stats.inc_frames_skipped();
            return false;
        };
        if self.ignored.contains(&event.source) || self.ignored.contains(&event.destination) {
            self.stats.inc_frames_skipped();
            return false;
        }

        trace!(
            src = %event.source,
            dst = %event.destination,
            bytes = event.byte_len,
            "frame observed"
        );
        for host in [&event.source, &event.destination] {
            if let IngestOutcome::Created { .. } = self.store.ingest(host, event.byte_len) {
                self.stats.inc_hosts_created();
            }
        }
        true
    }
}

/// Handle to the capture thread
pub struct CaptureWorker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<Result<(), CaptureError>>>,
}

impl CaptureWorker {
    /// Start pulling frames from `source` on a new thread
    pub fn spawn<S>(source: S, ingestor: FrameIngestor) -> std::io::Result<Self>
    where
        S: FrameSource + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();

        let handle = std::thread::Builder::new()
            .name("capture".into())
            .spawn(move || run_capture(source, ingestor, thread_stop))?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Whether the thread has exited on its own (source closed or failed)
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Stop accepting frames and wait for the thread
    pub fn stop(mut self) -> Result<(), CaptureError> {
        self.stop.store(true, Ordering::Release);
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .unwrap_or_else(|_| Err(CaptureError::ReadFailed("capture thread panicked".into()))),
            None => Ok(()),
        }
    }
}

impl Drop for CaptureWorker {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
    }
}

fn run_capture<S: FrameSource>(
    mut source: S,
    ingestor: FrameIngestor,
    stop: Arc<AtomicBool>,
) -> Result<(), CaptureError> {
    info!(source = %source.describe(), "capture started");
    let mut buf = vec![0u8; CAPTURE_SNAPLEN];

    while !stop.load(Ordering::Acquire) {
        match source.poll_frame(&mut buf) {
            Ok(FramePoll::Frame(len)) => {
                ingestor.ingest_frame(&buf[..len.min(buf.len())]);
            }
            Ok(FramePoll::Idle) => {}
            Ok(FramePoll::Closed) => {
                info!("capture source closed");
                return Ok(());
            }
            Err(e) => {
                warn!(error = %e, "capture stopped");
                return Err(e);
            }
        }
    }

    info!("capture stopped");
    Ok(())
}
