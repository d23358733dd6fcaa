/*!
 * Capture Tests
 * Worker thread driven by an in-memory frame source
 */

use pretty_assertions::assert_eq;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use traffic_sonifier::capture::FramePoll;
use traffic_sonifier::{
    ActivityStore, CaptureError, CaptureWorker, FrameIngestor, FrameSource, HostId,
    SonifierStats,
};

const A: [u8; 6] = [0x02, 0, 0, 0, 0, 0x0a];
const B: [u8; 6] = [0x02, 0, 0, 0, 0, 0x0b];
const C: [u8; 6] = [0x02, 0, 0, 0, 0, 0x0c];

enum Step {
    Frame(Vec<u8>),
    Idle,
    Fail,
}

/// Replays scripted frames, then reports closed
struct ScriptedSource {
    steps: VecDeque<Step>,
}

impl ScriptedSource {
    fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }
}

impl FrameSource for ScriptedSource {
    fn poll_frame(&mut self, buf: &mut [u8]) -> Result<FramePoll, CaptureError> {
        match self.steps.pop_front() {
            Some(Step::Frame(frame)) => {
                buf[..frame.len()].copy_from_slice(&frame);
                Ok(FramePoll::Frame(frame.len()))
            }
            Some(Step::Idle) => Ok(FramePoll::Idle),
            Some(Step::Fail) => Err(CaptureError::ReadFailed("link down".into())),
            None => Ok(FramePoll::Closed),
        }
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

fn frame(dst: [u8; 6], src: [u8; 6], payload: usize) -> Step {
    let mut bytes = Vec::with_capacity(14 + payload);
    bytes.extend_from_slice(&dst);
    bytes.extend_from_slice(&src);
    bytes.extend_from_slice(&[0x08, 0x00]);
    bytes.resize(14 + payload, 0xee);
    Step::Frame(bytes)
}

fn mac(addr: [u8; 6]) -> HostId {
    HostId::from_mac(&addr)
}

fn run_to_completion(worker: CaptureWorker) -> Result<(), CaptureError> {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !worker.is_finished() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    worker.stop()
}

#[test]
fn test_both_endpoints_are_counted() {
    let store = Arc::new(ActivityStore::new());
    let stats = Arc::new(SonifierStats::new());
    let ingestor = FrameIngestor::new(store.clone(), stats.clone());

    let source = ScriptedSource::new([
        frame(B, A, 100),
        Step::Idle,
        frame(A, B, 40),
        frame(C, A, 0),
    ]);
    let worker = CaptureWorker::spawn(source, ingestor).unwrap();
    run_to_completion(worker).unwrap();

    let a = store.get(&mac(A)).unwrap();
    assert_eq!(a.packet_count, 3);
    assert_eq!(a.byte_total, 140);
    assert_eq!(a.slot, 0);

    let b = store.get(&mac(B)).unwrap();
    assert_eq!(b.packet_count, 2);
    assert_eq!(b.byte_total, 140);
    assert_eq!(b.slot, 1);

    assert_eq!(store.get(&mac(C)).unwrap().byte_total, 0);

    let snap = stats.snapshot();
    assert_eq!(snap.frames_seen, 3);
    assert_eq!(snap.frames_skipped, 0);
    assert_eq!(snap.hosts_created, 3);
}

#[test]
fn test_runt_frames_are_skipped() {
    let store = Arc::new(ActivityStore::new());
    let stats = Arc::new(SonifierStats::new());
    let ingestor = FrameIngestor::new(store.clone(), stats.clone());

    let source = ScriptedSource::new([Step::Frame(vec![0xff; 10]), frame(B, A, 8)]);
    let worker = CaptureWorker::spawn(source, ingestor).unwrap();
    run_to_completion(worker).unwrap();

    assert_eq!(store.len(), 2);
    let snap = stats.snapshot();
    assert_eq!(snap.frames_seen, 2);
    assert_eq!(snap.frames_skipped, 1);
}

#[test]
fn test_ignored_host_frames_are_dropped() {
    let store = Arc::new(ActivityStore::new());
    let stats = Arc::new(SonifierStats::new());
    let ingestor = FrameIngestor::new(store.clone(), stats.clone()).with_ignored([mac(A)]);

    let source = ScriptedSource::new([frame(B, A, 50), frame(A, C, 50), frame(C, B, 50)]);
    let worker = CaptureWorker::spawn(source, ingestor).unwrap();
    run_to_completion(worker).unwrap();

    assert!(store.get(&mac(A)).is_none());
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(&mac(B)).unwrap().packet_count, 1);
    assert_eq!(stats.snapshot().frames_skipped, 2);
}

#[test]
fn test_source_error_ends_worker() {
    let store = Arc::new(ActivityStore::new());
    let stats = Arc::new(SonifierStats::new());
    let ingestor = FrameIngestor::new(store.clone(), stats);

    let source = ScriptedSource::new([frame(B, A, 1), Step::Fail, frame(C, A, 1)]);
    let worker = CaptureWorker::spawn(source, ingestor).unwrap();
    let result = run_to_completion(worker);

    assert_eq!(result, Err(CaptureError::ReadFailed("link down".into())));
    // Nothing after the failure is ingested
    assert!(store.get(&mac(C)).is_none());
}

#[test]
fn test_ingestor_parses_frame_directly() {
    let store = Arc::new(ActivityStore::new());
    let stats = Arc::new(SonifierStats::new());
    let ingestor = FrameIngestor::new(store.clone(), stats);

    let Step::Frame(bytes) = frame(B, A, 1_486) else {
        unreachable!()
    };
    assert!(ingestor.ingest_frame(&bytes));
    assert_eq!(store.get(&mac(A)).unwrap().byte_total, 1_486);
    assert!(!ingestor.ingest_frame(&bytes[..13]));
}
