/*!
 * Capture Traits
 * Seam between frame sources and the ingestion worker
 */

use crate::core::errors::CaptureError;

/// Result of one receive attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePoll {
    /// A frame of this many bytes was written into the buffer
    Frame(usize),
    /// Nothing arrived within the poll interval
    Idle,
    /// The source is exhausted
    Closed,
}

/// Blocking source of raw link-layer frames
///
/// `poll_frame` must return within a bounded time so the worker can
/// observe stop requests.
pub trait FrameSource: Send {
    fn poll_frame(&mut self, buf: &mut [u8]) -> Result<FramePoll, CaptureError>;

    /// Human-readable description for logs
    fn describe(&self) -> String;
}
