/*!
 * Capture Module
 * Frame sources and the ingestion path into the activity store
 */

pub mod frame;
#[cfg(target_os = "linux")]
pub mod packet_socket;
pub mod traits;
pub mod worker;

// Re-export public API
pub use frame::{parse_ethernet, FrameEvent};
#[cfg(target_os = "linux")]
pub use packet_socket::PacketSocketSource;
pub use traits::{FramePoll, FrameSource};
pub use worker::{CaptureWorker, FrameIngestor};
