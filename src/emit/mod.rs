/*!
 * Emit Module
 * Control messages to the synthesis backend and the status feed
 */

pub mod message;
pub mod osc;
pub mod status;
pub mod traits;
pub mod udp;

// Re-export public API
pub use message::{ControlMessage, StatusLine};
pub use osc::{OscArg, OscPacket};
pub use status::{bind_status_feed, serve_status_feed, StatusBroadcaster};
pub use traits::{ControlSink, DiscardStatus, StatusSink};
pub use udp::UdpControlSink;
