/*!
 * Link-Layer Frames
 * Ethernet II addressing extraction
 */

use crate::core::limits::ETHERNET_HEADER_LEN;
use crate::core::types::{ByteCount, HostId};

/// One observed frame, both endpoints count as active hosts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameEvent {
    pub source: HostId,
    pub destination: HostId,
    /// Bytes after the Ethernet header
    pub byte_len: ByteCount,
}

/// Extract addressing from an Ethernet frame
///
/// Frames too short to carry both hardware addresses yield `None`.
pub fn parse_ethernet(frame: &[u8]) -> Option<FrameEvent> {
    if frame.len() < ETHERNET_HEADER_LEN {
        return None;
    }
    let destination: &[u8; 6] = frame[0..6].try_into().ok()?;
    let source: &[u8; 6] = frame[6..12].try_into().ok()?;

    Some(FrameEvent {
        source: HostId::from_mac(source),
        destination: HostId::from_mac(destination),
        byte_len: (frame.len() - ETHERNET_HEADER_LEN) as ByteCount,
    })
}
