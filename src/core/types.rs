/*!
 * Core Types
 * Common types used across the sonifier
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete output level (0 = silent / evict)
pub type Level = u32;

/// Index into the instrument catalog
pub type SlotId = usize;

/// Byte count attributed to a host
pub type ByteCount = u64;

/// Common result type for sonifier operations
pub type SonifierResult<T> = Result<T, super::errors::SonifierError>;

/// Opaque identifier of a traffic participant
///
/// Derived from a link-layer address, compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostId(String);

impl HostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Format a 6-byte hardware address as `aa:bb:cc:dd:ee:ff`
    pub fn from_mac(mac: &[u8; 6]) -> Self {
        Self(format!(
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
        ))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HostId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for HostId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
