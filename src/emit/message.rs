/*!
 * Output Messages
 * Control messages for the synthesis backend and human-readable status lines
 */

use crate::core::limits::INSTRUMENT_ADDRESS_PREFIX;
use crate::core::types::{HostId, Level};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Control message addressed by instrument name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlMessage {
    pub address: String,
    pub args: Vec<Level>,
}

impl ControlMessage {
    /// `/instrument/<name>` carrying `args` as int32 values
    pub fn instrument(name: &str, args: &[Level]) -> Self {
        Self {
            address: format!("{}{}", INSTRUMENT_ADDRESS_PREFIX, name),
            args: args.to_vec(),
        }
    }

    /// Instrument name if this is an instrument message
    pub fn instrument_name(&self) -> Option<&str> {
        self.address.strip_prefix(INSTRUMENT_ADDRESS_PREFIX)
    }
}

/// Per-host status published on every report tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusLine {
    pub host: HostId,
    pub instrument: String,
    pub pps: f64,
    pub bps: f64,
    pub elapsed: Duration,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MAC: {}, instrument: {}, pps: {}, bps: {}, elapsed: {:?}",
            self.host, self.instrument, self.pps, self.bps, self.elapsed
        )
    }
}
