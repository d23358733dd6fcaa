/*!
 * System Limits and Constants
 *
 * Centralized location for defaults, thresholds, and magic numbers.
 * Organized by domain for maintainability and discoverability.
 */

use std::time::Duration;

// =============================================================================
// SCHEDULING
// =============================================================================

/// Default report period (2s)
pub const DEFAULT_REPORT_DELAY_MS: u64 = 2_000;

/// Reset period is always this multiple of the report period
pub const RESET_DELAY_FACTOR: u64 = 4;

/// Windows shorter than this carry no usable rate yet
/// Guards the pps/bps division against a zero elapsed time
pub const MIN_RATE_WINDOW: Duration = Duration::from_millis(1);

/// Tick duration above which a warning is logged
pub const SLOW_TICK_THRESHOLD: Duration = Duration::from_millis(50);

// =============================================================================
// CAPTURE
// =============================================================================

/// Ethernet header length (dst MAC + src MAC + ethertype)
pub const ETHERNET_HEADER_LEN: usize = 14;

/// Capture buffer size (snapshot length)
pub const CAPTURE_SNAPLEN: usize = 65_536;

/// Receive timeout on the packet socket
/// Bounds how long the capture worker takes to notice a stop request
pub const CAPTURE_POLL_INTERVAL: Duration = Duration::from_millis(200);

// =============================================================================
// NETWORK DEFAULTS
// =============================================================================

/// Synthesis backend (Pure Data) default host
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Synthesis backend default port
pub const DEFAULT_SERVER_PORT: u16 = 9001;

/// Default capture interface
pub const DEFAULT_DEVICE: &str = "wlan0";

/// Inbound control datagrams
pub const DEFAULT_CONTROL_ADDR: &str = "0.0.0.0:9002";

/// Status line feed
pub const DEFAULT_STATUS_ADDR: &str = "0.0.0.0:8000";

/// Largest control datagram we accept
pub const MAX_CONTROL_DATAGRAM: usize = 1_024;

/// Status lines buffered per subscriber before it starts lagging
pub const STATUS_CHANNEL_CAPACITY: usize = 256;

// =============================================================================
// OUTPUT
// =============================================================================

/// OSC address prefix for instrument messages
pub const INSTRUMENT_ADDRESS_PREFIX: &str = "/instrument/";

/// OSC address accepted by the control listener
pub const DELAY_CONTROL_ADDRESS: &str = "/delay";
