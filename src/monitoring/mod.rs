/*!
 * Monitoring
 * Structured tracing setup and lock-free counters
 */

mod stats;
mod tracer;

pub use stats::{SonifierStats, StatsSnapshot};
pub use tracer::{generate_trace_id, init_tracing, TickSpan};
