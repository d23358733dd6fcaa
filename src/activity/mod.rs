/*!
 * Activity Module
 * Per-host traffic statistics and instrument slot allocation
 */

pub mod pool;
pub mod record;
pub mod store;

// Re-export public API
pub use pool::SlotPool;
pub use record::{ActivityRecord, Rates};
pub use store::{ActivityStore, IngestOutcome, PassSummary, Visit};
