/*!
 * Engine Module
 * Level computation, tick dispatch and the report/reset scheduler
 */

pub mod delay;
pub mod emitter;
pub mod level;
pub mod task;

// Re-export public API
pub use delay::DelayCell;
pub use emitter::{DispatchSummary, Emitter};
pub use level::{Emission, LevelEngine, TickReport, UNASSIGNED_INSTRUMENT};
pub use task::TickScheduler;
