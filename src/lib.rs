/*!
 * Traffic Sonifier Library
 * Passive link-layer traffic tracking mapped to instrument control messages
 */

pub mod activity;
pub mod capture;
pub mod control;
pub mod core;
pub mod emit;
pub mod engine;
pub mod instruments;
pub mod monitoring;

// Re-exports
pub use crate::core::{
    CaptureError, Cli, Config, ConfigError, ControlError, EmitError, HostId, Level, Shutdown,
    SlotId, SonifierError, SonifierResult,
};
pub use activity::{ActivityRecord, ActivityStore, IngestOutcome, Visit};
pub use capture::{CaptureWorker, FrameIngestor, FrameSource};
pub use control::ControlListener;
pub use emit::{ControlMessage, ControlSink, StatusBroadcaster, StatusLine, StatusSink, UdpControlSink};
pub use engine::{DelayCell, Emitter, LevelEngine, TickReport, TickScheduler};
pub use instruments::{InstrumentCatalog, InstrumentClass, InstrumentDefinition};
pub use monitoring::{init_tracing, SonifierStats, StatsSnapshot};
