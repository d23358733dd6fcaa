/*!
 * Emitter Traits
 * Seams between the level engine and its output transports
 */

use super::message::{ControlMessage, StatusLine};
use crate::core::errors::EmitError;

/// Outbound control transport (synthesis backend)
///
/// Delivery is not guaranteed; errors are reported to the caller,
/// which logs them and moves on.
pub trait ControlSink: Send + Sync {
    fn send(&self, message: &ControlMessage) -> Result<(), EmitError>;
}

/// Best-effort status broadcast
pub trait StatusSink: Send + Sync {
    fn publish(&self, line: &StatusLine);
}

/// Status sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardStatus;

impl StatusSink for DiscardStatus {
    fn publish(&self, _line: &StatusLine) {}
}
