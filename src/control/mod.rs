/*!
 * Control Module
 * Inbound delay updates for the tick scheduler
 */

pub mod listener;

pub use listener::{parse_delay_command, ControlListener};
