/*!
 * Core Module
 * Fundamental types, configuration and error handling
 */

pub mod config;
pub mod errors;
pub mod limits;
pub mod shutdown;
pub mod types;

// Re-export for convenience
pub use config::{Cli, Config};
pub use errors::*;
pub use shutdown::{Shutdown, ShutdownListener};
pub use types::*;
