/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Capture source errors
///
/// Opening or configuring the capture source is fatal at startup;
/// read errors after that stop the capture worker.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum CaptureError {
    #[error("Capture device '{0}' not found")]
    #[diagnostic(
        code(capture::device_not_found),
        help("Check the interface name with `ip link` and pass it with --device.")
    )]
    DeviceNotFound(String),

    #[error("Failed to open capture socket: {0}")]
    #[diagnostic(
        code(capture::open_failed),
        help("Raw packet capture requires root or CAP_NET_RAW.")
    )]
    OpenFailed(String),

    #[error("Failed to configure capture socket: {0}")]
    #[diagnostic(code(capture::configure_failed))]
    ConfigureFailed(String),

    #[error("Capture read failed: {0}")]
    #[diagnostic(code(capture::read_failed))]
    ReadFailed(String),
}

/// Outbound emission errors
///
/// Never abort a scheduler loop; they are logged and counted.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum EmitError {
    #[error("Failed to resolve backend address {0}")]
    #[diagnostic(
        code(emit::address_unresolved),
        help("Check --server-host and --server-port.")
    )]
    AddressUnresolved(String),

    #[error("Transport error: {0}")]
    #[diagnostic(code(emit::transport))]
    Transport(String),

    #[error("Message encoding failed: {0}")]
    #[diagnostic(code(emit::encoding))]
    Encoding(String),
}

/// Inbound control message errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ControlError {
    #[error("Malformed control message: {0}")]
    #[diagnostic(
        code(control::malformed),
        help("Send an OSC message `/delay ,i <ms>` or a plain decimal number of milliseconds.")
    )]
    Malformed(String),

    #[error("Unsupported control address: {0}")]
    #[diagnostic(code(control::unsupported_address))]
    UnsupportedAddress(String),

    #[error("Delay must be a positive number of milliseconds, got {0}")]
    #[diagnostic(
        code(control::invalid_delay),
        help("A zero delay would make rate windows empty.")
    )]
    InvalidDelay(i64),
}

/// Configuration errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(config::invalid_value))]
    InvalidValue { field: String, reason: String },

    #[error("Failed to read instrument table {path}: {reason}")]
    #[diagnostic(
        code(config::instrument_table),
        help("Expected a JSON array of {{\"name\": ..., \"class\": \"percussive|melodic|chord\"}}.")
    )]
    InstrumentTable { path: String, reason: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Unified sonifier error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum SonifierError {
    #[error("Capture error: {0}")]
    #[diagnostic(transparent)]
    Capture(#[from] CaptureError),

    #[error("Emit error: {0}")]
    #[diagnostic(transparent)]
    Emit(#[from] EmitError),

    #[error("Control error: {0}")]
    #[diagnostic(transparent)]
    Control(#[from] ControlError),

    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    #[diagnostic(
        code(sonifier::io_error),
        help("Socket bind or I/O operation failed. Check addresses and permissions.")
    )]
    Io(String),
}

impl From<std::io::Error> for SonifierError {
    fn from(err: std::io::Error) -> Self {
        SonifierError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_error_serialization() {
        let error = ControlError::InvalidDelay(0);
        let json = serde_json::to_string(&error).unwrap();
        let deserialized: ControlError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, deserialized);
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::invalid("device", "must not be empty");
        assert_eq!(
            error.to_string(),
            "Invalid value for device: must not be empty"
        );
    }

    #[test]
    fn test_sonifier_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "busy");
        let error: SonifierError = io.into();
        assert!(matches!(error, SonifierError::Io(_)));
    }

    #[test]
    fn test_sonifier_error_from_capture() {
        let error: SonifierError = CaptureError::DeviceNotFound("eth9".into()).into();
        assert_eq!(
            error.to_string(),
            "Capture error: Capture device 'eth9' not found"
        );
    }
}
