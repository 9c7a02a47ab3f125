//! # Error Types
//!
//! Custom error types for Teleop Drive using `thiserror`.

use thiserror::Error;

/// Main error type for Teleop Drive
#[derive(Debug, Error)]
pub enum TeleopError {
    /// No input device exists at the configured path
    #[error("Controller not found at {0}. Check the USB connection and device path")]
    DeviceNotFound(String),

    /// The input device exists but cannot be opened by this user
    #[error("Permission denied opening {0}. Run as root or add the user to the input group")]
    PermissionDenied(String),

    /// Input device errors after the device was opened
    #[error("Controller error: {0}")]
    Device(String),

    /// No tacho motor is attached to the requested output port
    #[error("No tacho motor found on port {0}")]
    MotorNotFound(String),

    /// Motor command errors
    #[error("Actuator error: {0}")]
    Actuator(String),

    /// Sound playback errors
    #[error("Audio error: {0}")]
    Audio(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Teleop Drive
pub type Result<T> = std::result::Result<T, TeleopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_errors_name_the_path() {
        let err = TeleopError::DeviceNotFound("/dev/input/event2".to_string());
        assert!(err.to_string().contains("not found"));
        assert!(err.to_string().contains("/dev/input/event2"));

        let err = TeleopError::PermissionDenied("/dev/input/event2".to_string());
        assert!(err.to_string().contains("Permission denied"));
        assert!(err.to_string().contains("/dev/input/event2"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: TeleopError = io.into();
        assert!(matches!(err, TeleopError::Io(_)));
    }
}
