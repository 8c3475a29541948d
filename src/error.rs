//! # Error Types
//!
//! Custom error types for solarlog using `thiserror`.

use thiserror::Error;

/// Main error type for solarlog
#[derive(Debug, Error)]
pub enum SolarLogError {
    /// Remote sensor node could not be reached at startup
    #[error("telemetry service not found: {0}")]
    ServiceNotFound(String),

    /// Wireless link failed after it was established
    #[error("link connection error: {0}")]
    Connection(String),

    /// Received telemetry text could not be parsed into a frame
    #[error("malformed telemetry frame: {0}")]
    MalformedFrame(String),

    /// Magnetometer register read was interrupted
    #[error("orientation read interrupted: {0}")]
    OrientationInterrupted(String),

    /// Durable-storage write failure
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for solarlog
pub type Result<T> = std::result::Result<T, SolarLogError>;
