use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while setting up telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The log directory or file could not be created or opened.
    #[error("Failed to open log file at {path}: {source}")]
    LogFile {
        /// Path that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A level string did not name a known log level.
    #[error("Unknown log level: {0}")]
    UnknownLevel(String),

    /// A global subscriber was already installed.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobalDefault(String),
}

/// A specialized Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
