use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by host-side operations.
#[derive(Debug, Error)]
pub enum HostError {
    /// A path escaped the host install root.
    #[error("Sandbox violation: {0}")]
    SandboxViolation(String),

    /// A filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The path the operation targeted.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// A shell command could not be spawned.
    #[error("Failed to spawn command: {0}")]
    Spawn(String),
}

/// A specialized Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;
