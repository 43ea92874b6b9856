use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during extension operations.
#[derive(Debug, Error)]
pub enum ExtensionError {
    /// The `_manifest.json` file could not be read or parsed.
    #[error("Failed to parse manifest at {path}: {message}")]
    ManifestParse {
        /// Path to the offending manifest file.
        path: PathBuf,
        /// The underlying read/parse error message.
        message: String,
    },

    /// A required manifest field is missing or outside its closed set.
    #[error("Invalid manifest for '{name}': {message}")]
    ManifestInvalid {
        /// The extension name, or the directory name if no name parsed.
        name: String,
        /// What failed validation.
        message: String,
    },

    /// The extension's code unit failed while loading.
    #[error("Extension '{name}' failed to load: {message}")]
    LoadFailed {
        /// The extension name.
        name: String,
        /// The failure description.
        message: String,
    },

    /// The extension's start entry point failed.
    #[error("Extension '{name}' failed to start: {message}")]
    StartFailed {
        /// The extension name.
        name: String,
        /// The failure description.
        message: String,
    },
}

/// A specialized Result type for extension operations.
pub type ExtensionResult<T> = Result<T, ExtensionError>;
