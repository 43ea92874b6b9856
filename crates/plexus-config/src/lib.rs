//! Host configuration for the Plexus runtime.
//!
//! A single [`Config`] type loaded from `config.toml` under the host's
//! install root. Every field has a default, so a missing file (first run)
//! yields a working configuration; [`Config::save`] writes the defaults
//! back so operators have a file to edit.
//!
//! This crate has no dependencies on other Plexus crates; conversion to
//! domain types (log levels, paths) happens at the integration boundary in
//! the CLI.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("Failed to read config at {path}: {source}")]
    Read {
        /// Path to the config file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for the schema.
    #[error("Failed to parse config at {path}: {message}")]
    Parse {
        /// Path to the config file.
        path: PathBuf,
        /// The parse error message.
        message: String,
    },

    /// The config file could not be written.
    #[error("Failed to write config at {path}: {source}")]
    Write {
        /// Path to the config file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// A specialized Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Minimum level printed to the console.
    pub console_level: String,
    /// Minimum level written to the log file.
    pub file_level: String,
    /// Directory for log files, relative to the install root.
    pub directory: PathBuf,
    /// Number of dated log files to keep.
    pub retention: usize,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            console_level: "INFO".to_string(),
            file_level: "INFO".to_string(),
            directory: PathBuf::from("logs"),
            retention: 30,
        }
    }
}

/// Extension runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionSettings {
    /// Directory scanned for extensions, relative to the install root.
    pub directory: PathBuf,
}

impl Default for ExtensionSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("extensions"),
        }
    }
}

/// Shell capability settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellSettings {
    /// Timeout in seconds for the `run_command` capability.
    pub timeout_secs: u64,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Host configuration, persisted as `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Host version string reported to extensions.
    pub version: String,
    /// Logging settings.
    pub log: LogSettings,
    /// Extension settings.
    pub extensions: ExtensionSettings,
    /// Shell capability settings.
    pub shell: ShellSettings,
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    /// An absent file is not an error.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Write this configuration to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config.log.console_level, "INFO");
        assert_eq!(config.extensions.directory, PathBuf::from("extensions"));
        assert_eq!(config.shell.timeout_secs, 30);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[log]\nconsole_level = \"DEBUG\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.log.console_level, "DEBUG");
        assert_eq!(config.log.file_level, "INFO");
        assert_eq!(config.log.retention, 30);
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        let config = Config {
            version: "0.2.0".to_string(),
            shell: ShellSettings { timeout_secs: 5 },
            ..Config::default()
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.version, "0.2.0");
        assert_eq!(loaded.shell.timeout_secs, 5);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "log = \"not a table\"").unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
