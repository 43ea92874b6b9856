//! Plexus Telemetry - Logging and output attribution for the Plexus host.
//!
//! This crate provides:
//! - A formatting [`tracing_subscriber`] layer with independent console and
//!   file level thresholds, dated log files, and retention pruning
//! - The per-thread extension attribution scope used while extension code runs
//!
//! # Example
//!
//! ```rust,no_run
//! use plexus_telemetry::{ExtensionScope, LogConfig, setup_logging};
//!
//! # fn main() -> Result<(), plexus_telemetry::TelemetryError> {
//! let config = LogConfig::default();
//! setup_logging(&config)?;
//!
//! // Diagnostics emitted while the guard is alive are tagged "clock".
//! let _scope = ExtensionScope::enter("clock");
//! tracing::info!("tick");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod level;
mod logging;
mod scope;
mod sink;

pub use error::{TelemetryError, TelemetryResult};
pub use level::LogLevel;
pub use logging::{HostLayer, LogConfig, setup_logging};
pub use scope::{CORE_SCOPE, ExtensionScope};
pub use sink::{ConsoleSink, FileSink, LogSink, MemorySink};
