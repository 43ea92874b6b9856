//! Plexus Host - lifecycle orchestration for extension bring-up, plus the
//! host-provided system capabilities.
//!
//! The [`Orchestrator`] drives the sequence discovery → resolution → load →
//! start on a single control thread. No failure of an individual extension
//! is fatal to the host: invalid manifests are dropped at discovery,
//! extensions with unresolvable dependencies are parked in
//! `DependencyWait`, and load/start failures (including panics) mark only
//! the offending extension Failed.
//!
//! Host capabilities (`System.*`) give extensions file access confined to
//! the install root and bounded shell execution, mediated like every other
//! capability through the registry.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod factory;
mod fs;
mod orchestrator;
mod record;
mod shell;

pub use error::{HostError, HostResult};
pub use factory::{ExtensionFactory, FactoryTable};
pub use fs::{FileCapabilities, resolve_path};
pub use orchestrator::{BringUpReport, Orchestrator};
pub use record::ExtensionRecord;
pub use shell::{CommandOutcome, run_command};

use plexus_capabilities::CapabilityRegistry;
use std::path::Path;
use std::time::Duration;

/// Register the host-provided `System` capabilities: scoped file
/// read/write/append/edit and bounded shell execution.
///
/// File capabilities are registered silently, matching their role as
/// built-in plumbing rather than announced extension surface.
pub fn register_system_capabilities(
    registry: &CapabilityRegistry,
    install_root: &Path,
    shell_timeout: Duration,
) {
    fs::register_file_capabilities(registry, install_root);
    shell::register_shell_capability(registry, shell_timeout);
}
