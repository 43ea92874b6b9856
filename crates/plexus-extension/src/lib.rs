//! Plexus Extension - manifest model, directory discovery, and dependency
//! resolution for the Plexus host.
//!
//! This crate owns everything the orchestrator needs to know about an
//! extension *before* it runs: the `_manifest.json` metadata record, the
//! scan that turns a directory of extensions into validated candidates, the
//! topological resolver that orders candidates by their declared
//! dependencies, and the [`Extension`] trait every code unit implements.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod discovery;
pub mod extension;
pub mod manifest;
pub mod resolver;

mod error;

pub use discovery::{Candidate, discover};
pub use error::{ExtensionError, ExtensionResult};
pub use extension::{Extension, ExtensionState, HostHandle};
pub use manifest::{ExtensionManifest, InstallationLevel, PermissionLevel, MANIFEST_FILE_NAME};
pub use resolver::resolve;
