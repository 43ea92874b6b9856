//! The extension code-unit contract and lifecycle state.

use std::fmt;
use std::path::PathBuf;

use plexus_capabilities::CapabilityRegistry;

use crate::error::ExtensionResult;

/// Lifecycle state of an extension record.
///
/// Driven exclusively by the orchestrator:
/// Discovered → Validated → (`DependencyWait`) → Loaded → Started, or
/// Failed at any point. Failed is terminal; there is no retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionState {
    /// Manifest found and parsed.
    Discovered,
    /// Manifest re-validated by the orchestrator.
    Validated,
    /// A declared dependency could not be found; the extension is skipped.
    DependencyWait,
    /// Code unit instantiated with the registry handle injected.
    Loaded,
    /// Start entry point ran to completion.
    Started,
    /// Load or start failed; terminal.
    Failed(String),
}

impl fmt::Display for ExtensionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionState::Discovered => f.write_str("Discovered"),
            ExtensionState::Validated => f.write_str("Validated"),
            ExtensionState::DependencyWait => f.write_str("DependencyWait"),
            ExtensionState::Loaded => f.write_str("Loaded"),
            ExtensionState::Started => f.write_str("Started"),
            ExtensionState::Failed(reason) => write!(f, "Failed({reason})"),
        }
    }
}

/// Host information handed to every extension's start entry point.
#[derive(Debug, Clone)]
pub struct HostHandle {
    /// Host version string.
    pub version: String,
    /// The host's install root; host file capabilities are confined to it.
    pub install_root: PathBuf,
    /// The directory extensions were discovered in.
    pub extensions_dir: PathBuf,
}

/// A loaded extension code unit.
///
/// Extensions never see each other directly: the only collaboration channel
/// they are handed is the [`CapabilityRegistry`]. `start` may register
/// further capabilities and may spawn background threads; the host does not
/// supervise those threads.
pub trait Extension: Send {
    /// One-time initialization, run immediately after instantiation with
    /// the registry handle injected. Runs before `start` of any extension.
    ///
    /// # Errors
    ///
    /// Any error marks this extension Failed; the host continues with the
    /// next extension.
    fn load(&mut self, capabilities: &CapabilityRegistry) -> ExtensionResult<()> {
        let _ = capabilities;
        Ok(())
    }

    /// Whether this extension exposes a start entry point. Extensions
    /// without one stay Loaded and are never started.
    fn provides_start(&self) -> bool {
        true
    }

    /// The start entry point, invoked once after every extension is loaded,
    /// inside an output attribution scope tagged with this extension's name.
    ///
    /// # Errors
    ///
    /// Any error marks this extension Failed; startup continues with the
    /// next extension.
    fn start(
        &mut self,
        capabilities: &CapabilityRegistry,
        host: &HostHandle,
    ) -> ExtensionResult<()> {
        let _ = (capabilities, host);
        Ok(())
    }

    /// Release resources at shutdown. Best effort; errors are logged and
    /// otherwise ignored.
    ///
    /// # Errors
    ///
    /// Implementations may report cleanup failures; the host only logs them.
    fn stop(&mut self) -> ExtensionResult<()> {
        Ok(())
    }
}
