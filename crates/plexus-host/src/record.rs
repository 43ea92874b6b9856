//! Per-extension bookkeeping owned by the orchestrator.

use std::fmt;
use std::path::Path;

use plexus_extension::{Candidate, Extension, ExtensionManifest, ExtensionState};

/// Everything the host tracks about one discovered extension: its manifest,
/// its directory, its lifecycle state, and (once loaded) its code unit.
///
/// Records are created at discovery, mutated only by the orchestrator, and
/// discarded at process shutdown; nothing is persisted.
pub struct ExtensionRecord {
    candidate: Candidate,
    state: ExtensionState,
    code_unit: Option<Box<dyn Extension>>,
}

impl ExtensionRecord {
    pub(crate) fn new(candidate: Candidate) -> Self {
        Self {
            candidate,
            state: ExtensionState::Discovered,
            code_unit: None,
        }
    }

    /// The extension's unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.candidate.name()
    }

    /// The manifest this record was created from.
    #[must_use]
    pub fn manifest(&self) -> &ExtensionManifest {
        &self.candidate.manifest
    }

    /// The directory the extension was discovered in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.candidate.dir
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> &ExtensionState {
        &self.state
    }

    pub(crate) fn set_state(&mut self, state: ExtensionState) {
        self.state = state;
    }

    pub(crate) fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    pub(crate) fn attach_code_unit(&mut self, code_unit: Box<dyn Extension>) {
        self.code_unit = Some(code_unit);
    }

    pub(crate) fn code_unit_mut(&mut self) -> Option<&mut Box<dyn Extension>> {
        self.code_unit.as_mut()
    }

    pub(crate) fn discard_code_unit(&mut self) {
        self.code_unit = None;
    }
}

impl fmt::Debug for ExtensionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRecord")
            .field("name", &self.name())
            .field("state", &self.state)
            .field("loaded", &self.code_unit.is_some())
            .finish()
    }
}
