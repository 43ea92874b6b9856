//! Per-thread output attribution.
//!
//! While an [`ExtensionScope`] guard is alive, diagnostics emitted on the
//! same thread are tagged with the extension's name instead of the core
//! tag. The scope is an entered `tracing` span, so it is strictly
//! thread-local: work handed to another thread does not inherit it, and
//! the tag is released on every exit path (including panics) when the
//! guard drops.

use tracing::span::EnteredSpan;

/// Tag used for diagnostics emitted outside any extension scope.
pub const CORE_SCOPE: &str = "core";

/// Guard holding the current thread inside an extension attribution scope.
///
/// The guard is deliberately `!Send`: a scope belongs to the thread that
/// entered it and cannot be moved across threads. Background threads an
/// extension spawns must enter their own scope if they want attribution.
#[must_use = "the attribution scope ends when this guard is dropped"]
#[derive(Debug)]
pub struct ExtensionScope {
    _entered: EnteredSpan,
}

impl ExtensionScope {
    /// Enter an attribution scope for `extension_name` on the calling thread.
    pub fn enter(extension_name: &str) -> Self {
        let span = tracing::info_span!("extension_scope", extension = extension_name);
        Self {
            _entered: span.entered(),
        }
    }
}
