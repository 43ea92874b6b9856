//! The static registration table mapping extension names to code units.
//!
//! Discovery only yields metadata; the code behind an extension comes from
//! a factory registered here under the manifest's `pluginName`. This is the
//! host's stand-in for dynamic code loading: concrete extensions are
//! compiled in and selected at load time by name. A discovered manifest
//! with no matching factory is a load failure for that extension only.

use std::collections::HashMap;
use std::sync::Arc;

use plexus_extension::{Candidate, Extension, ExtensionResult};

/// Constructor for an extension code unit.
///
/// Receives the candidate (manifest plus extension directory) so the code
/// unit can locate its own assets. Instantiation is the moment "top-level
/// code" runs; errors and panics here are contained per extension by the
/// orchestrator.
pub type ExtensionFactory =
    Arc<dyn Fn(&Candidate) -> ExtensionResult<Box<dyn Extension>> + Send + Sync>;

/// Name-keyed table of extension factories.
///
/// Populated once during host bootstrap, before bring-up; the orchestrator
/// only reads it afterwards.
#[derive(Default)]
pub struct FactoryTable {
    factories: HashMap<String, ExtensionFactory>,
}

impl FactoryTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for the extension named `name`. Registering the
    /// same name twice overwrites the earlier factory.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&Candidate) -> ExtensionResult<Box<dyn Extension>> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    /// Look up the factory for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ExtensionFactory> {
        self.factories.get(name)
    }

    /// Number of registered factories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for FactoryTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("FactoryTable").field("names", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plexus_extension::{ExtensionManifest, InstallationLevel, PermissionLevel};
    use std::path::PathBuf;

    struct Inert;
    impl Extension for Inert {}

    fn candidate(name: &str) -> Candidate {
        Candidate {
            manifest: ExtensionManifest {
                version: "1.0.0".to_string(),
                name: name.to_string(),
                developer: "Tests".to_string(),
                permission: PermissionLevel::User,
                installation_level: InstallationLevel::Normal,
                dependencies: Vec::new(),
            },
            dir: PathBuf::from(name),
        }
    }

    #[test]
    fn registered_factory_is_found_by_name() {
        let mut table = FactoryTable::new();
        table.register("clock", |_| Ok(Box::new(Inert) as Box<dyn Extension>));

        assert!(table.get("clock").is_some());
        assert!(table.get("ghost").is_none());

        let factory = table.get("clock").unwrap();
        assert!(factory(&candidate("clock")).is_ok());
    }

    #[test]
    fn reregistration_overwrites() {
        let mut table = FactoryTable::new();
        table.register("clock", |_| Ok(Box::new(Inert) as Box<dyn Extension>));
        table.register("clock", |_| Ok(Box::new(Inert) as Box<dyn Extension>));
        assert_eq!(table.len(), 1);
    }
}
