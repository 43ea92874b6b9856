//! The capability registry.
//!
//! A process-wide table of `(namespace, name)` → callable handle pairs.
//! After host bring-up the registry is shared across extension-owned
//! threads; every operation is a short map access under one lock, so no
//! finer-grained locking is needed.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::capability::CapabilityHandle;

/// Fully qualified capability key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CapabilityKey {
    /// Namespace, usually the providing extension's name (or `System` for
    /// host-provided capabilities).
    pub namespace: String,
    /// Capability name within the namespace.
    pub name: String,
}

impl fmt::Display for CapabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// Registry of callable capability handles.
///
/// Cheap to clone; clones share the same underlying table. This is the
/// handle injected into every extension at load time.
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    entries: Arc<RwLock<HashMap<(String, String), CapabilityHandle>>>,
}

impl CapabilityRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability under `(namespace, name)`.
    ///
    /// Registering an existing key overwrites it; the last write wins.
    /// Unless `silent` is set, an informational log line identifies the
    /// registered key.
    pub fn register(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        handle: CapabilityHandle,
        silent: bool,
    ) {
        let namespace = namespace.into();
        let name = name.into();
        {
            let mut entries = match self.entries.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            entries.insert((namespace.clone(), name.clone()), handle);
        }
        if silent {
            debug!("Capability registered silently: {namespace}.{name}");
        } else {
            info!("Capability registered: {namespace}.{name}");
        }
    }

    /// Look up a capability by key.
    ///
    /// A miss is `None`, never an error; callers decide the fallback.
    #[must_use]
    pub fn lookup(&self, namespace: &str, name: &str) -> Option<CapabilityHandle> {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    /// Snapshot of registered keys, optionally restricted to one namespace.
    ///
    /// Returns a copy, not a live view; keys are sorted for stable
    /// introspection output.
    #[must_use]
    pub fn list(&self, namespace: Option<&str>) -> Vec<CapabilityKey> {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut keys: Vec<CapabilityKey> = entries
            .keys()
            .filter(|(ns, _)| namespace.is_none_or(|wanted| ns == wanted))
            .map(|(ns, name)| CapabilityKey {
                namespace: ns.clone(),
                name: name.clone(),
            })
            .collect();
        keys.sort();
        keys
    }

    /// Number of registered capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Whether the registry has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("capability_count", &self.len())
            .finish()
    }
}
