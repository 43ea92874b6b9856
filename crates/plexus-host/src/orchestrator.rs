//! The lifecycle orchestrator.
//!
//! Drives the bring-up sequence on a single control thread: discovery →
//! dependency resolution → load → start. The observed order of successes
//! and failures is exactly the resolved order and is fully reproducible.
//!
//! Error containment rules (none of these abort the host):
//! - a manifest failing re-validation marks that extension Failed;
//! - a declared dependency that is neither loaded nor discoverable parks
//!   the extension in `DependencyWait`;
//! - an error or panic while instantiating/loading a code unit marks the
//!   extension Failed;
//! - an error or panic inside a start entry point marks the extension
//!   Failed.
//!
//! No timeout is imposed on an individual start call: an extension that
//! blocks in `start` stalls the remaining startup sequence. Callers that
//! need bounded bring-up time must add an external watchdog.

use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::{debug, error, info, warn};

use plexus_capabilities::CapabilityRegistry;
use plexus_extension::discovery::is_discoverable;
use plexus_extension::{
    Candidate, Extension, ExtensionResult, ExtensionState, HostHandle, discover, resolve,
};
use plexus_telemetry::ExtensionScope;

use crate::factory::FactoryTable;
use crate::record::ExtensionRecord;

/// Summary of one bring-up run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BringUpReport {
    /// Candidates that survived discovery and validation.
    pub discovered: usize,
    /// Extensions whose code unit loaded.
    pub loaded: usize,
    /// Extensions whose start entry point ran to completion.
    pub started: usize,
    /// Extensions parked because a declared dependency was unresolvable.
    pub waiting: usize,
    /// Extensions that failed during load or start.
    pub failed: usize,
}

/// The top-level coordinator of extension bring-up.
///
/// Owns every [`ExtensionRecord`]; records are mutated only here and
/// discarded when the orchestrator is dropped at shutdown.
pub struct Orchestrator {
    capabilities: CapabilityRegistry,
    host: HostHandle,
    factories: FactoryTable,
    records: Vec<ExtensionRecord>,
}

impl Orchestrator {
    /// Create an orchestrator.
    ///
    /// The capability registry and host handle are passed in explicitly;
    /// the orchestrator never reaches for process-wide globals.
    #[must_use]
    pub fn new(capabilities: CapabilityRegistry, host: HostHandle, factories: FactoryTable) -> Self {
        Self {
            capabilities,
            host,
            factories,
            records: Vec::new(),
        }
    }

    /// Run the full bring-up sequence: discover, resolve, load, start.
    pub fn bring_up(&mut self) -> BringUpReport {
        let candidates = discover(&self.host.extensions_dir);
        let ordered = resolve(&candidates);
        self.load_all(ordered);
        self.start_all();
        let report = self.report();
        info!(
            "Bring-up complete: {} discovered, {} loaded, {} started, {} waiting, {} failed",
            report.discovered, report.loaded, report.started, report.waiting, report.failed
        );
        report
    }

    /// Load every candidate in resolved order.
    ///
    /// Creates one record per candidate. Each candidate's manifest is
    /// re-validated, its declared dependencies are hard-checked, and its
    /// code unit instantiated; any per-extension failure is contained and
    /// loading continues with the next candidate.
    pub fn load_all(&mut self, ordered: Vec<Candidate>) {
        for candidate in ordered {
            let mut record = ExtensionRecord::new(candidate);

            if let Err(e) = record.manifest().validate() {
                warn!("Manifest for '{}' failed re-validation: {e}", record.name());
                record.set_state(ExtensionState::Failed(e.to_string()));
                self.records.push(record);
                continue;
            }
            record.set_state(ExtensionState::Validated);

            if let Some(missing) = self.first_unresolvable_dependency(record.candidate()) {
                warn!(
                    "Extension '{}' is missing dependency '{missing}'; parking it",
                    record.name()
                );
                record.set_state(ExtensionState::DependencyWait);
                self.records.push(record);
                continue;
            }

            self.load_one(&mut record);
            self.records.push(record);
        }
    }

    /// Find the first declared dependency that is neither already loaded
    /// nor discoverable in the extensions directory.
    fn first_unresolvable_dependency(&self, candidate: &Candidate) -> Option<String> {
        candidate
            .manifest
            .dependencies
            .iter()
            .find(|dep| {
                let loaded = self
                    .records
                    .iter()
                    .any(|r| r.name() == dep.as_str() && *r.state() == ExtensionState::Loaded);
                !loaded && !is_discoverable(&self.host.extensions_dir, dep)
            })
            .cloned()
    }

    /// Instantiate one candidate's code unit and run its `load` hook.
    ///
    /// The capability registry handle is injected before any extension code
    /// runs. Errors and panics are contained: the record is marked Failed
    /// and the host moves on.
    fn load_one(&self, record: &mut ExtensionRecord) {
        let name = record.name().to_string();

        let Some(factory) = self.factories.get(&name) else {
            warn!("No code unit registered for extension '{name}'");
            record.set_state(ExtensionState::Failed(
                "no registered code unit".to_string(),
            ));
            return;
        };

        let capabilities = &self.capabilities;
        let candidate = record.candidate().clone();
        let outcome = catch_unwind(AssertUnwindSafe(
            || -> ExtensionResult<Box<dyn Extension>> {
                let mut code_unit = factory(&candidate)?;
                code_unit.load(capabilities)?;
                Ok(code_unit)
            },
        ));

        match outcome {
            Ok(Ok(code_unit)) => {
                debug!("Loaded extension '{name}'");
                record.attach_code_unit(code_unit);
                record.set_state(ExtensionState::Loaded);
            },
            Ok(Err(e)) => {
                error!("Failed to load extension '{name}': {e}");
                record.set_state(ExtensionState::Failed(e.to_string()));
            },
            Err(panic) => {
                let message = panic_message(&*panic);
                error!("Extension '{name}' panicked during load: {message}");
                record.set_state(ExtensionState::Failed(message));
            },
        }
    }

    /// Start every loaded extension, in the same resolved order.
    ///
    /// Each start entry point runs inside an output attribution scope
    /// tagged with the extension's name; its diagnostics (and any failure
    /// we log for it) carry that tag. Extensions without a start entry
    /// point stay Loaded.
    pub fn start_all(&mut self) {
        let capabilities = self.capabilities.clone();
        let host = self.host.clone();

        for record in &mut self.records {
            if *record.state() != ExtensionState::Loaded {
                continue;
            }
            let name = record.name().to_string();
            let Some(code_unit) = record.code_unit_mut() else {
                continue;
            };

            if !code_unit.provides_start() {
                debug!("Extension '{name}' has no start entry point");
                continue;
            }

            let _scope = ExtensionScope::enter(&name);
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                code_unit.start(&capabilities, &host)
            }));

            match outcome {
                Ok(Ok(())) => {
                    info!("Extension started");
                    record.set_state(ExtensionState::Started);
                },
                Ok(Err(e)) => {
                    error!("Start entry point failed: {e}");
                    record.set_state(ExtensionState::Failed(e.to_string()));
                    record.discard_code_unit();
                },
                Err(panic) => {
                    let message = panic_message(&*panic);
                    error!("Start entry point panicked: {message}");
                    record.set_state(ExtensionState::Failed(message));
                    record.discard_code_unit();
                },
            }
        }
    }

    /// Stop every live extension, in reverse start order. Best effort.
    pub fn shutdown(&mut self) {
        for record in self.records.iter_mut().rev() {
            let name = record.name().to_string();
            let is_live = matches!(
                record.state(),
                ExtensionState::Started | ExtensionState::Loaded
            );
            if !is_live {
                continue;
            }
            if let Some(code_unit) = record.code_unit_mut() {
                let _scope = ExtensionScope::enter(&name);
                let outcome = catch_unwind(AssertUnwindSafe(|| code_unit.stop()));
                match outcome {
                    Ok(Ok(())) => debug!("Extension stopped"),
                    Ok(Err(e)) => warn!("Stop failed: {e}"),
                    Err(panic) => warn!("Stop panicked: {}", panic_message(&*panic)),
                }
            }
            record.discard_code_unit();
        }
        self.records.clear();
    }

    /// All extension records, in resolved order.
    #[must_use]
    pub fn records(&self) -> &[ExtensionRecord] {
        &self.records
    }

    /// Look up the state of an extension by name.
    #[must_use]
    pub fn state_of(&self, name: &str) -> Option<&ExtensionState> {
        self.records
            .iter()
            .find(|r| r.name() == name)
            .map(ExtensionRecord::state)
    }

    /// The capability registry this orchestrator injects into extensions.
    #[must_use]
    pub fn capabilities(&self) -> &CapabilityRegistry {
        &self.capabilities
    }

    fn report(&self) -> BringUpReport {
        let mut report = BringUpReport {
            discovered: self.records.len(),
            ..BringUpReport::default()
        };
        for record in &self.records {
            match record.state() {
                ExtensionState::Loaded => report.loaded += 1,
                ExtensionState::Started => {
                    report.loaded += 1;
                    report.started += 1;
                },
                ExtensionState::DependencyWait => report.waiting += 1,
                ExtensionState::Failed(_) => report.failed += 1,
                ExtensionState::Discovered | ExtensionState::Validated => {},
            }
        }
        report
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("records", &self.records)
            .field("factories", &self.factories)
            .finish_non_exhaustive()
    }
}

/// Render a panic payload as text.
fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
