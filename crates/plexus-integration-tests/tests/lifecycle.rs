//! Full bring-up runs against real extension directories.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::{Value, json};

use plexus_capabilities::{CapabilityRegistry, FnCapability};
use plexus_extension::{
    Extension, ExtensionError, ExtensionResult, ExtensionState, HostHandle,
};
use plexus_host::{FactoryTable, Orchestrator};

struct Inert;
impl Extension for Inert {}

/// Registers a greeting capability during its load hook.
struct Provider;

impl Extension for Provider {
    fn load(&mut self, capabilities: &CapabilityRegistry) -> ExtensionResult<()> {
        capabilities.register(
            "greetings",
            "hello",
            Arc::new(FnCapability::new(|args| {
                let who = args.get("who").and_then(Value::as_str).unwrap_or("world");
                Ok(json!(format!("hello, {who}")))
            })),
            false,
        );
        Ok(())
    }

    fn provides_start(&self) -> bool {
        false
    }
}

/// Calls the provider's capability from its start hook.
struct Consumer {
    greeted: Arc<AtomicBool>,
}

impl Extension for Consumer {
    fn start(
        &mut self,
        capabilities: &CapabilityRegistry,
        _host: &HostHandle,
    ) -> ExtensionResult<()> {
        let hello = capabilities
            .lookup("greetings", "hello")
            .ok_or_else(|| ExtensionError::StartFailed {
                name: "consumer".to_string(),
                message: "greetings.hello is not registered".to_string(),
            })?;
        let reply = hello
            .call(json!({"who": "consumer"}))
            .map_err(|e| ExtensionError::StartFailed {
                name: "consumer".to_string(),
                message: e.to_string(),
            })?;
        assert_eq!(reply, json!("hello, consumer"));
        self.greeted.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn capability_registered_at_load_is_callable_from_a_dependent_start() {
    let tmp = tempfile::tempdir().unwrap();
    let extensions = tmp.path().join("extensions");
    common::write_extension(&extensions, "provider", &[]);
    common::write_extension(&extensions, "consumer", &["provider"]);

    let greeted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&greeted);
    let mut factories = FactoryTable::new();
    factories.register("provider", |_| Ok(Box::new(Provider) as Box<dyn Extension>));
    factories.register("consumer", move |_| {
        Ok(Box::new(Consumer {
            greeted: Arc::clone(&flag),
        }) as Box<dyn Extension>)
    });

    let mut orch = Orchestrator::new(
        CapabilityRegistry::new(),
        common::host_for(tmp.path()),
        factories,
    );
    let report = orch.bring_up();

    assert!(greeted.load(Ordering::SeqCst));
    assert_eq!(orch.state_of("provider"), Some(&ExtensionState::Loaded));
    assert_eq!(orch.state_of("consumer"), Some(&ExtensionState::Started));
    assert_eq!(report.loaded, 2);
    assert_eq!(report.started, 1);
}

#[test]
fn a_mixed_population_settles_into_the_expected_states() {
    let tmp = tempfile::tempdir().unwrap();
    let extensions = tmp.path().join("extensions");
    common::write_extension(&extensions, "healthy", &[]);
    common::write_extension(&extensions, "orphan", &["ghost"]);
    common::write_extension(&extensions, "crasher", &[]);
    common::write_extension(&extensions, "phantom", &[]);

    let mut factories = FactoryTable::new();
    factories.register("healthy", |_| Ok(Box::new(Inert) as Box<dyn Extension>));
    factories.register("orphan", |_| Ok(Box::new(Inert) as Box<dyn Extension>));
    factories.register("crasher", |_| panic!("instantiation exploded"));
    // No factory for "phantom".

    let mut orch = Orchestrator::new(
        CapabilityRegistry::new(),
        common::host_for(tmp.path()),
        factories,
    );
    let report = orch.bring_up();

    assert_eq!(orch.state_of("healthy"), Some(&ExtensionState::Started));
    assert_eq!(orch.state_of("orphan"), Some(&ExtensionState::DependencyWait));
    assert!(matches!(
        orch.state_of("crasher"),
        Some(ExtensionState::Failed(msg)) if msg.contains("exploded")
    ));
    assert!(matches!(
        orch.state_of("phantom"),
        Some(ExtensionState::Failed(_))
    ));

    assert_eq!(report.discovered, 4);
    assert_eq!(report.started, 1);
    assert_eq!(report.waiting, 1);
    assert_eq!(report.failed, 2);
}

struct FailsToStart;
impl Extension for FailsToStart {
    fn start(
        &mut self,
        _capabilities: &CapabilityRegistry,
        _host: &HostHandle,
    ) -> ExtensionResult<()> {
        Err(ExtensionError::StartFailed {
            name: "moody".to_string(),
            message: "refusing to start".to_string(),
        })
    }
}

#[test]
fn start_failure_of_a_dependency_does_not_unload_its_dependent() {
    // "needy" depends on "moody"; moody loads fine but fails to start.
    // The dependency check runs at load time, so needy still starts.
    let tmp = tempfile::tempdir().unwrap();
    let extensions = tmp.path().join("extensions");
    common::write_extension(&extensions, "moody", &[]);
    common::write_extension(&extensions, "needy", &["moody"]);

    let mut factories = FactoryTable::new();
    factories.register("moody", |_| {
        Ok(Box::new(FailsToStart) as Box<dyn Extension>)
    });
    factories.register("needy", |_| Ok(Box::new(Inert) as Box<dyn Extension>));

    let mut orch = Orchestrator::new(
        CapabilityRegistry::new(),
        common::host_for(tmp.path()),
        factories,
    );
    orch.bring_up();

    assert!(matches!(
        orch.state_of("moody"),
        Some(ExtensionState::Failed(msg)) if msg.contains("refusing to start")
    ));
    assert_eq!(orch.state_of("needy"), Some(&ExtensionState::Started));
}

#[test]
fn empty_extensions_directory_brings_up_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(tmp.path().join("extensions")).unwrap();

    let mut orch = Orchestrator::new(
        CapabilityRegistry::new(),
        common::host_for(tmp.path()),
        FactoryTable::new(),
    );
    let report = orch.bring_up();

    assert_eq!(report.discovered, 0);
    assert!(orch.records().is_empty());
}
