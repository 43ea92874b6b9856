//! Shared fixtures for Plexus integration tests.

#![allow(dead_code)] // not every test binary uses every helper

use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;

use plexus_extension::{HostHandle, MANIFEST_FILE_NAME};
use plexus_telemetry::{HostLayer, LogLevel, LogSink, MemorySink};

/// Write a well-formed manifest for `name` under its own directory.
pub fn write_extension(extensions_dir: &Path, name: &str, deps: &[&str]) {
    write_manifest(extensions_dir, name, &manifest_json(name, deps));
}

/// Write a raw manifest body into `extensions_dir/dir_name/_manifest.json`.
pub fn write_manifest(extensions_dir: &Path, dir_name: &str, body: &str) {
    let dir = extensions_dir.join(dir_name);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(MANIFEST_FILE_NAME), body).unwrap();
}

/// A complete manifest body for `name` with the given dependencies.
pub fn manifest_json(name: &str, deps: &[&str]) -> String {
    let deps = serde_json::to_string(deps).unwrap();
    format!(
        r#"{{
            "version": "1.0.0",
            "pluginName": "{name}",
            "Developer": "Integration",
            "Permission": "User",
            "InstallationLevel": "Normal",
            "dependencies": {deps}
        }}"#
    )
}

/// A host handle rooted at `root`, with extensions under `root/extensions`.
pub fn host_for(root: &Path) -> HostHandle {
    HostHandle {
        version: "0.1.0".to_string(),
        install_root: root.to_path_buf(),
        extensions_dir: root.join("extensions"),
    }
}

/// A memory-backed log capture: every event at `threshold` or above ends up
/// as a formatted line in the returned sink.
pub fn capture(
    threshold: LogLevel,
) -> (Arc<MemorySink>, impl tracing::Subscriber + Send + Sync) {
    let sink = Arc::new(MemorySink::new());
    let layer = HostLayer::new().with_sink(threshold, Arc::clone(&sink) as Arc<dyn LogSink>);
    let subscriber = tracing_subscriber::registry().with(layer);
    (sink, subscriber)
}
