//! Built-in extension code units.
//!
//! The host performs no dynamic code loading; extension code is compiled in
//! and matched to discovered manifests by name. These are the units shipped
//! with the CLI binary. Dropping a matching `_manifest.json` under the
//! extensions directory activates one.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use serde_json::json;
use tracing::{info, warn};

use plexus_capabilities::CapabilityRegistry;
use plexus_extension::{Extension, ExtensionResult, HostHandle};
use plexus_host::FactoryTable;
use plexus_telemetry::ExtensionScope;

/// Logs host and kernel information once at start, through the mediated
/// `System.run_command` capability rather than direct process spawning.
struct SysInfo;

impl Extension for SysInfo {
    fn start(
        &mut self,
        capabilities: &CapabilityRegistry,
        host: &HostHandle,
    ) -> ExtensionResult<()> {
        info!("Host version {}", host.version);
        let Some(run) = capabilities.lookup("System", "run_command") else {
            warn!("run_command capability unavailable");
            return Ok(());
        };
        match run.call(json!({"command": "uname -sr", "timeout": 5})) {
            Ok(result) => {
                let kernel = result["stdout"].as_str().unwrap_or("unknown");
                info!("Kernel: {kernel}");
            },
            Err(e) => warn!("Could not query system info: {e}"),
        }
        Ok(())
    }
}

/// Appends a timestamped line to `journal.txt` under the install root on
/// every start, through `System.append_file`.
struct Journal;

impl Extension for Journal {
    fn start(
        &mut self,
        capabilities: &CapabilityRegistry,
        _host: &HostHandle,
    ) -> ExtensionResult<()> {
        let Some(append) = capabilities.lookup("System", "append_file") else {
            warn!("append_file capability unavailable");
            return Ok(());
        };
        let line = format!(
            "started at {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        match append.call(json!({"path": "journal.txt", "content": line})) {
            Ok(_) => info!("Journal entry written"),
            Err(e) => warn!("Could not write journal entry: {e}"),
        }
        Ok(())
    }
}

/// Spawns a background thread that logs a periodic liveness line. The
/// thread enters its own attribution scope, so its lines carry the
/// extension's tag instead of `core`.
struct Heartbeat {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Heartbeat {
    fn new() -> Self {
        Self {
            stop: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }
}

impl Extension for Heartbeat {
    fn start(
        &mut self,
        _capabilities: &CapabilityRegistry,
        _host: &HostHandle,
    ) -> ExtensionResult<()> {
        let stop = Arc::clone(&self.stop);
        self.handle = Some(std::thread::spawn(move || {
            let _scope = ExtensionScope::enter("heartbeat");
            info!("Heartbeat running");
            let interval = Duration::from_secs(30);
            let mut last = Instant::now();
            while !stop.load(Ordering::Relaxed) {
                if last.elapsed() >= interval {
                    info!("Still alive");
                    last = Instant::now();
                }
                std::thread::sleep(Duration::from_millis(250));
            }
        }));
        Ok(())
    }

    fn stop(&mut self) -> ExtensionResult<()> {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        Ok(())
    }
}

/// The factory table shipped with this binary.
pub(crate) fn factory_table() -> FactoryTable {
    let mut table = FactoryTable::new();
    table.register("sysinfo", |_| Ok(Box::new(SysInfo) as Box<dyn Extension>));
    table.register("journal", |_| Ok(Box::new(Journal) as Box<dyn Extension>));
    table.register("heartbeat", |_| {
        Ok(Box::new(Heartbeat::new()) as Box<dyn Extension>)
    });
    table
}
