//! Output sinks for formatted log lines.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{TelemetryError, TelemetryResult};

/// A destination for formatted log lines.
pub trait LogSink: Send + Sync {
    /// Write one formatted line (without trailing newline).
    fn write_line(&self, line: &str);
}

/// Sink that writes lines to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn write_line(&self, line: &str) {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        // A broken pipe is not worth crashing the host over.
        let _ = writeln!(handle, "{line}");
    }
}

/// Sink that appends lines to a dated log file.
///
/// The file is named `plexus_YYYYMMDD.log` inside the configured directory.
/// On construction, log files beyond the retention count are pruned, oldest
/// first.
pub struct FileSink {
    file: Mutex<File>,
    path: PathBuf,
}

impl FileSink {
    /// Open (creating if needed) today's log file in `directory` and prune
    /// old log files down to `retention` entries.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::LogFile`] if the directory or file cannot
    /// be created.
    pub fn open(directory: &Path, retention: usize) -> TelemetryResult<Self> {
        fs::create_dir_all(directory).map_err(|e| TelemetryError::LogFile {
            path: directory.to_path_buf(),
            source: e,
        })?;

        let name = format!("plexus_{}.log", chrono::Local::now().format("%Y%m%d"));
        let path = directory.join(name);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| TelemetryError::LogFile {
                path: path.clone(),
                source: e,
            })?;

        prune_old_logs(directory, retention);

        Ok(Self {
            file: Mutex::new(file),
            path,
        })
    }

    /// Path of the file this sink appends to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn write_line(&self, line: &str) {
        if let Ok(mut file) = self.file.lock() {
            // Log I/O errors are swallowed; the console sink still sees the line.
            let _ = writeln!(file, "{line}");
        }
    }
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink").field("path", &self.path).finish()
    }
}

/// Remove `.log` files beyond the retention count, oldest (by mtime) first.
fn prune_old_logs(directory: &Path, retention: usize) {
    let Ok(entries) = fs::read_dir(directory) else {
        return;
    };

    let mut logs: Vec<(std::time::SystemTime, PathBuf)> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "log"))
        .filter_map(|p| {
            let mtime = fs::metadata(&p).and_then(|m| m.modified()).ok()?;
            Some((mtime, p))
        })
        .collect();

    if logs.len() <= retention {
        return;
    }

    logs.sort_by_key(|(mtime, _)| *mtime);
    let excess = logs.len().saturating_sub(retention);
    for (_, path) in logs.into_iter().take(excess) {
        let _ = fs::remove_file(path);
    }
}

/// Sink that collects lines in memory (for tests).
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Create an empty memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all lines written so far.
    ///
    /// # Panics
    ///
    /// Panics if a writer panicked while holding the internal lock.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("memory sink poisoned").clone()
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sink_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::open(dir.path(), 5).unwrap();
        sink.write_line("first");
        sink.write_line("second");

        let content = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn prune_keeps_newest_logs() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..4 {
            let path = dir.path().join(format!("plexus_2024010{i}.log"));
            fs::write(&path, "x").unwrap();
            // Distinct mtimes so the prune order is deterministic.
            std::thread::sleep(std::time::Duration::from_millis(20));
        }

        prune_old_logs(dir.path(), 2);

        let mut remaining: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        remaining.sort();
        assert_eq!(remaining, vec!["plexus_20240102.log", "plexus_20240103.log"]);
    }

    #[test]
    fn memory_sink_snapshots() {
        let sink = MemorySink::new();
        sink.write_line("a");
        sink.write_line("b");
        assert_eq!(sink.lines(), vec!["a", "b"]);
    }
}
