//! Host file capabilities, confined to the install root.
//!
//! Extensions get file access only through `System.read_file`,
//! `System.write_file`, `System.append_file`, and `System.edit_file`. Every
//! requested path is resolved lexically against the install root; absolute
//! paths and `..` traversal above the root are rejected before the
//! filesystem is touched.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use serde_json::{Value, json};

use plexus_capabilities::{
    CapabilityError, CapabilityRegistry, CapabilityResult, FnCapability,
};

use crate::error::{HostError, HostResult};

/// Lexically resolve `request` against `install_root`.
///
/// Purely computational; never touches the filesystem.
///
/// # Errors
///
/// Returns [`HostError::SandboxViolation`] if the request is absolute or
/// attempts to traverse above the root with `..`.
pub fn resolve_path(install_root: &Path, request: &str) -> HostResult<PathBuf> {
    let req = Path::new(request);

    if req.is_absolute() {
        return Err(HostError::SandboxViolation(
            "absolute paths are not allowed".into(),
        ));
    }

    let mut resolved = install_root.to_path_buf();
    for component in req.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                return Err(HostError::SandboxViolation(
                    "prefix or root components are not allowed".into(),
                ));
            },
            Component::CurDir => {},
            Component::ParentDir => {
                if resolved == install_root {
                    return Err(HostError::SandboxViolation(
                        "attempted to traverse above the install root".into(),
                    ));
                }
                resolved.pop();
            },
            Component::Normal(part) => resolved.push(part),
        }
    }

    Ok(resolved)
}

/// File operations scoped under the host install root.
#[derive(Debug, Clone)]
pub struct FileCapabilities {
    install_root: PathBuf,
}

impl FileCapabilities {
    /// Create file capabilities rooted at `install_root`.
    #[must_use]
    pub fn new(install_root: impl Into<PathBuf>) -> Self {
        Self {
            install_root: install_root.into(),
        }
    }

    /// Read a file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Sandbox violations and I/O failures.
    pub fn read(&self, path: &str) -> HostResult<String> {
        let resolved = resolve_path(&self.install_root, path)?;
        std::fs::read_to_string(&resolved).map_err(|e| HostError::Io {
            path: resolved,
            source: e,
        })
    }

    /// Write a file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Sandbox violations and I/O failures.
    pub fn write(&self, path: &str, content: &str) -> HostResult<()> {
        let resolved = resolve_path(&self.install_root, path)?;
        self.ensure_parent(&resolved)?;
        std::fs::write(&resolved, content).map_err(|e| HostError::Io {
            path: resolved,
            source: e,
        })
    }

    /// Append to a file, creating it (and parent directories) if needed.
    ///
    /// # Errors
    ///
    /// Sandbox violations and I/O failures.
    pub fn append(&self, path: &str, content: &str) -> HostResult<()> {
        use std::io::Write as _;
        let resolved = resolve_path(&self.install_root, path)?;
        self.ensure_parent(&resolved)?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&resolved)
            .map_err(|e| HostError::Io {
                path: resolved.clone(),
                source: e,
            })?;
        file.write_all(content.as_bytes()).map_err(|e| HostError::Io {
            path: resolved,
            source: e,
        })
    }

    /// Replace every occurrence of `old` with `new` in the file.
    ///
    /// # Errors
    ///
    /// Sandbox violations and I/O failures.
    pub fn edit(&self, path: &str, old: &str, new: &str) -> HostResult<()> {
        let content = self.read(path)?;
        let updated = content.replace(old, new);
        self.write(path, &updated)
    }

    fn ensure_parent(&self, resolved: &Path) -> HostResult<()> {
        if let Some(parent) = resolved.parent() {
            std::fs::create_dir_all(parent).map_err(|e| HostError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    }
}

/// Register the `System` file capabilities. Registration is silent; these
/// are built-in plumbing, not announced extension surface.
pub(crate) fn register_file_capabilities(registry: &CapabilityRegistry, install_root: &Path) {
    let files = FileCapabilities::new(install_root);

    let reader = files.clone();
    registry.register(
        "System",
        "read_file",
        Arc::new(FnCapability::new(move |args| {
            let path = required_str(&args, "path")?;
            let content = reader.read(path).map_err(execution_failed)?;
            Ok(Value::String(content))
        })),
        true,
    );

    let writer = files.clone();
    registry.register(
        "System",
        "write_file",
        Arc::new(FnCapability::new(move |args| {
            let path = required_str(&args, "path")?;
            let content = required_str(&args, "content")?;
            writer.write(path, content).map_err(execution_failed)?;
            Ok(json!(true))
        })),
        true,
    );

    let appender = files.clone();
    registry.register(
        "System",
        "append_file",
        Arc::new(FnCapability::new(move |args| {
            let path = required_str(&args, "path")?;
            let content = required_str(&args, "content")?;
            appender.append(path, content).map_err(execution_failed)?;
            Ok(json!(true))
        })),
        true,
    );

    let editor = files;
    registry.register(
        "System",
        "edit_file",
        Arc::new(FnCapability::new(move |args| {
            let path = required_str(&args, "path")?;
            let old = required_str(&args, "old_content")?;
            let new = required_str(&args, "new_content")?;
            editor.edit(path, old, new).map_err(execution_failed)?;
            Ok(json!(true))
        })),
        true,
    );
}

fn required_str<'a>(args: &'a Value, key: &str) -> CapabilityResult<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| CapabilityError::InvalidArguments(format!("missing string field '{key}'")))
}

fn execution_failed(e: HostError) -> CapabilityError {
    CapabilityError::ExecutionFailed(e.to_string())
}
