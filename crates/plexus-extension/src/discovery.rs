//! Extension candidate discovery.
//!
//! Scans the immediate subdirectories of an extensions directory for
//! `_manifest.json` files. Unparsable or invalid manifests are logged and
//! skipped; discovery itself never fails the host. The order candidates are
//! returned in is the directory read order, and the resolver later uses
//! that order as its tie-break.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::ExtensionError;
use crate::manifest::{ExtensionManifest, MANIFEST_FILE_NAME};

/// A validated extension candidate: a manifest plus the directory it was
/// discovered in.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The parsed, validated manifest.
    pub manifest: ExtensionManifest,
    /// The extension's directory (containing the manifest file).
    pub dir: PathBuf,
}

impl Candidate {
    /// The extension's unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.manifest.name
    }
}

/// Discover validated candidates under `extensions_dir`.
///
/// Each immediate subdirectory containing a `_manifest.json` is considered;
/// candidates whose manifest fails to parse or validate are dropped here and
/// never reach the dependency graph. A missing extensions directory yields
/// an empty list with a warning.
#[must_use]
pub fn discover(extensions_dir: &Path) -> Vec<Candidate> {
    let entries = match std::fs::read_dir(extensions_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                "Extensions directory {} is not readable: {e}",
                extensions_dir.display()
            );
            return Vec::new();
        },
    };

    let mut candidates = Vec::new();
    for entry in entries.filter_map(Result::ok) {
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }
        let manifest_path = dir.join(MANIFEST_FILE_NAME);
        if !manifest_path.exists() {
            debug!("No manifest in {}, skipping", dir.display());
            continue;
        }
        match load_manifest(&manifest_path) {
            Ok(manifest) => {
                debug!(
                    "Discovered extension '{}' in {}",
                    manifest.name,
                    dir.display()
                );
                candidates.push(Candidate { manifest, dir });
            },
            Err(e) => {
                warn!("Skipping candidate in {}: {e}", dir.display());
            },
        }
    }

    info!("Discovered {} extension candidate(s)", candidates.len());
    candidates
}

/// Load and validate a single manifest file.
///
/// # Errors
///
/// Returns [`ExtensionError::ManifestParse`] when the file cannot be read
/// or is not valid JSON for the manifest schema, and
/// [`ExtensionError::ManifestInvalid`] when a parsed field fails
/// validation.
pub fn load_manifest(path: &Path) -> Result<ExtensionManifest, ExtensionError> {
    let content = std::fs::read_to_string(path).map_err(|e| ExtensionError::ManifestParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let manifest: ExtensionManifest =
        serde_json::from_str(&content).map_err(|e| ExtensionError::ManifestParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    manifest.validate()?;
    Ok(manifest)
}

/// Check whether any subdirectory of `extensions_dir` holds a manifest for
/// `name`, regardless of whether that extension has been loaded.
///
/// Used by the orchestrator's hard dependency check at load time.
#[must_use]
pub fn is_discoverable(extensions_dir: &Path, name: &str) -> bool {
    let Ok(entries) = std::fs::read_dir(extensions_dir) else {
        return false;
    };
    for entry in entries.filter_map(Result::ok) {
        let manifest_path = entry.path().join(MANIFEST_FILE_NAME);
        if !manifest_path.exists() {
            continue;
        }
        if let Ok(manifest) = load_manifest(&manifest_path) {
            if manifest.name == name {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_manifest(root: &Path, dir_name: &str, body: &str) {
        let dir = root.join(dir_name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(MANIFEST_FILE_NAME), body).unwrap();
    }

    fn manifest_json(name: &str) -> String {
        format!(
            r#"{{
                "version": "1.0.0",
                "pluginName": "{name}",
                "Developer": "Tests",
                "Permission": "User",
                "InstallationLevel": "Normal"
            }}"#
        )
    }

    #[test]
    fn discovers_valid_candidates() {
        let tmp = tempfile::tempdir().unwrap();
        write_manifest(tmp.path(), "clock", &manifest_json("clock"));
        write_manifest(tmp.path(), "notes", &manifest_json("notes"));

        let candidates = discover(tmp.path());
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn skips_unparsable_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        write_manifest(tmp.path(), "broken", "{ not json");
        write_manifest(tmp.path(), "clock", &manifest_json("clock"));

        let candidates = discover(tmp.path());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name(), "clock");
    }

    #[test]
    fn skips_directory_without_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("empty")).unwrap();
        write_manifest(tmp.path(), "clock", &manifest_json("clock"));

        let candidates = discover(tmp.path());
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn missing_directory_yields_empty_list() {
        let tmp = tempfile::tempdir().unwrap();
        let gone = tmp.path().join("nope");
        assert!(discover(&gone).is_empty());
    }

    #[test]
    fn invalid_enum_is_dropped_before_the_graph() {
        let tmp = tempfile::tempdir().unwrap();
        write_manifest(
            tmp.path(),
            "rogue",
            r#"{
                "version": "1.0.0",
                "pluginName": "rogue",
                "Developer": "Tests",
                "Permission": "Root",
                "InstallationLevel": "Normal"
            }"#,
        );

        assert!(discover(tmp.path()).is_empty());
    }

    #[test]
    fn is_discoverable_matches_manifest_name_not_dir_name() {
        let tmp = tempfile::tempdir().unwrap();
        write_manifest(tmp.path(), "some-dir", &manifest_json("clock"));

        assert!(is_discoverable(tmp.path(), "clock"));
        assert!(!is_discoverable(tmp.path(), "some-dir"));
        assert!(!is_discoverable(tmp.path(), "ghost"));
    }
}
