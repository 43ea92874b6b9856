//! Extension manifest types.
//!
//! An extension manifest (`_manifest.json`) describes an extension's
//! identity, permission level, and dependencies. Manifests are loaded from
//! disk during discovery; a manifest that fails to parse or validate never
//! enters the dependency graph.

use serde::{Deserialize, Serialize};

use crate::error::{ExtensionError, ExtensionResult};

/// Standard manifest file name inside each extension directory.
pub const MANIFEST_FILE_NAME: &str = "_manifest.json";

/// Permission level an extension runs with. Closed set; any other value
/// fails manifest parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionLevel {
    /// Full access to host-provided system capabilities.
    System,
    /// Ordinary user-level extension.
    User,
    /// Untrusted, read-mostly extension.
    Visitor,
}

/// How the extension was installed. Closed set; any other value fails
/// manifest parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallationLevel {
    /// Installed host-wide by an administrator.
    Admin,
    /// Installed for the current user.
    Normal,
}

/// An extension manifest loaded from `_manifest.json`.
///
/// The wire keys (`pluginName`, `Developer`, ...) are fixed by the manifest
/// format; additional unknown keys are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionManifest {
    /// The extension's version string.
    pub version: String,
    /// The extension's unique name among discovered candidates.
    #[serde(rename = "pluginName")]
    pub name: String,
    /// The developer or vendor of the extension.
    #[serde(rename = "Developer")]
    pub developer: String,
    /// Requested permission level.
    #[serde(rename = "Permission")]
    pub permission: PermissionLevel,
    /// Installation level.
    #[serde(rename = "InstallationLevel")]
    pub installation_level: InstallationLevel,
    /// Names of extensions that must be ordered before this one.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl ExtensionManifest {
    /// Re-check the invariants that deserialization cannot express.
    ///
    /// Parsing already guarantees the required fields are present and the
    /// enums are within their closed sets; this guards against empty
    /// strings and is run again by the orchestrator before loading.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::ManifestInvalid`] naming the first field
    /// that fails.
    pub fn validate(&self) -> ExtensionResult<()> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("pluginName must not be empty"));
        }
        if self.version.trim().is_empty() {
            return Err(self.invalid("version must not be empty"));
        }
        if self.developer.trim().is_empty() {
            return Err(self.invalid("Developer must not be empty"));
        }
        if self.dependencies.iter().any(|d| d.trim().is_empty()) {
            return Err(self.invalid("dependencies must not contain empty names"));
        }
        Ok(())
    }

    fn invalid(&self, message: &str) -> ExtensionError {
        ExtensionError::ManifestInvalid {
            name: self.name.clone(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_manifest() -> serde_json::Value {
        json!({
            "version": "1.0.0",
            "pluginName": "clock",
            "Developer": "Plexus Team",
            "Permission": "User",
            "InstallationLevel": "Normal",
            "dependencies": ["tz-data"]
        })
    }

    #[test]
    fn parses_complete_manifest() {
        let manifest: ExtensionManifest = serde_json::from_value(full_manifest()).unwrap();
        assert_eq!(manifest.name, "clock");
        assert_eq!(manifest.permission, PermissionLevel::User);
        assert_eq!(manifest.installation_level, InstallationLevel::Normal);
        assert_eq!(manifest.dependencies, vec!["tz-data"]);
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn dependencies_default_to_empty() {
        let mut value = full_manifest();
        value.as_object_mut().unwrap().remove("dependencies");
        let manifest: ExtensionManifest = serde_json::from_value(value).unwrap();
        assert!(manifest.dependencies.is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut value = full_manifest();
        value
            .as_object_mut()
            .unwrap()
            .insert("homepage".into(), json!("https://example.com"));
        assert!(serde_json::from_value::<ExtensionManifest>(value).is_ok());
    }

    #[test]
    fn each_required_field_is_required() {
        for field in [
            "version",
            "pluginName",
            "Developer",
            "Permission",
            "InstallationLevel",
        ] {
            let mut value = full_manifest();
            value.as_object_mut().unwrap().remove(field);
            assert!(
                serde_json::from_value::<ExtensionManifest>(value).is_err(),
                "manifest missing '{field}' should fail to parse"
            );
        }
    }

    #[test]
    fn enum_values_are_closed_sets() {
        let mut value = full_manifest();
        value
            .as_object_mut()
            .unwrap()
            .insert("Permission".into(), json!("Root"));
        assert!(serde_json::from_value::<ExtensionManifest>(value).is_err());

        let mut value = full_manifest();
        value
            .as_object_mut()
            .unwrap()
            .insert("InstallationLevel".into(), json!("Global"));
        assert!(serde_json::from_value::<ExtensionManifest>(value).is_err());
    }

    #[test]
    fn validate_rejects_empty_name() {
        let mut value = full_manifest();
        value
            .as_object_mut()
            .unwrap()
            .insert("pluginName".into(), json!("  "));
        let manifest: ExtensionManifest = serde_json::from_value(value).unwrap();
        assert!(matches!(
            manifest.validate(),
            Err(ExtensionError::ManifestInvalid { .. })
        ));
    }
}
