//! npm `package-lock.json` index
//!
//! Lockfile v2/v3 record installed packages under `packages["node_modules/<name>"]`;
//! v1 records them under `dependencies[<name>]`. npm hoists into one tree,
//! so the manifest path and declared range are not needed for lookup.

use super::{normalize_installed_version, InstalledVersionLookup};
use crate::error::LockfileError;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

const NODE_MODULES_PREFIX: &str = "node_modules/";

/// Index over a `package-lock.json`
#[derive(Debug, Default, Clone)]
pub struct NpmLockfileIndex {
    /// From the `packages` section (top-level node_modules only)
    packages: HashMap<String, String>,
    /// From the legacy `dependencies` section
    dependencies: HashMap<String, String>,
}

impl NpmLockfileIndex {
    /// Parse a package-lock.json
    pub fn parse(content: &str, path: &Path) -> Result<Self, LockfileError> {
        let json: Value = serde_json::from_str(content)
            .map_err(|e| LockfileError::parse_error(path, e.to_string()))?;

        let root = json
            .as_object()
            .ok_or_else(|| LockfileError::unexpected_shape(path, "root is not an object"))?;

        let mut index = Self::default();

        if let Some(packages) = root.get("packages").and_then(|v| v.as_object()) {
            for (key, entry) in packages {
                let Some(name) = key.strip_prefix(NODE_MODULES_PREFIX) else {
                    continue;
                };
                // Nested installs (a/node_modules/b) are not what the manifest resolves to
                if name.contains("/node_modules/") {
                    continue;
                }
                if let Some(version) = entry.get("version").and_then(|v| v.as_str()) {
                    index
                        .packages
                        .insert(name.to_string(), normalize_installed_version(version));
                }
            }
        }

        if let Some(dependencies) = root.get("dependencies").and_then(|v| v.as_object()) {
            for (name, entry) in dependencies {
                if let Some(version) = entry.get("version").and_then(|v| v.as_str()) {
                    index
                        .dependencies
                        .insert(name.clone(), normalize_installed_version(version));
                }
            }
        }

        Ok(index)
    }
}

impl InstalledVersionLookup for NpmLockfileIndex {
    fn installed_version(&self, _: &str, package_name: &str, _: &str) -> Option<String> {
        self.packages
            .get(package_name)
            .or_else(|| self.dependencies.get(package_name))
            .cloned()
    }
}
