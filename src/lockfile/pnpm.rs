//! pnpm `pnpm-lock.yaml` index
//!
//! pnpm records each workspace package under `importers`, keyed by the
//! directory of its manifest relative to the lockfile (`.` for the root).
//! Lockfiles written before workspaces existed keep the root's maps at the
//! top level instead.

use super::{normalize_installed_version, InstalledVersionLookup};
use crate::error::LockfileError;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::path::Path;

const ROOT_IMPORTER: &str = ".";

/// Dependency maps searched in an importer, in priority order
const DEPENDENCY_SECTIONS: &[&str] = &[
    "dependencies",
    "devDependencies",
    "optionalDependencies",
    "peerDependencies",
];

/// Index over a `pnpm-lock.yaml`
#[derive(Debug, Default, Clone)]
pub struct PnpmLockfileIndex {
    /// importer key -> package name -> installed version
    importers: HashMap<String, HashMap<String, String>>,
}

impl PnpmLockfileIndex {
    /// Parse a pnpm-lock.yaml
    pub fn parse(content: &str, path: &Path) -> Result<Self, LockfileError> {
        let yaml: Value = serde_yaml::from_str(content)
            .map_err(|e| LockfileError::parse_error(path, e.to_string()))?;

        let root = yaml
            .as_mapping()
            .ok_or_else(|| LockfileError::unexpected_shape(path, "root is not a mapping"))?;

        let mut index = Self::default();

        match root.get("importers") {
            Some(Value::Mapping(importers)) => {
                for (key, importer) in importers {
                    let (Some(key), Some(importer)) = (key.as_str(), importer.as_mapping()) else {
                        continue;
                    };
                    index
                        .importers
                        .insert(normalize_importer_key(key), collect_importer(importer));
                }
            }
            Some(_) => {
                return Err(LockfileError::unexpected_shape(
                    path,
                    "importers is not a mapping",
                ))
            }
            None => {
                index
                    .importers
                    .insert(ROOT_IMPORTER.to_string(), collect_importer(root));
            }
        }

        Ok(index)
    }
}

impl InstalledVersionLookup for PnpmLockfileIndex {
    fn installed_version(&self, package_file: &str, package_name: &str, _: &str) -> Option<String> {
        self.importers
            .get(&importer_key(package_file))?
            .get(package_name)
            .cloned()
    }
}

/// Importer key for a manifest path: `.` for the root, otherwise the
/// POSIX-normalized directory containing the manifest
pub fn importer_key(package_file: &str) -> String {
    let posix = package_file.replace('\\', "/");
    let dir = match posix.rfind('/') {
        Some(idx) => &posix[..idx],
        None => "",
    };
    normalize_importer_key(dir)
}

fn normalize_importer_key(key: &str) -> String {
    let key = key.replace('\\', "/");
    let mut key = key.as_str();
    while let Some(rest) = key.strip_prefix("./") {
        key = rest;
    }
    let key = key.trim_end_matches('/');
    if key.is_empty() || key == ROOT_IMPORTER {
        ROOT_IMPORTER.to_string()
    } else {
        key.to_string()
    }
}

fn collect_importer(importer: &Mapping) -> HashMap<String, String> {
    let mut versions = HashMap::new();

    for section in DEPENDENCY_SECTIONS {
        let Some(deps) = importer.get(*section).and_then(|v| v.as_mapping()) else {
            continue;
        };
        for (name, entry) in deps {
            let Some(name) = name.as_str() else {
                continue;
            };
            if versions.contains_key(name) {
                continue;
            }
            if let Some(version) = entry_version(entry) {
                versions.insert(name.to_string(), normalize_installed_version(&version));
            }
        }
    }

    versions
}

/// Entries are a bare version (lockfile v5/v6 root maps) or `{specifier, version}`
fn entry_version(entry: &Value) -> Option<String> {
    match entry {
        Value::String(version) => Some(version.clone()),
        Value::Number(version) => Some(version.to_string()),
        Value::Mapping(map) => match map.get("version")? {
            Value::String(version) => Some(version.clone()),
            Value::Number(version) => Some(version.to_string()),
            _ => None,
        },
        _ => None,
    }
}
