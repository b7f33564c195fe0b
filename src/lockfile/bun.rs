//! Bun `bun.lock` index
//!
//! The text lockfile is JSON with trailing commas. Each `packages` entry is
//! an array whose first element is `<name>@<version>`.

use super::{normalize_installed_version, InstalledVersionLookup};
use crate::error::LockfileError;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

static TRAILING_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",(\s*[\]}])").unwrap());

/// Index over a `bun.lock`
#[derive(Debug, Default, Clone)]
pub struct BunLockfileIndex {
    packages: HashMap<String, String>,
}

impl BunLockfileIndex {
    /// Parse a bun.lock
    pub fn parse(content: &str, path: &Path) -> Result<Self, LockfileError> {
        let json = strip_trailing_commas(content);
        let value: Value = serde_json::from_str(&json)
            .map_err(|e| LockfileError::parse_error(path, e.to_string()))?;

        let packages = value
            .get("packages")
            .and_then(|v| v.as_object())
            .ok_or_else(|| LockfileError::unexpected_shape(path, "missing packages object"))?;

        let mut index = Self::default();
        for (name, entry) in packages {
            let Some(ident) = entry
                .as_array()
                .and_then(|items| items.first())
                .and_then(|first| first.as_str())
            else {
                continue;
            };
            if let Some(version) = version_from_ident(ident) {
                index.packages.insert(name.clone(), version);
            }
        }

        Ok(index)
    }
}

impl InstalledVersionLookup for BunLockfileIndex {
    fn installed_version(&self, _: &str, package_name: &str, _: &str) -> Option<String> {
        self.packages.get(package_name).cloned()
    }
}

fn strip_trailing_commas(content: &str) -> String {
    TRAILING_COMMA.replace_all(content, "$1").into_owned()
}

/// `lodash@4.17.21` -> `4.17.21`; any `+metadata` suffix is dropped
fn version_from_ident(ident: &str) -> Option<String> {
    let (_, version) = ident.rsplit_once('@')?;
    let version = version.split('+').next().unwrap_or(version);
    let version = normalize_installed_version(version);
    if version.is_empty() {
        None
    } else {
        Some(version)
    }
}
