//! Yarn `yarn.lock` index (classic v1 and Berry v2+)
//!
//! Both formats key each block by a comma-separated list of descriptors
//! (`name@range`) that resolved to one version. Berry lockfiles are YAML and
//! carry a `__metadata` block; classic lockfiles use their own
//! indentation-based syntax and are read with a small line state machine.

use super::{normalize_installed_version, InstalledVersionLookup};
use crate::error::LockfileError;
use serde_yaml::Value;
use std::collections::HashMap;
use std::path::Path;

const BERRY_METADATA_KEY: &str = "__metadata";

/// A descriptor range and the version it resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
struct Resolution {
    range: String,
    version: String,
}

/// Index over a `yarn.lock`
#[derive(Debug, Default, Clone)]
pub struct YarnLockfileIndex {
    /// package name -> resolutions in lockfile order
    entries: HashMap<String, Vec<Resolution>>,
}

impl YarnLockfileIndex {
    /// Parse a yarn.lock, detecting the format from its content
    pub fn parse(content: &str, path: &Path) -> Result<Self, LockfileError> {
        if content.contains("__metadata:") {
            Self::parse_berry(content, path)
        } else {
            Ok(Self::parse_classic(content))
        }
    }

    /// Parse a Berry (v2+) lockfile
    pub fn parse_berry(content: &str, path: &Path) -> Result<Self, LockfileError> {
        let yaml: Value = serde_yaml::from_str(content)
            .map_err(|e| LockfileError::parse_error(path, e.to_string()))?;

        let root = yaml
            .as_mapping()
            .ok_or_else(|| LockfileError::unexpected_shape(path, "root is not a mapping"))?;

        let mut index = Self::default();
        for (key, block) in root {
            let Some(key) = key.as_str() else {
                continue;
            };
            if key == BERRY_METADATA_KEY {
                continue;
            }
            let version = match block.get("version") {
                Some(Value::String(v)) => v.clone(),
                Some(Value::Number(v)) => v.to_string(),
                _ => continue,
            };
            index.add_block(key, &version);
        }

        Ok(index)
    }

    /// Parse a classic (v1) lockfile. Never fails: unrecognised lines are skipped.
    pub fn parse_classic(content: &str) -> Self {
        let mut index = Self::default();
        let mut state = ClassicState::SeekingKey;

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let indented = line.starts_with(' ') || line.starts_with('\t');

            if !indented {
                state = match trimmed.strip_suffix(':') {
                    Some(key) => ClassicState::InBlock {
                        key: key.to_string(),
                        recorded: false,
                    },
                    None => ClassicState::SeekingKey,
                };
                continue;
            }

            if let ClassicState::InBlock { key, recorded } = &mut state {
                if *recorded {
                    continue;
                }
                if let Some(version) = classic_version_value(trimmed) {
                    index.add_block(key, &version);
                    *recorded = true;
                }
            }
        }

        index
    }

    fn add_block(&mut self, key: &str, version: &str) {
        let version = normalize_installed_version(version);
        for descriptor in split_descriptors(key) {
            if let Some((name, range)) = parse_descriptor(&descriptor) {
                self.entries
                    .entry(name.to_string())
                    .or_default()
                    .push(Resolution {
                        range: range.to_string(),
                        version: version.clone(),
                    });
            }
        }
    }
}

impl InstalledVersionLookup for YarnLockfileIndex {
    fn installed_version(
        &self,
        _: &str,
        package_name: &str,
        current_range: &str,
    ) -> Option<String> {
        let resolutions = self.entries.get(package_name)?;

        let protocol_suffix = format!(":{}", current_range);
        resolutions
            .iter()
            .find(|r| {
                r.range == current_range
                    || (!current_range.is_empty() && r.range.ends_with(&protocol_suffix))
            })
            .map(|r| r.version.clone())
    }
}

/// Line state machine for classic lockfiles
enum ClassicState {
    /// Outside any block
    SeekingKey,
    /// Inside the block introduced by `key`
    InBlock { key: String, recorded: bool },
}

/// Value of a `version "x.y.z"` (or `version x.y.z`) line
fn classic_version_value(line: &str) -> Option<String> {
    let rest = line.strip_prefix("version")?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let value = rest.trim().trim_matches('"');
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Split a block key into descriptors, respecting double-quoted entries that
/// may themselves contain commas. Quotes are removed.
pub fn split_descriptors(key: &str) -> Vec<String> {
    let mut descriptors = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in key.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                push_descriptor(&mut descriptors, &current);
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    push_descriptor(&mut descriptors, &current);

    descriptors
}

fn push_descriptor(descriptors: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        descriptors.push(trimmed.to_string());
    }
}

/// Split `name@range` at the last `@`. Scoped names keep their leading `@`.
fn parse_descriptor(descriptor: &str) -> Option<(&str, &str)> {
    let idx = descriptor.rfind('@')?;
    if idx == 0 {
        return None;
    }
    Some((&descriptor[..idx], &descriptor[idx + 1..]))
}
