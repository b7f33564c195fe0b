//! Upgrade suggestions from the external resolution engine
//!
//! The engine returns either a flat `{name: range}` mapping for a single
//! manifest or a nested `{packageFile: {name: range}}` mapping when scanning
//! workspaces. Raw output is validated once here into `SuggestionResult`;
//! everything downstream works on the typed form.

mod command;
mod file;

pub use command::{CommandSuggestionSource, DEFAULT_NCU_COMMAND};
pub use file::FileSuggestionSource;

use crate::domain::{parse_version, DepFilter, Scope, Target};
use crate::error::SuggestionError;
use crate::manifest::MANIFEST_FILENAME;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Component, Path, PathBuf};

/// Validated suggestion mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SuggestionResult {
    /// `{packageName: suggestedRange}` for the root manifest
    Flat(BTreeMap<String, String>),
    /// `{packageFile: {packageName: suggestedRange}}`
    Workspaced(BTreeMap<String, BTreeMap<String, String>>),
}

impl SuggestionResult {
    /// Validate raw engine output.
    ///
    /// Any top-level value that is an object makes the mapping nested; every
    /// top-level value must then be an object. Ranges must be strings.
    pub fn from_value(value: Value) -> Result<Self, SuggestionError> {
        let Value::Object(top) = value else {
            return Err(SuggestionError::invalid_shape("expected a JSON object"));
        };

        if !top.values().any(|v| v.is_object()) {
            let mut flat = BTreeMap::new();
            for (package, range) in top {
                let range = as_range(range, MANIFEST_FILENAME, &package)?;
                flat.insert(package, range);
            }
            return Ok(SuggestionResult::Flat(flat));
        }

        let mut nested = BTreeMap::new();
        for (package_file, packages) in top {
            let Value::Object(packages) = packages else {
                return Err(SuggestionError::invalid_shape(format!(
                    "expected an object of ranges for '{}'",
                    package_file
                )));
            };
            let mut ranges = BTreeMap::new();
            for (package, range) in packages {
                let range = as_range(range, &package_file, &package)?;
                ranges.insert(package, range);
            }
            nested.insert(package_file, ranges);
        }
        Ok(SuggestionResult::Workspaced(nested))
    }

    /// Flatten into `(packageFile, packageName, suggestedRange)` triples.
    /// Flat mappings belong to the root manifest.
    pub fn entries(&self) -> Vec<(String, String, String)> {
        match self {
            SuggestionResult::Flat(ranges) => ranges
                .iter()
                .map(|(name, range)| (MANIFEST_FILENAME.to_string(), name.clone(), range.clone()))
                .collect(),
            SuggestionResult::Workspaced(files) => files
                .iter()
                .flat_map(|(file, ranges)| {
                    ranges
                        .iter()
                        .map(move |(name, range)| (file.clone(), name.clone(), range.clone()))
                })
                .collect(),
        }
    }

    /// Rewrite nested manifest keys as POSIX paths relative to `root`
    pub fn relative_to(self, root: &Path) -> Self {
        match self {
            SuggestionResult::Workspaced(files) => SuggestionResult::Workspaced(
                files
                    .into_iter()
                    .map(|(file, ranges)| (normalize_package_file(&file, root), ranges))
                    .collect(),
            ),
            flat => flat,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SuggestionResult::Flat(ranges) => ranges.is_empty(),
            SuggestionResult::Workspaced(files) => files.values().all(|r| r.is_empty()),
        }
    }
}

fn as_range(value: Value, package_file: &str, package: &str) -> Result<String, SuggestionError> {
    match value {
        Value::String(range) => Ok(range),
        _ => Err(SuggestionError::NonStringRange {
            package_file: package_file.to_string(),
            package: package.to_string(),
        }),
    }
}

/// Engine output plus the concrete target versions it resolved
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuggestionOutput {
    pub result: Option<SuggestionResult>,
    /// (packageFile, packageName) -> concrete target of that entry's range
    pub resolved_targets: HashMap<(String, String), String>,
    /// package name -> concrete target reported without a manifest,
    /// consulted only when the entry itself resolves to nothing
    pub resolved_by_name: HashMap<String, String>,
}

impl SuggestionOutput {
    /// Build output whose resolved targets are derived from each suggested range
    pub fn from_result(result: SuggestionResult) -> Self {
        let resolved_targets = result
            .entries()
            .into_iter()
            .filter_map(|(file, name, range)| {
                concrete_version_of_range(&range).map(|version| ((file, name), version))
            })
            .collect();
        Self {
            result: Some(result),
            resolved_targets,
            resolved_by_name: HashMap::new(),
        }
    }

    /// Concrete target version for a package within one manifest
    pub fn resolved_target(&self, package_file: &str, package_name: &str) -> Option<String> {
        self.resolved_targets
            .get(&(package_file.to_string(), package_name.to_string()))
            .or_else(|| self.resolved_by_name.get(package_name))
            .cloned()
    }

    /// Rewrite manifest keys of the result and its resolved targets relative to `root`
    pub fn relative_to(self, root: &Path) -> Self {
        Self {
            result: self.result.map(|r| r.relative_to(root)),
            resolved_targets: self
                .resolved_targets
                .into_iter()
                .map(|((file, name), version)| {
                    ((normalize_package_file(&file, root), name), version)
                })
                .collect(),
            resolved_by_name: self.resolved_by_name,
        }
    }
}

/// Concrete version named by a simple range such as `^5.0.0`, `~1.2.3` or `>=2.1.0`
pub fn concrete_version_of_range(range: &str) -> Option<String> {
    let trimmed = range
        .trim()
        .trim_start_matches(['^', '~', '>', '<', '=', ' ']);
    parse_version(trimmed).map(|v| v.to_string())
}

/// Normalise a manifest key to a POSIX path relative to `root`.
///
/// Absolute keys under `root` (or under its canonical form) are made
/// relative, backslashes become slashes and `.` segments are dropped.
/// Absolute keys outside `root` stay absolute.
pub fn normalize_package_file(key: &str, root: &Path) -> String {
    let unified = key.replace('\\', "/");
    let path = Path::new(&unified);
    let canonical_root = match path.strip_prefix(root) {
        Err(_) if path.is_absolute() => root.canonicalize().ok(),
        _ => None,
    };
    let relative = path
        .strip_prefix(root)
        .ok()
        .or_else(|| {
            canonical_root
                .as_deref()
                .and_then(|r| path.strip_prefix(r).ok())
        })
        .unwrap_or(path);

    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        MANIFEST_FILENAME.to_string()
    } else if relative.has_root() {
        format!("/{}", parts.join("/"))
    } else {
        parts.join("/")
    }
}

/// What the suggestion engine is asked for
#[derive(Debug, Clone)]
pub struct SuggestionRequest {
    /// Project root
    pub root: PathBuf,
    /// Effective scope (never `Auto`)
    pub scope: Scope,
    pub target: Target,
    pub dep: DepFilter,
}

/// Source of upgrade suggestions
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Produce suggestions for the project described by `request`
    async fn suggest(&self, request: &SuggestionRequest)
        -> Result<SuggestionOutput, SuggestionError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_mapping() {
        let result = SuggestionResult::from_value(json!({
            "lodash": "^4.17.21",
            "react": "^18.3.0"
        }))
        .unwrap();

        assert!(matches!(result, SuggestionResult::Flat(_)));
        assert_eq!(
            result.entries(),
            vec![
                (
                    "package.json".to_string(),
                    "lodash".to_string(),
                    "^4.17.21".to_string()
                ),
                (
                    "package.json".to_string(),
                    "react".to_string(),
                    "^18.3.0".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_nested_mapping() {
        let result = SuggestionResult::from_value(json!({
            "package.json": { "lodash": "^4.17.21" },
            "packages/a/package.json": { "vitest": "^1.6.0" }
        }))
        .unwrap();

        assert!(matches!(result, SuggestionResult::Workspaced(_)));
        let entries = result.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].0, "packages/a/package.json");
        assert_eq!(entries[1].1, "vitest");
    }

    #[test]
    fn test_empty_object_is_flat_and_empty() {
        let result = SuggestionResult::from_value(json!({})).unwrap();
        assert_eq!(result, SuggestionResult::Flat(BTreeMap::new()));
        assert!(result.is_empty());
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(matches!(
            SuggestionResult::from_value(json!(["lodash"])),
            Err(SuggestionError::InvalidShape { .. })
        ));
        assert!(SuggestionResult::from_value(json!(null)).is_err());
    }

    #[test]
    fn test_non_string_range_is_rejected() {
        let err = SuggestionResult::from_value(json!({"lodash": 4})).unwrap_err();
        assert!(matches!(err, SuggestionError::NonStringRange { .. }));

        let err = SuggestionResult::from_value(json!({
            "package.json": {"lodash": true}
        }))
        .unwrap_err();
        assert!(matches!(err, SuggestionError::NonStringRange { .. }));
    }

    #[test]
    fn test_mixed_shape_is_rejected() {
        let err = SuggestionResult::from_value(json!({
            "package.json": {"lodash": "^4.0.0"},
            "react": "^18.0.0"
        }))
        .unwrap_err();
        assert!(matches!(err, SuggestionError::InvalidShape { .. }));
    }

    #[test]
    fn test_normalize_package_file() {
        let root = Path::new("/work/project");
        assert_eq!(normalize_package_file("package.json", root), "package.json");
        assert_eq!(
            normalize_package_file("./packages/a/package.json", root),
            "packages/a/package.json"
        );
        assert_eq!(
            normalize_package_file("/work/project/packages/b/package.json", root),
            "packages/b/package.json"
        );
        assert_eq!(
            normalize_package_file("packages\\c\\package.json", root),
            "packages/c/package.json"
        );
    }

    #[test]
    fn test_concrete_version_of_range() {
        assert_eq!(concrete_version_of_range("^5.0.0"), Some("5.0.0".to_string()));
        assert_eq!(concrete_version_of_range("~1.2.3"), Some("1.2.3".to_string()));
        assert_eq!(concrete_version_of_range(">=2.1.0"), Some("2.1.0".to_string()));
        assert_eq!(concrete_version_of_range("3.0.0-rc.1"), Some("3.0.0-rc.1".to_string()));
        assert_eq!(concrete_version_of_range("^5"), None);
        assert_eq!(concrete_version_of_range(">=1.0.0 <2.0.0"), None);
        assert_eq!(concrete_version_of_range("latest"), None);
    }

    #[test]
    fn test_normalize_package_file_with_non_canonical_root() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("sub")).unwrap();
        let root = dir.path().join("sub").join("..");
        let key = dir
            .path()
            .canonicalize()
            .unwrap()
            .join("packages/a/package.json");

        assert_eq!(
            normalize_package_file(&key.display().to_string(), &root),
            "packages/a/package.json"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_normalize_package_file_outside_root_stays_absolute() {
        let root = Path::new("/work/project");
        assert_eq!(
            normalize_package_file("/elsewhere/package.json", root),
            "/elsewhere/package.json"
        );
    }

    #[test]
    fn test_output_from_result_resolves_targets() {
        let result = SuggestionResult::from_value(json!({
            "lodash": "^4.17.21",
            "weird": "latest"
        }))
        .unwrap();
        let output = SuggestionOutput::from_result(result);
        assert_eq!(
            output.resolved_target("package.json", "lodash"),
            Some("4.17.21".to_string())
        );
        assert_eq!(output.resolved_target("package.json", "weird"), None);
    }

    #[test]
    fn test_resolved_targets_are_per_manifest() {
        let result = SuggestionResult::from_value(json!({
            "package.json": { "lodash": "^4.17.21" },
            "packages/a/package.json": { "lodash": "^3.10.1" }
        }))
        .unwrap();
        let output = SuggestionOutput::from_result(result);
        assert_eq!(
            output.resolved_target("package.json", "lodash"),
            Some("4.17.21".to_string())
        );
        assert_eq!(
            output.resolved_target("packages/a/package.json", "lodash"),
            Some("3.10.1".to_string())
        );
    }

    #[test]
    fn test_name_only_targets_fill_gaps() {
        let result = SuggestionResult::from_value(json!({
            "lodash": "^4.17.21",
            "react": "^18"
        }))
        .unwrap();
        let mut output = SuggestionOutput::from_result(result);
        output.resolved_by_name = HashMap::from([
            ("lodash".to_string(), "4.0.0".to_string()),
            ("react".to_string(), "18.3.1".to_string()),
        ]);

        assert_eq!(
            output.resolved_target("package.json", "lodash"),
            Some("4.17.21".to_string())
        );
        assert_eq!(
            output.resolved_target("package.json", "react"),
            Some("18.3.1".to_string())
        );
    }

    #[test]
    fn test_output_relative_to_rekeys_targets() {
        let result = SuggestionResult::from_value(json!({
            "/work/project/packages/a/package.json": { "vitest": "^1.6.0" }
        }))
        .unwrap();
        let output = SuggestionOutput::from_result(result).relative_to(Path::new("/work/project"));

        assert_eq!(
            output.resolved_target("packages/a/package.json", "vitest"),
            Some("1.6.0".to_string())
        );
        match output.result {
            Some(SuggestionResult::Workspaced(files)) => {
                assert!(files.contains_key("packages/a/package.json"))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
