//! Turns suggestions into sorted upgrade candidates
//!
//! For every suggested `(packageFile, packageName, range)`:
//! - the manifest decides the dependency type and declared range
//! - the lockfile lookup supplies the installed version
//! - the suggestion side channel supplies the concrete target version

use crate::domain::{Candidate, VersionSpec};
use crate::error::ManifestError;
use crate::lockfile::InstalledVersionLookup;
use crate::manifest::PackageJson;
use crate::suggestion::SuggestionOutput;
use std::collections::HashMap;
use std::path::Path;

/// Build candidates from suggestion output.
///
/// Manifests are read once each; an unreadable or non-object manifest is fatal.
/// The result is sorted by file, dependency type and package name.
pub fn assemble_candidates(
    root: &Path,
    output: &SuggestionOutput,
    lookup: &dyn InstalledVersionLookup,
) -> Result<Vec<Candidate>, ManifestError> {
    let Some(result) = &output.result else {
        return Ok(Vec::new());
    };

    let mut manifests: HashMap<String, PackageJson> = HashMap::new();
    let mut candidates = Vec::new();

    for (package_file, package_name, suggested_range) in result.entries() {
        if !manifests.contains_key(&package_file) {
            let manifest = PackageJson::read(&root.join(&package_file))?;
            manifests.insert(package_file.clone(), manifest);
        }
        let Some(manifest) = manifests.get(&package_file) else {
            continue;
        };

        let (dependency_type, current_range) = manifest.declared(&package_name);
        let installed = lookup.installed_version(&package_file, &package_name, &current_range);
        let resolved = output.resolved_target(&package_file, &package_name);

        candidates.push(Candidate::new(
            package_file,
            dependency_type,
            package_name,
            VersionSpec::new(current_range, installed),
            VersionSpec::new(suggested_range, resolved),
        ));
    }

    candidates.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    tracing::debug!(count = candidates.len(), "assembled candidates");
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DependencyType;
    use crate::lockfile::{NoLockfile, NpmLockfileIndex};
    use crate::suggestion::SuggestionResult;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn workspace() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{
                "name": "root",
                "workspaces": ["packages/*"],
                "dependencies": { "lodash": "^4.17.0" },
                "devDependencies": { "typescript": "^5.0.0" }
            }"#,
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("packages/a")).unwrap();
        fs::write(
            dir.path().join("packages/a/package.json"),
            r#"{ "name": "a", "devDependencies": { "vitest": "^1.0.0" } }"#,
        )
        .unwrap();
        dir
    }

    fn output(value: serde_json::Value) -> SuggestionOutput {
        SuggestionOutput::from_result(SuggestionResult::from_value(value).unwrap())
    }

    #[test]
    fn test_flat_suggestions_use_root_manifest() {
        let dir = workspace();
        let output = output(json!({ "typescript": "^5.5.0", "lodash": "^4.17.21" }));

        let candidates = assemble_candidates(dir.path(), &output, &NoLockfile).unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].package_name, "lodash");
        assert_eq!(candidates[0].dependency_type, DependencyType::Dependencies);
        assert_eq!(candidates[0].current.range, "^4.17.0");
        assert_eq!(candidates[0].target.version.as_deref(), Some("4.17.21"));
        assert_eq!(candidates[1].package_name, "typescript");
        assert_eq!(candidates[1].dependency_type, DependencyType::DevDependencies);
    }

    #[test]
    fn test_nested_suggestions_are_sorted() {
        let dir = workspace();
        let output = output(json!({
            "packages/a/package.json": { "vitest": "^1.6.0" },
            "package.json": { "typescript": "^5.5.0", "lodash": "^4.17.21" }
        }));

        let candidates = assemble_candidates(dir.path(), &output, &NoLockfile).unwrap();
        let keys: Vec<_> = candidates
            .iter()
            .map(|c| (c.package_file.as_str(), c.package_name.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("package.json", "lodash"),
                ("package.json", "typescript"),
                ("packages/a/package.json", "vitest"),
            ]
        );
    }

    #[test]
    fn test_same_package_resolves_per_manifest() {
        let dir = workspace();
        fs::write(
            dir.path().join("packages/a/package.json"),
            r#"{ "name": "a", "dependencies": { "lodash": "^3.0.0" } }"#,
        )
        .unwrap();
        let output = output(json!({
            "package.json": { "lodash": "^4.17.21" },
            "packages/a/package.json": { "lodash": "^3.10.1" }
        }));

        let candidates = assemble_candidates(dir.path(), &output, &NoLockfile).unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].package_file, "package.json");
        assert_eq!(candidates[0].target.version.as_deref(), Some("4.17.21"));
        assert_eq!(candidates[1].package_file, "packages/a/package.json");
        assert_eq!(candidates[1].target.range, "^3.10.1");
        assert_eq!(candidates[1].target.version.as_deref(), Some("3.10.1"));
    }

    #[test]
    fn test_undeclared_package_is_unknown() {
        let dir = workspace();
        let output = output(json!({ "left-pad": "^1.3.0" }));

        let candidates = assemble_candidates(dir.path(), &output, &NoLockfile).unwrap();
        assert_eq!(candidates[0].dependency_type, DependencyType::Unknown);
        assert_eq!(candidates[0].current.range, "");
        assert_eq!(candidates[0].current.version, None);
    }

    #[test]
    fn test_installed_version_comes_from_lockfile() {
        let dir = workspace();
        let lock = NpmLockfileIndex::parse(
            r#"{"packages": {"node_modules/lodash": {"version": "4.17.21"}}}"#,
            Path::new("package-lock.json"),
        )
        .unwrap();
        let output = output(json!({ "lodash": "^4.17.21" }));

        let candidates = assemble_candidates(dir.path(), &output, &lock).unwrap();
        assert_eq!(candidates[0].current.version.as_deref(), Some("4.17.21"));
    }

    #[test]
    fn test_missing_manifest_is_fatal() {
        let dir = workspace();
        let output = output(json!({ "packages/missing/package.json": { "x": "^1.0.0" } }));

        let err = assemble_candidates(dir.path(), &output, &NoLockfile).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound { .. }));
    }

    #[test]
    fn test_non_object_manifest_is_fatal() {
        let dir = workspace();
        fs::write(dir.path().join("packages/a/package.json"), "[]").unwrap();
        let output = output(json!({ "packages/a/package.json": { "vitest": "^1.6.0" } }));

        let err = assemble_candidates(dir.path(), &output, &NoLockfile).unwrap_err();
        assert!(matches!(err, ManifestError::NotAnObject { .. }));
    }

    #[test]
    fn test_no_result_yields_no_candidates() {
        let dir = workspace();
        let candidates =
            assemble_candidates(dir.path(), &SuggestionOutput::default(), &NoLockfile).unwrap();
        assert!(candidates.is_empty());
    }
}
