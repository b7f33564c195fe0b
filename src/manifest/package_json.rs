//! package.json reader
//!
//! Only the `dependencies`, `devDependencies` and `workspaces` fields are
//! consulted. The file is never written.

use crate::domain::DependencyType;
use crate::error::ManifestError;
use serde_json::{Map, Value};
use std::path::Path;

/// A parsed package.json
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageJson {
    fields: Map<String, Value>,
}

impl PackageJson {
    /// Read and parse a package.json. Fails when the file is missing,
    /// unreadable, not JSON, or not a JSON object.
    pub fn read(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ManifestError::not_found(path)
            } else {
                ManifestError::read_error(path, e)
            }
        })?;
        Self::parse(&content, path)
    }

    /// Parse package.json content
    pub fn parse(content: &str, path: &Path) -> Result<Self, ManifestError> {
        let json: Value = serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))?;

        match json {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(ManifestError::NotAnObject {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Where `name` is declared and with which range.
    ///
    /// `dependencies` is checked before `devDependencies`. Packages declared
    /// in neither are `Unknown` with an empty range.
    pub fn declared(&self, name: &str) -> (DependencyType, String) {
        for dependency_type in [
            DependencyType::Dependencies,
            DependencyType::DevDependencies,
        ] {
            if let Some(range) = self
                .fields
                .get(dependency_type.as_str())
                .and_then(|deps| deps.get(name))
                .and_then(|v| v.as_str())
            {
                return (dependency_type, range.to_string());
            }
        }
        (DependencyType::Unknown, String::new())
    }

    /// Whether the manifest declares workspaces, either as an array of
    /// globs or as `{ "packages": [...] }`
    pub fn declares_workspaces(&self) -> bool {
        match self.fields.get("workspaces") {
            Some(Value::Array(globs)) => !globs.is_empty(),
            Some(Value::Object(obj)) => obj
                .get("packages")
                .and_then(|p| p.as_array())
                .is_some_and(|globs| !globs.is_empty()),
            _ => false,
        }
    }

    /// Package name, if any
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(|v| v.as_str())
    }
}
