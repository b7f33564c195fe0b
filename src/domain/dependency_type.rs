//! Dependency type of a candidate within its manifest

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which dependency map of a manifest a package was declared in
///
/// Variant order is the display order of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyType {
    /// `dependencies`
    Dependencies,
    /// `devDependencies`
    DevDependencies,
    /// Absent from both maps
    Unknown,
}

impl DependencyType {
    /// Returns the manifest key for this dependency type
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyType::Dependencies => "dependencies",
            DependencyType::DevDependencies => "devDependencies",
            DependencyType::Unknown => "unknown",
        }
    }

    /// Returns all dependency types in display order
    pub fn all() -> &'static [DependencyType] {
        &[
            DependencyType::Dependencies,
            DependencyType::DevDependencies,
            DependencyType::Unknown,
        ]
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, DependencyType::DevDependencies)
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
