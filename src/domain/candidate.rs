//! Upgrade candidates

use super::{
    classify_risk_group, DependencyType, Evidence, RiskGroup, VersionSpec, VersionWindow,
};
use serde::{Deserialize, Serialize};

/// One package's proposed upgrade within one manifest file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Manifest path relative to the project root (POSIX separators)
    pub package_file: String,
    /// Dependency map the package was declared in
    pub dependency_type: DependencyType,
    /// Package name
    pub package_name: String,
    /// Declared range and installed version
    pub current: VersionSpec,
    /// Suggested range and resolved target version
    pub target: VersionSpec,
}

impl Candidate {
    /// Creates a new Candidate
    pub fn new(
        package_file: impl Into<String>,
        dependency_type: DependencyType,
        package_name: impl Into<String>,
        current: VersionSpec,
        target: VersionSpec,
    ) -> Self {
        Self {
            package_file: package_file.into(),
            dependency_type,
            package_name: package_name.into(),
            current,
            target,
        }
    }

    /// Classify the upgrade from installed to target version
    pub fn risk_group(&self) -> RiskGroup {
        classify_risk_group(self.current.version.as_deref(), self.target.version.as_deref())
    }

    /// Sort key giving the report order: file, dependency type, package name
    pub fn sort_key(&self) -> (&str, DependencyType, &str) {
        (&self.package_file, self.dependency_type, &self.package_name)
    }
}

/// A candidate with its version window and evidence attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub version_window: VersionWindow,
    pub evidence: Option<Evidence>,
}

impl EnrichedCandidate {
    /// Wrap a candidate without any evidence
    pub fn bare(candidate: Candidate) -> Self {
        Self {
            candidate,
            version_window: VersionWindow::default(),
            evidence: None,
        }
    }
}
