//! Grouped report structure
//!
//! `packages` is keyed by manifest path, then dependency type, then package
//! name. `BTreeMap` ordering gives the display order directly.

use super::{DependencyType, Evidence, ReportOptions, RiskGroup, VersionSpec, VersionWindow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// packageFile -> dependencyType -> packageName -> details
pub type ReportPackages =
    BTreeMap<String, BTreeMap<DependencyType, BTreeMap<String, PackageDetails>>>;

/// Per-package entry of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDetails {
    pub current: VersionSpec,
    pub target: VersionSpec,
    pub risk_group: RiskGroup,
    pub version_window: VersionWindow,
    pub evidence: Option<Evidence>,
}

/// The full report of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub options: ReportOptions,
    pub packages: ReportPackages,
}

impl Report {
    /// Total number of packages across all manifests
    pub fn package_count(&self) -> usize {
        self.packages
            .values()
            .flat_map(|by_type| by_type.values())
            .map(|by_name| by_name.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.package_count() == 0
    }
}
