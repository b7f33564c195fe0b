//! Report options: scope, target, dependency and risk filters
//!
//! These are chosen on the command line and echoed into the report.

use super::{DependencyType, RiskGroup};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which manifests the suggestion engine scans
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Workspaces when the root manifest declares them, root otherwise
    #[default]
    Auto,
    /// Root package.json only
    Root,
    /// Root and every workspace package.json
    Workspaces,
}

/// Upgrade target forwarded to the suggestion engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Latest,
    Newest,
    Greatest,
    Minor,
    Patch,
}

/// Dependency type filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DepFilter {
    #[default]
    All,
    /// `dependencies` only
    Prod,
    /// `devDependencies` only
    Dev,
}

/// Risk group filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RiskFilter {
    #[default]
    All,
    MajorOnly,
    NonMajor,
    PrereleaseOnly,
    UnknownOnly,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Auto => "auto",
            Scope::Root => "root",
            Scope::Workspaces => "workspaces",
        }
    }
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Latest => "latest",
            Target::Newest => "newest",
            Target::Greatest => "greatest",
            Target::Minor => "minor",
            Target::Patch => "patch",
        }
    }
}

impl DepFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepFilter::All => "all",
            DepFilter::Prod => "prod",
            DepFilter::Dev => "dev",
        }
    }

    /// Check if a dependency type passes the filter
    pub fn matches(&self, dependency_type: DependencyType) -> bool {
        match self {
            DepFilter::All => true,
            DepFilter::Prod => dependency_type == DependencyType::Dependencies,
            DepFilter::Dev => dependency_type == DependencyType::DevDependencies,
        }
    }
}

impl RiskFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFilter::All => "all",
            RiskFilter::MajorOnly => "major-only",
            RiskFilter::NonMajor => "non-major",
            RiskFilter::PrereleaseOnly => "prerelease-only",
            RiskFilter::UnknownOnly => "unknown-only",
        }
    }

    /// Check if a risk group passes the filter
    pub fn matches(&self, group: RiskGroup) -> bool {
        match self {
            RiskFilter::All => true,
            RiskFilter::MajorOnly => group == RiskGroup::Major,
            RiskFilter::NonMajor => {
                matches!(group, RiskGroup::Minor | RiskGroup::Patch | RiskGroup::None)
            }
            RiskFilter::PrereleaseOnly => group == RiskGroup::Prerelease,
            RiskFilter::UnknownOnly => group == RiskGroup::Unknown,
        }
    }
}

macro_rules! display_via_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.as_str())
                }
            }
        )*
    };
}

display_via_as_str!(Scope, Target, DepFilter, RiskFilter);

/// Options echoed into the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOptions {
    /// Scope as requested on the command line
    pub requested_scope: Scope,
    /// Scope actually used (never `auto`)
    pub effective_scope: Scope,
    pub target: Target,
    pub dep: DepFilter,
    pub risk: RiskFilter,
}
