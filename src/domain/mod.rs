//! Core domain models for depwhy
//!
//! This module contains the fundamental types used throughout the application:
//! - Dependency types and version specifications as declared in manifests
//! - Upgrade candidates
//! - Risk groups and report options
//! - Version windows and evidence links
//! - The grouped report structure

mod candidate;
mod dependency_type;
mod evidence;
mod options;
mod report;
mod risk;
mod version;
mod version_window;

pub use candidate::{Candidate, EnrichedCandidate};
pub use dependency_type::DependencyType;
pub use evidence::{Evidence, EvidenceLinks};
pub use options::{DepFilter, ReportOptions, RiskFilter, Scope, Target};
pub use report::{PackageDetails, Report, ReportPackages};
pub use risk::{classify_risk_group, RiskGroup};
pub use version::{parse_version, VersionSpec};
pub use version_window::{VersionDelta, VersionWindow};
