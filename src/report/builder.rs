//! Folds enriched candidates into the grouped report

use crate::domain::{EnrichedCandidate, PackageDetails, Report, ReportOptions, ReportPackages};
use chrono::{DateTime, Utc};

/// Group candidates by manifest, dependency type and package name.
///
/// Duplicate keys are plain map inserts: the last candidate wins.
pub fn build_report(
    enriched: Vec<EnrichedCandidate>,
    options: ReportOptions,
    generated_at: DateTime<Utc>,
) -> Report {
    let mut packages = ReportPackages::new();

    for entry in enriched {
        let risk_group = entry.candidate.risk_group();
        let candidate = entry.candidate;
        let details = PackageDetails {
            current: candidate.current,
            target: candidate.target,
            risk_group,
            version_window: entry.version_window,
            evidence: entry.evidence,
        };

        packages
            .entry(candidate.package_file)
            .or_default()
            .entry(candidate.dependency_type)
            .or_default()
            .insert(candidate.package_name, details);
    }

    Report {
        generated_at,
        options,
        packages,
    }
}
