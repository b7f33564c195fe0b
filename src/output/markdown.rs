//! Markdown output formatter
//!
//! Layout:
//! - `# Dependency upgrade report` and an options header
//! - one `##` section per manifest, one `###` subsection per dependency type
//! - one bullet per package with versions, risk and evidence links

use crate::domain::{DependencyType, PackageDetails, Report, VersionSpec};
use crate::output::ReportFormatter;
use std::io::Write;

/// Grouped Markdown document
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    fn write_header(report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        let options = &report.options;
        writeln!(writer, "# Dependency upgrade report")?;
        writeln!(writer)?;
        writeln!(writer, "- Generated: {}", report.generated_at.to_rfc3339())?;
        writeln!(
            writer,
            "- Scope: {} (effective: {})",
            options.requested_scope, options.effective_scope
        )?;
        writeln!(writer, "- Target: {}", options.target)?;
        writeln!(writer, "- Dependencies: {}", options.dep)?;
        writeln!(writer, "- Risk: {}", options.risk)?;
        writeln!(writer)
    }

    fn package_line(name: &str, dependency_type: DependencyType, details: &PackageDetails) -> String {
        let mut line = format!("- **{}**", name);
        if dependency_type.is_dev() {
            line.push_str(" (dev)");
        }
        line.push_str(&format!(
            " {} → {} [{}]",
            version_label(&details.current),
            version_label(&details.target),
            details.risk_group
        ));

        let links = Self::link_labels(details);
        if !links.is_empty() {
            line.push_str(" — ");
            line.push_str(&links.join(" · "));
        }
        line
    }

    fn link_labels(details: &PackageDetails) -> Vec<String> {
        let Some(evidence) = &details.evidence else {
            return Vec::new();
        };
        let links = &evidence.links;
        let mut labels = Vec::new();
        if let Some(url) = &links.compare {
            labels.push(format!("[compare]({})", url));
        }
        if let Some(url) = &links.releases {
            labels.push(format!("[releases]({})", url));
        }
        if let Some(url) = &links.changelog {
            labels.push(format!("[changelog]({})", url));
        }
        if let Some(command) = &links.npm_diff_link {
            labels.push(format!("`{}`", command));
        }
        labels
    }
}

/// Concrete version when known, else the declared range
fn version_label(spec: &VersionSpec) -> String {
    match (&spec.version, spec.range.is_empty()) {
        (Some(version), _) => version.clone(),
        (None, false) => spec.range.clone(),
        (None, true) => "?".to_string(),
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        Self::write_header(report, writer)?;

        if report.is_empty() {
            return writeln!(writer, "No outdated dependencies found.");
        }

        for (package_file, by_type) in &report.packages {
            writeln!(writer, "## {}", package_file)?;
            writeln!(writer)?;
            for (dependency_type, by_name) in by_type {
                writeln!(writer, "### {}", dependency_type)?;
                writeln!(writer)?;
                for (name, details) in by_name {
                    writeln!(writer, "{}", Self::package_line(name, *dependency_type, details))?;
                    let delta = &details.version_window.delta;
                    if delta.total() > 0 {
                        writeln!(
                            writer,
                            "  - window: {} major, {} minor, {} patch, {} prerelease",
                            delta.major, delta.minor, delta.patch, delta.prerelease
                        )?;
                    }
                }
                writeln!(writer)?;
            }
        }
        Ok(())
    }
}
