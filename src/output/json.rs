//! JSON output formatter for machine processing

use crate::domain::Report;
use crate::output::ReportFormatter;
use std::io::Write;

/// Pretty-printed JSON (2-space indent) with a trailing newline
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(report)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(writer, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Candidate, DepFilter, DependencyType, EnrichedCandidate, ReportOptions, RiskFilter, Scope,
        Target, VersionSpec,
    };
    use crate::report::build_report;
    use chrono::{TimeZone, Utc};

    fn report() -> Report {
        let candidate = Candidate::new(
            "packages/a/package.json",
            DependencyType::DevDependencies,
            "vitest",
            VersionSpec::new("^1.0.0", Some("1.0.0".to_string())),
            VersionSpec::new("^1.6.0", Some("1.6.0".to_string())),
        );
        build_report(
            vec![EnrichedCandidate::bare(candidate)],
            ReportOptions {
                requested_scope: Scope::Auto,
                effective_scope: Scope::Workspaces,
                target: Target::Latest,
                dep: DepFilter::All,
                risk: RiskFilter::NonMajor,
            },
            Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        )
    }

    fn render(report: &Report) -> String {
        let mut buf = Vec::new();
        JsonFormatter.format(report, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_json_shape() {
        let output = render(&report());
        assert!(output.ends_with("}\n"));
        assert!(output.starts_with("{\n  \"generatedAt\""));

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["generatedAt"], "2026-01-02T03:04:05Z");
        assert_eq!(value["options"]["requestedScope"], "auto");
        assert_eq!(value["options"]["effectiveScope"], "workspaces");
        assert_eq!(value["options"]["risk"], "non-major");

        let vitest = &value["packages"]["packages/a/package.json"]["devDependencies"]["vitest"];
        assert_eq!(vitest["current"]["version"], "1.0.0");
        assert_eq!(vitest["target"]["range"], "^1.6.0");
        assert_eq!(vitest["riskGroup"], "minor");
        assert_eq!(vitest["versionWindow"]["delta"]["patch"], 0);
        assert!(vitest["evidence"].is_null());
    }

    #[test]
    fn test_json_round_trips_into_report() {
        let original = report();
        let parsed: Report = serde_json::from_str(&render(&original)).unwrap();
        assert_eq!(parsed, original);
    }
}
