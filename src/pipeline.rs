//! Report pipeline coordinating one report-generation run
//!
//! This module provides:
//! - Workflow coordination: manifest → scope → suggestions → lockfile →
//!   candidates → filters → evidence → report
//! - Debug dumps of each intermediate stage
//! - Progress display on stderr
//!
//! Manifest and suggestion failures abort the run. Lockfile and evidence
//! failures only reduce what the report contains.

use crate::candidates::{assemble_candidates, filter_by_dep, filter_by_risk};
use crate::domain::{
    DepFilter, EnrichedCandidate, Report, ReportOptions, RiskFilter, Scope, Target,
};
use crate::error::AppError;
use crate::evidence::{EvidenceConfig, EvidenceSession, EvidenceTransport};
use crate::lockfile::select_lookup;
use crate::manifest::{resolve_scope, PackageJson, MANIFEST_FILENAME};
use crate::output::DebugDumper;
use crate::progress::Progress;
use crate::report::build_report;
use crate::suggestion::{SuggestionRequest, SuggestionSource};
use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Debug dump file names, in pipeline order
pub const DUMP_SUGGESTIONS: &str = "suggestions.json";
pub const DUMP_CANDIDATES: &str = "candidates.json";
pub const DUMP_CANDIDATES_WITH_CURRENT: &str = "candidates-with-current.json";
pub const DUMP_CANDIDATES_WITH_EVIDENCE: &str = "candidates-with-evidence.json";

/// Settings for one run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Project root
    pub root: PathBuf,
    /// Requested scope
    pub scope: Scope,
    pub target: Target,
    pub dep: DepFilter,
    pub risk: RiskFilter,
    /// Debug dump directory, relative to `root` unless absolute
    pub debug_dir: Option<PathBuf>,
    /// Evidence settings; `None` skips evidence collection
    pub evidence: Option<EvidenceConfig>,
    /// Whether to draw progress on stderr
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            scope: Scope::default(),
            target: Target::default(),
            dep: DepFilter::default(),
            risk: RiskFilter::default(),
            debug_dir: None,
            evidence: Some(EvidenceConfig::default()),
            show_progress: false,
        }
    }
}

/// One suggested upgrade before manifest and lockfile resolution
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SuggestedEntry {
    package_file: String,
    package_name: String,
    suggested_range: String,
}

/// Coordinates a report run
pub struct ReportPipeline {
    config: PipelineConfig,
    suggestions: Box<dyn SuggestionSource>,
    transport: Option<Arc<dyn EvidenceTransport>>,
}

impl ReportPipeline {
    /// Create a pipeline using the HTTP evidence transport
    pub fn new(config: PipelineConfig, suggestions: Box<dyn SuggestionSource>) -> Self {
        Self {
            config,
            suggestions,
            transport: None,
        }
    }

    /// Use a custom evidence transport (for testing)
    pub fn with_transport(mut self, transport: Arc<dyn EvidenceTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Run the pipeline and build the report
    pub async fn run(&self) -> Result<Report, AppError> {
        let config = &self.config;
        let root = config.root.as_path();
        let dumper = DebugDumper::new(config.debug_dir.as_ref().map(|dir| root.join(dir)));
        let mut progress = Progress::new(config.show_progress);

        // Step 1: Root manifest and effective scope
        let root_manifest = PackageJson::read(&root.join(MANIFEST_FILENAME))?;
        let effective_scope = resolve_scope(config.scope, root, &root_manifest);
        tracing::info!(
            requested = %config.scope,
            effective = %effective_scope,
            "resolved scope"
        );

        // Step 2: Upgrade suggestions
        progress.spinner("Resolving upgrade suggestions...");
        let request = SuggestionRequest {
            root: root.to_path_buf(),
            scope: effective_scope,
            target: config.target,
            dep: config.dep,
        };
        let suggestions = self.suggestions.suggest(&request).await;
        progress.finish_and_clear();
        let suggestions = suggestions?;
        dumper.dump(DUMP_SUGGESTIONS, &suggestions.result)?;

        // Step 3: Installed versions
        let lookup = select_lookup(root);

        // Step 4: Candidates
        if dumper.is_enabled() {
            let entries: Vec<SuggestedEntry> = suggestions
                .result
                .iter()
                .flat_map(|result| result.entries())
                .map(|(package_file, package_name, suggested_range)| SuggestedEntry {
                    package_file,
                    package_name,
                    suggested_range,
                })
                .collect();
            dumper.dump(DUMP_CANDIDATES, &entries)?;
        }
        let candidates = assemble_candidates(root, &suggestions, &*lookup)?;
        dumper.dump(DUMP_CANDIDATES_WITH_CURRENT, &candidates)?;

        // Step 5: Filters
        let candidates = filter_by_risk(filter_by_dep(candidates, config.dep), config.risk);
        tracing::info!(count = candidates.len(), "candidates after filtering");

        // Step 6: Evidence
        let enriched: Vec<EnrichedCandidate> = match &config.evidence {
            Some(evidence_config) if !candidates.is_empty() => {
                let session = match &self.transport {
                    Some(transport) => EvidenceSession::new(transport.clone(), evidence_config),
                    None => EvidenceSession::with_http(evidence_config)?,
                };
                progress.start(candidates.len() as u64, "Collecting evidence");
                let progress_ref = &progress;
                let enriched = session
                    .collect_with(&candidates, || progress_ref.inc())
                    .await;
                progress.finish_and_clear();
                enriched
            }
            _ => candidates.into_iter().map(EnrichedCandidate::bare).collect(),
        };
        dumper.dump(DUMP_CANDIDATES_WITH_EVIDENCE, &enriched)?;

        // Step 7: Report
        let options = ReportOptions {
            requested_scope: config.scope,
            effective_scope,
            target: config.target,
            dep: config.dep,
            risk: config.risk,
        };
        Ok(build_report(enriched, options, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ManifestError, SuggestionError};
    use crate::suggestion::{SuggestionOutput, SuggestionResult};
    use async_trait::async_trait;
    use serde_json::json;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct FixedSource {
        value: serde_json::Value,
        seen: Mutex<Option<SuggestionRequest>>,
    }

    impl FixedSource {
        fn new(value: serde_json::Value) -> Self {
            Self {
                value,
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl SuggestionSource for FixedSource {
        async fn suggest(
            &self,
            request: &SuggestionRequest,
        ) -> Result<SuggestionOutput, SuggestionError> {
            *self.seen.lock().unwrap() = Some(request.clone());
            Ok(SuggestionOutput::from_result(SuggestionResult::from_value(
                self.value.clone(),
            )?))
        }
    }

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{
                "name": "app",
                "dependencies": { "lodash": "^4.17.0" },
                "devDependencies": { "typescript": "^4.9.0" }
            }"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("package-lock.json"),
            r#"{"packages": {
                "node_modules/lodash": {"version": "4.17.20"},
                "node_modules/typescript": {"version": "4.9.5"}
            }}"#,
        )
        .unwrap();
        dir
    }

    fn offline(root: &std::path::Path) -> PipelineConfig {
        PipelineConfig {
            root: root.to_path_buf(),
            evidence: None,
            ..PipelineConfig::default()
        }
    }

    #[tokio::test]
    async fn test_offline_run() {
        let dir = project();
        let source = FixedSource::new(json!({"lodash": "^4.17.21", "typescript": "^5.4.5"}));

        let report = ReportPipeline::new(offline(dir.path()), Box::new(source))
            .run()
            .await
            .unwrap();

        assert_eq!(report.options.effective_scope, Scope::Root);
        assert_eq!(report.package_count(), 2);
        let root = &report.packages["package.json"];
        let lodash = &root[&crate::domain::DependencyType::Dependencies]["lodash"];
        assert_eq!(lodash.current.version.as_deref(), Some("4.17.20"));
        assert_eq!(lodash.risk_group, crate::domain::RiskGroup::Patch);
        assert!(lodash.evidence.is_none());
    }

    #[tokio::test]
    async fn test_filters_apply() {
        let dir = project();
        let source = FixedSource::new(json!({"lodash": "^4.17.21", "typescript": "^5.4.5"}));
        let config = PipelineConfig {
            risk: RiskFilter::MajorOnly,
            ..offline(dir.path())
        };

        let report = ReportPipeline::new(config, Box::new(source))
            .run()
            .await
            .unwrap();

        assert_eq!(report.package_count(), 1);
        assert!(report.packages["package.json"]
            .contains_key(&crate::domain::DependencyType::DevDependencies));
    }

    #[tokio::test]
    async fn test_missing_root_manifest_aborts() {
        let dir = TempDir::new().unwrap();
        let source = FixedSource::new(json!({}));

        let err = ReportPipeline::new(offline(dir.path()), Box::new(source))
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Manifest(ManifestError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_invalid_suggestions_abort() {
        let dir = project();
        let source = FixedSource::new(json!({"lodash": 4}));

        let err = ReportPipeline::new(offline(dir.path()), Box::new(source))
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Suggestion(SuggestionError::NonStringRange { .. })));
    }

    #[tokio::test]
    async fn test_debug_dumps_are_written() {
        let dir = project();
        let source = FixedSource::new(json!({"lodash": "^4.17.21"}));
        let config = PipelineConfig {
            debug_dir: Some(PathBuf::from("debug")),
            ..offline(dir.path())
        };

        ReportPipeline::new(config, Box::new(source))
            .run()
            .await
            .unwrap();

        for name in [
            DUMP_SUGGESTIONS,
            DUMP_CANDIDATES,
            DUMP_CANDIDATES_WITH_CURRENT,
            DUMP_CANDIDATES_WITH_EVIDENCE,
        ] {
            assert!(dir.path().join("debug").join(name).exists(), "{} missing", name);
        }
        let entries: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("debug").join(DUMP_CANDIDATES)).unwrap(),
        )
        .unwrap();
        assert_eq!(entries[0]["suggestedRange"], "^4.17.21");
    }

    #[tokio::test]
    async fn test_workspace_scope_is_forwarded() {
        let dir = project();
        fs::write(dir.path().join("pnpm-workspace.yaml"), "packages:\n  - 'packages/*'\n").unwrap();
        let source = Arc::new(FixedSource::new(json!({})));

        struct Shared(Arc<FixedSource>);
        #[async_trait]
        impl SuggestionSource for Shared {
            async fn suggest(
                &self,
                request: &SuggestionRequest,
            ) -> Result<SuggestionOutput, SuggestionError> {
                self.0.suggest(request).await
            }
        }

        let report = ReportPipeline::new(offline(dir.path()), Box::new(Shared(source.clone())))
            .run()
            .await
            .unwrap();

        assert_eq!(report.options.requested_scope, Scope::Auto);
        assert_eq!(report.options.effective_scope, Scope::Workspaces);
        let seen = source.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.scope, Scope::Workspaces);
        assert!(report.is_empty());
    }
}
