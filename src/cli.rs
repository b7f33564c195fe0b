//! CLI argument parsing module for depwhy

use crate::domain::{DepFilter, RiskFilter, Scope, Target};
use crate::evidence::{EvidenceConfig, DEFAULT_REGISTRY_URL};
use crate::output::OutputFormat;
use crate::pipeline::PipelineConfig;
use crate::suggestion::DEFAULT_NCU_COMMAND;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Parse a timeout: plain seconds (`5`), seconds (`5s`) or milliseconds (`1500ms`)
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty timeout".to_string());
    }

    let (num_str, millis) = if let Some(n) = s.strip_suffix("ms") {
        (n, true)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, false)
    } else {
        (s, false)
    };

    let num: u64 = num_str
        .parse()
        .map_err(|_| format!("invalid number in timeout: {}", num_str))?;
    if num == 0 {
        return Err("timeout must be greater than zero".to_string());
    }

    Ok(if millis {
        Duration::from_millis(num)
    } else {
        Duration::from_secs(num)
    })
}

/// Parse a concurrency limit of at least one
fn parse_concurrency(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("concurrency must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("invalid concurrency: {}", s)),
    }
}

/// Outdated Node.js dependency report with upgrade evidence
#[derive(Parser, Debug, Clone)]
#[command(
    name = "depwhy",
    version,
    about = "Report outdated Node.js dependencies with upgrade evidence"
)]
pub struct CliArgs {
    /// Project root (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    // Selection
    /// Which manifests to scan
    #[arg(long, value_enum, default_value_t = Scope::Auto)]
    pub scope: Scope,

    /// Upgrade target forwarded to the suggestion engine
    #[arg(long, value_enum, default_value_t = Target::Latest)]
    pub target: Target,

    /// Dependency filter
    #[arg(long, value_enum, default_value_t = DepFilter::All)]
    pub dep: DepFilter,

    /// Risk filter
    #[arg(long, value_enum, default_value_t = RiskFilter::All)]
    pub risk: RiskFilter,

    // Suggestions
    /// Read suggestions from a JSON file instead of running the engine
    #[arg(long, value_name = "FILE")]
    pub suggestions: Option<PathBuf>,

    /// Command used to run the suggestion engine
    #[arg(long, value_name = "CMD", default_value = DEFAULT_NCU_COMMAND)]
    pub ncu_command: String,

    // Output options
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,

    /// Write the report to <PATH>/<FILE> instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write intermediate stage dumps under <PATH>/<DIR>
    #[arg(long, value_name = "DIR")]
    pub debug_dir: Option<PathBuf>,

    // Evidence options
    /// Skip registry and GitHub lookups
    #[arg(long)]
    pub no_evidence: bool,

    /// Per-request timeout for registry fetches and probes (e.g. 5, 5s, 1500ms)
    #[arg(long, value_parser = parse_timeout, default_value = "5")]
    pub timeout: Duration,

    /// Maximum number of candidates resolved at once
    #[arg(long, value_parser = parse_concurrency, default_value_t = 8)]
    pub concurrency: usize,

    /// npm registry base URL
    #[arg(long, value_name = "URL", default_value = DEFAULT_REGISTRY_URL)]
    pub registry_url: String,

    // General options
    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - no progress display
    #[arg(short, long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Evidence settings, or `None` when evidence is disabled
    pub fn evidence_config(&self) -> Option<EvidenceConfig> {
        if self.no_evidence {
            return None;
        }
        Some(EvidenceConfig {
            registry_url: self.registry_url.clone(),
            timeout: self.timeout,
            concurrency: self.concurrency,
        })
    }

    /// Pipeline settings for this invocation
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            root: self.path.clone(),
            scope: self.scope,
            target: self.target,
            dep: self.dep,
            risk: self.risk,
            debug_dir: self.debug_dir.clone(),
            evidence: self.evidence_config(),
            show_progress: !self.quiet && !self.writes_json_to_stdout(),
        }
    }

    /// The spinner would interleave with a JSON report on stdout
    fn writes_json_to_stdout(&self) -> bool {
        self.format == OutputFormat::Json && self.output.is_none()
    }

    /// Report destination resolved against the project root
    pub fn output_path(&self) -> Option<PathBuf> {
        self.output.as_ref().map(|file| self.path.join(file))
    }
}
