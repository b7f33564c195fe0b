//! depwhy - Outdated Node.js dependency report CLI
//!
//! Produces a report of upgrade candidates grouped by manifest and
//! dependency type, each with its risk group, version window and
//! evidence links (compare, releases, changelog, npm diff).

use clap::Parser;
use depwhy::cli::CliArgs;
use depwhy::output::write_report;
use depwhy::pipeline::ReportPipeline;
use depwhy::suggestion::{CommandSuggestionSource, FileSuggestionSource, SuggestionSource};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding a tracing filter directive
const LOG_ENV: &str = "DEPWHY_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; `DEPWHY_LOG` overrides the level chosen by `--verbose`
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(format!("depwhy={level}")))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(io::stderr)
        .with_target(false);

    // A subscriber may already be installed when embedded; keep it
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .try_init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<()> {
    if args.verbose {
        eprintln!("depwhy v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Project: {}", args.path.display());
    }

    let source: Box<dyn SuggestionSource> = match &args.suggestions {
        Some(file) => Box::new(FileSuggestionSource::new(file)),
        None => Box::new(CommandSuggestionSource::new(&args.ncu_command)),
    };

    let pipeline = ReportPipeline::new(args.pipeline_config(), source);
    let report = pipeline.run().await?;

    let output_path = args.output_path();
    write_report(&report, args.format, output_path.as_deref())?;

    if let Some(path) = output_path {
        if !args.quiet {
            eprintln!(
                "Wrote {} package(s) to {}",
                report.package_count(),
                path.display()
            );
        }
    }

    Ok(())
}
