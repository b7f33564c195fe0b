//! Output formatting for reports
//!
//! This module provides:
//! - Markdown output for human reading
//! - JSON output for machine processing
//! - Debug dumps of intermediate pipeline stages

mod debug;
mod json;
mod markdown;

pub use debug::DebugDumper;
pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;

use crate::domain::Report;
use crate::error::OutputError;
use clap::ValueEnum;
use std::io::Write;
use std::path::Path;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Grouped Markdown document
    #[default]
    Markdown,
    /// Pretty-printed JSON
    Json,
}

/// Trait for report formatters
pub trait ReportFormatter {
    /// Format and write the report
    fn format(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()>;
}

/// Create a formatter for an output format
pub fn create_formatter(format: OutputFormat) -> Box<dyn ReportFormatter> {
    match format {
        OutputFormat::Markdown => Box::new(MarkdownFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Render the report to a string
pub fn render(report: &Report, format: OutputFormat) -> Result<String, OutputError> {
    let mut buf = Vec::new();
    create_formatter(format)
        .format(report, &mut buf)
        .map_err(|e| OutputError::SerializeError {
            what: "report".to_string(),
            message: e.to_string(),
        })?;
    String::from_utf8(buf).map_err(|e| OutputError::SerializeError {
        what: "report".to_string(),
        message: e.to_string(),
    })
}

/// Write the rendered report to `path`, or to stdout when `path` is `None`
pub fn write_report(
    report: &Report,
    format: OutputFormat,
    path: Option<&Path>,
) -> Result<(), OutputError> {
    let rendered = render(report, format)?;
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .map_err(|e| OutputError::write_error(parent, e))?;
            }
            std::fs::write(path, rendered).map_err(|e| OutputError::write_error(path, e))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|e| OutputError::write_error("<stdout>", e))
        }
    }
}
