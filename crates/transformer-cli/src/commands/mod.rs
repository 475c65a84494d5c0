//! CLI command implementations

pub mod check;
pub mod generate;
pub mod init;

use anyhow::{Context, Result};
use clap::ValueEnum;
use transformer_core::AnalysisReport;

/// How diagnostics are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per diagnostic
    Text,
    /// The full analysis report as JSON
    Json,
}

/// Print a report to stdout in the requested format
pub fn print_report(report: &AnalysisReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for diagnostic in &report.diagnostics {
                println!("{}", diagnostic);
            }
        }
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(report).context("Failed to serialize report")?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// Fail the command when the report carries errors
pub fn ensure_clean(report: &AnalysisReport) -> Result<()> {
    if report.has_errors() {
        anyhow::bail!(
            "transformer module rejected with {} error(s)",
            report.error_count()
        );
    }
    Ok(())
}
