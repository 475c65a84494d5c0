//! Analyze a project without generating output

use anyhow::{Context, Result};
use transformer_codegen::{CompileOptions, Compiler};
use transformer_core::{DeliveryMode, Project};

use super::{OutputFormat, ensure_clean, print_report};

/// Run the check command
pub async fn run(config_path: &str, format: OutputFormat, concurrent: bool) -> Result<()> {
    tracing::info!("Loading project from {}", config_path);

    let project = Project::load(config_path).context("Failed to load project")?;

    let options = CompileOptions {
        delivery: concurrent.then_some(DeliveryMode::Concurrent),
        ..Default::default()
    };
    let compilation = Compiler::new(options)
        .compile_project(&project)
        .await
        .context("Analysis failed")?;

    print_report(&compilation.report, format)?;
    ensure_clean(&compilation.report)?;

    tracing::info!(
        "✓ {} transformer function(s) in '{}'",
        compilation.report.transformer_func_names.len(),
        project.config.project.name
    );
    Ok(())
}
