//! Generate the service source for a project

use anyhow::{Context, Result};
use std::path::PathBuf;
use transformer_codegen::{CompileOptions, Compiler, WriteOutcome};
use transformer_core::Project;

use super::{OutputFormat, ensure_clean, print_report};

/// Default output directory, relative to the project
const DEFAULT_OUTPUT_DIR: &str = "generated";

/// Run the generate command
pub async fn run(
    config_path: &str,
    output: Option<&str>,
    force: bool,
    format: OutputFormat,
) -> Result<()> {
    tracing::info!("Loading project from {}", config_path);

    let project = Project::load(config_path).context("Failed to load project")?;

    let output_dir = match output {
        Some(dir) => PathBuf::from(dir),
        None => project.config.base_path.join(DEFAULT_OUTPUT_DIR),
    };

    let options = CompileOptions {
        output_dir,
        force,
        ..Default::default()
    };
    let compiler = Compiler::new(options);

    let compilation = compiler
        .compile_project(&project)
        .await
        .context("Compilation failed")?;

    print_report(&compilation.report, format)?;
    ensure_clean(&compilation.report)?;

    let outcome = compiler
        .write_service(&compilation.service)
        .await
        .context("Failed to write generated service")?;

    match &outcome {
        WriteOutcome::Written(path) => tracing::info!(
            "✓ Generated {} resource(s) into {}",
            compilation.service.resource_count(),
            path.display()
        ),
        WriteOutcome::Unchanged(path) => {
            tracing::info!("✓ {} is up to date", path.display())
        }
    }

    Ok(())
}
