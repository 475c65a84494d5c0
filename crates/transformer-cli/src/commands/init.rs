//! Initialize a new transformer project

use anyhow::Result;
use std::fs;
use std::path::Path;
use transformer_core::config::{CONFIG_FILE, DEFAULT_MODULE_DIR, TESTS_DIR};

/// Run the init command
pub async fn run(path: &str, name: Option<&str>) -> Result<()> {
    let project_dir = Path::new(path);

    // Create directory if it doesn't exist
    if !project_dir.exists() {
        fs::create_dir_all(project_dir)?;
    }

    let abs_path = project_dir.canonicalize()?;

    // Derive project name from directory name if not provided
    let project_name = match name {
        Some(n) => n.to_string(),
        None => abs_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("Could not determine project name from path"))?,
    };

    if project_dir.join(CONFIG_FILE).exists() {
        anyhow::bail!(
            "Directory '{}' already contains a {}",
            project_dir.display(),
            CONFIG_FILE
        );
    }

    tracing::info!("Creating new transformer project: {}", project_name);

    let module_dir = project_dir.join(DEFAULT_MODULE_DIR);
    fs::create_dir_all(module_dir.join(TESTS_DIR))?;

    let config = format!(
        r#"# Transformer Project Configuration
name: {project_name}
version: "0.1.0"

service:
  port: 8080

analysis:
  delivery: sequential
"#
    );
    fs::write(project_dir.join(CONFIG_FILE), config)?;

    let transform = r#"# Public isolated expression-bodied functions become POST resources
imports: []
declarations:
  - kind: function
    name: toUpper
    qualifiers: [public, isolated]
    body: expression
    parameters:
      - { kind: required, type: string }
    line: 1
"#;
    fs::write(module_dir.join("transform.yaml"), transform)?;

    let transform_test = r#"imports: [ballerina/test]
declarations:
  - kind: function
    name: testToUpper
    annotations: [test:Config]
    body: statement
    line: 4
"#;
    fs::write(
        module_dir.join(TESTS_DIR).join("transform_test.yaml"),
        transform_test,
    )?;

    let gitignore = r#"# Generated service sources
generated/

# IDE
.idea/
.vscode/
*.swp
"#;
    fs::write(project_dir.join(".gitignore"), gitignore)?;

    tracing::info!(
        "✓ Created project '{}' at {}",
        project_name,
        abs_path.display()
    );
    tracing::info!("");
    tracing::info!("Next steps:");
    if path != "." {
        tracing::info!("  cd {}", project_dir.display());
    }
    tracing::info!("  transformer check       # Analyze the module");
    tracing::info!("  transformer generate    # Write the service");

    Ok(())
}
