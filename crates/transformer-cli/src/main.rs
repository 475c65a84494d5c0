//! Transformer CLI
//!
//! Developer tool for checking transformer modules and generating the
//! service that exposes them.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::OutputFormat;

/// Transformer - expose pure functions as an HTTP service
#[derive(Parser)]
#[command(name = "transformer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project directory or configuration file path
    #[arg(short, long, default_value = "transformer.yaml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new transformer project
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,

        /// Project name (defaults to directory name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Analyze the project and report diagnostics
    Check {
        /// Diagnostic output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Analyze documents concurrently
        #[arg(long)]
        concurrent: bool,
    },

    /// Analyze the project and write the generated service
    Generate {
        /// Output directory (defaults to `generated` in the project)
        #[arg(short, long)]
        output: Option<String>,

        /// Rewrite the service even when unchanged
        #[arg(long)]
        force: bool,

        /// Diagnostic output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Init { path, name } => {
            commands::init::run(&path, name.as_deref()).await?;
        }
        Commands::Check { format, concurrent } => {
            commands::check::run(&cli.config, format, concurrent).await?;
        }
        Commands::Generate {
            output,
            force,
            format,
        } => {
            commands::generate::run(&cli.config, output.as_deref(), force, format).await?;
        }
    }

    Ok(())
}
