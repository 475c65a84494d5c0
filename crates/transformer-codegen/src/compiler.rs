//! Compilation driver
//!
//! Analyzes a loaded project, then synthesizes the service once analysis has
//! settled. Documents are delivered either one at a time or as concurrent
//! tokio tasks sharing one [`Analyzer`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinSet;
use transformer_core::{AnalysisReport, Analyzer, DeliveryMode, Project, analyze_project};

use crate::error::Result;
use crate::generator::{GeneratedService, Generator, content_hash};

/// Options for the compiler
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Output directory for generated sources
    pub output_dir: PathBuf,

    /// Overwrite output even when it is unchanged
    pub force: bool,

    /// Delivery mode override; the project setting is used when unset
    pub delivery: Option<DeliveryMode>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("generated"),
            force: false,
            delivery: None,
        }
    }
}

/// Analysis findings plus the service generated from them
#[derive(Debug, Clone)]
pub struct Compilation {
    /// Diagnostics and accepted transformer names
    pub report: AnalysisReport,

    /// The synthesized service
    pub service: GeneratedService,
}

impl Compilation {
    /// Whether the compilation must be rejected
    pub fn has_errors(&self) -> bool {
        self.report.has_errors()
    }
}

/// Outcome of writing a generated source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// File written to the given path
    Written(PathBuf),
    /// Existing file already had the same content
    Unchanged(PathBuf),
}

impl WriteOutcome {
    /// Target path
    pub fn path(&self) -> &Path {
        match self {
            Self::Written(path) | Self::Unchanged(path) => path,
        }
    }
}

/// Project compiler
pub struct Compiler {
    options: CompileOptions,
}

impl Compiler {
    /// Create a new compiler with the given options
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    /// Analyze every module of `project` and synthesize its service
    pub async fn compile_project(&self, project: &Project) -> Result<Compilation> {
        let delivery = self
            .options
            .delivery
            .unwrap_or(project.config.project.analysis.delivery);

        tracing::info!(
            "Compiling project '{}' ({} documents, {:?} delivery)",
            project.config.project.name,
            project.document_count(),
            delivery
        );

        let report = match delivery {
            DeliveryMode::Sequential => analyze_project(project),
            DeliveryMode::Concurrent => self.analyze_concurrently(project).await?,
        };

        let generator = Generator::new(project.config.project.service.clone())?;
        let service = generator.generate(&report.transformer_func_names)?;

        Ok(Compilation { report, service })
    }

    /// Load the project at `path` and compile it
    pub async fn compile_path(&self, path: impl AsRef<Path>) -> Result<Compilation> {
        let path = path.as_ref().to_path_buf();
        let project = tokio::task::spawn_blocking(move || Project::load(path)).await??;
        self.compile_project(&project).await
    }

    async fn analyze_concurrently(&self, project: &Project) -> Result<AnalysisReport> {
        let analyzer = Arc::new(Analyzer::for_module(&project.default_module));
        let mut tasks = JoinSet::new();

        for module in project.modules() {
            for document in &module.documents {
                let analyzer = Arc::clone(&analyzer);
                let document = document.clone();
                let default_module = module.is_default;
                tasks.spawn(async move { analyzer.analyze_document(&document, default_module) });
            }
        }

        while let Some(joined) = tasks.join_next().await {
            joined?;
        }

        analyzer.finish(&project.default_module.name);
        Ok(analyzer.report())
    }

    /// Write the generated service into the output directory
    ///
    /// An existing file whose content hash matches is left alone unless
    /// `force` is set.
    pub async fn write_service(&self, service: &GeneratedService) -> Result<WriteOutcome> {
        let path = self.options.output_dir.join(service.file_name());
        let hash = service.content_hash();

        if !self.options.force
            && let Ok(existing) = tokio::fs::read_to_string(&path).await
            && content_hash(&existing) == hash
        {
            tracing::debug!("Generated source unchanged: {} ({})", path.display(), &hash[..12]);
            return Ok(WriteOutcome::Unchanged(path));
        }

        tokio::fs::create_dir_all(&self.options.output_dir).await?;
        tokio::fs::write(&path, &service.source_text).await?;

        tracing::info!("Wrote {} ({})", path.display(), &hash[..12]);
        Ok(WriteOutcome::Written(path))
    }
}
