//! A loaded package: configuration plus its modules

use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::module::Module;

/// A package ready for analysis
#[derive(Debug, Clone)]
pub struct Project {
    /// Project configuration
    pub config: Config,

    /// The default (root) module
    pub default_module: Module,

    /// Named modules, sorted by name
    pub named_modules: Vec<Module>,
}

impl Project {
    /// Load configuration and every module document from a project directory
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::load(path)?;
        let default_module = config.load_default_module()?;
        let named_modules = config.load_named_modules()?;

        tracing::info!(
            "Loaded project '{}': {} documents in default module, {} named modules",
            config.project.name,
            default_module.documents.len(),
            named_modules.len()
        );

        Ok(Self {
            config,
            default_module,
            named_modules,
        })
    }

    /// Assemble a project from modules already in memory
    pub fn from_modules(config: Config, default_module: Module, named_modules: Vec<Module>) -> Self {
        Self {
            config,
            default_module,
            named_modules,
        }
    }

    /// All modules, default module first
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        std::iter::once(&self.default_module).chain(self.named_modules.iter())
    }

    /// Total number of documents across all modules
    pub fn document_count(&self) -> usize {
        self.modules().map(|m| m.documents.len()).sum()
    }
}
