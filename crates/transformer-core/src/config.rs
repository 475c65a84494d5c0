//! Configuration parsing and project loading
//!
//! This module handles loading `transformer.yaml` and the declaration
//! documents of every module.
//!
//! # Project layout
//!
//! ```text
//! transformer.yaml          project configuration
//! src/*.yaml                default module documents
//! src/tests/*.yaml          default module test documents
//! modules/<name>/*.yaml     named modules (with their own tests/)
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::module::{Document, Module};

/// Name of the project configuration file
pub const CONFIG_FILE: &str = "transformer.yaml";

/// Directory holding the default module
pub const DEFAULT_MODULE_DIR: &str = "src";

/// Directory holding named modules
pub const MODULES_DIR: &str = "modules";

/// Sub-directory holding a module's test documents
pub const TESTS_DIR: &str = "tests";

/// Root project configuration from `transformer.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project (package) name, also the default module name
    pub name: String,

    /// Project version
    #[serde(default = "default_version")]
    pub version: String,

    /// Generated service settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// Analysis settings
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// Generated service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Default listener port, exposed as a configurable in the service
    #[serde(default = "default_port")]
    pub port: u16,

    /// Organization providing the `http` module
    #[serde(default = "default_transport_org")]
    pub transport_org: String,

    /// Logical file name of the generated source
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            transport_org: default_transport_org(),
            file_name: default_file_name(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_transport_org() -> String {
    "ballerina".to_string()
}

fn default_file_name() -> String {
    "service".to_string()
}

/// Analysis configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// How documents are delivered to the classifier
    #[serde(default)]
    pub delivery: DeliveryMode,
}

/// Document delivery mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// One document at a time, in ordinal order
    #[default]
    Sequential,
    /// All documents at once
    Concurrent,
}

/// Main configuration container
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Base path of the project
    pub base_path: PathBuf,
}

impl Config {
    /// Load configuration from a directory or a `transformer.yaml` path
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let config = Config::load("./my-transformer")?;
    /// println!("Project: {}", config.project.name);
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let (config_path, base_path) = if path.is_dir() {
            (path.join(CONFIG_FILE), path.to_path_buf())
        } else {
            (
                path.to_path_buf(),
                path.parent().unwrap_or(Path::new(".")).to_path_buf(),
            )
        };

        if !config_path.exists() {
            return Err(Error::ConfigNotFound {
                path: config_path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(&config_path)?;
        let project: ProjectConfig = serde_yaml::from_str(&contents)?;
        let config = Self { project, base_path };
        config.validate()?;

        tracing::debug!(
            "Loaded project '{}' from {}",
            config.project.name,
            config_path.display()
        );
        Ok(config)
    }

    /// Check values that parse but cannot be used
    pub fn validate(&self) -> Result<()> {
        if self.project.name.trim().is_empty() {
            return Err(Error::ConfigInvalid {
                message: "project name must not be empty".to_string(),
            });
        }
        if self.project.service.port == 0 {
            return Err(Error::ConfigInvalid {
                message: "service port must be between 1 and 65535".to_string(),
            });
        }
        if self.project.service.file_name.trim().is_empty() {
            return Err(Error::ConfigInvalid {
                message: "service file_name must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Load the default module from `src/`
    pub fn load_default_module(&self) -> Result<Module> {
        self.load_module(
            &self.project.name,
            true,
            &self.base_path.join(DEFAULT_MODULE_DIR),
        )
    }

    /// Load every named module under `modules/`, sorted by name
    pub fn load_named_modules(&self) -> Result<Vec<Module>> {
        let modules_dir = self.base_path.join(MODULES_DIR);
        if !modules_dir.exists() {
            return Ok(vec![]);
        }

        let mut dirs = Vec::new();
        for entry in walkdir::WalkDir::new(&modules_dir)
            .min_depth(1)
            .max_depth(1)
        {
            let entry = entry?;
            if entry.file_type().is_dir() {
                dirs.push(entry.into_path());
            }
        }
        dirs.sort();

        dirs.iter()
            .map(|dir| {
                let name = dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.load_module(&format!("{}.{}", self.project.name, name), false, dir)
            })
            .collect()
    }

    fn load_module(&self, name: &str, is_default: bool, dir: &Path) -> Result<Module> {
        let mut module = Module::new(name, is_default);

        for path in document_files(dir)? {
            module.push_document(self.load_document(&path, false)?);
        }
        for path in document_files(&dir.join(TESTS_DIR))? {
            module.push_document(self.load_document(&path, true)?);
        }

        tracing::debug!(
            "Loaded module '{}' with {} documents",
            module.name,
            module.documents.len()
        );
        Ok(module)
    }

    /// Parse one document file
    pub fn load_document(&self, path: &Path, test: bool) -> Result<Document> {
        let name = path
            .strip_prefix(&self.base_path)
            .unwrap_or(path)
            .display()
            .to_string();
        let contents = std::fs::read_to_string(path)?;
        parse_document(&name, &contents, test)
    }
}

/// Parse document YAML, naming the result `name`
pub fn parse_document(name: &str, contents: &str, test: bool) -> Result<Document> {
    let mut document = if contents.trim().is_empty() {
        Document::new(name)
    } else {
        serde_yaml::from_str::<Document>(contents).map_err(|e| Error::InvalidDocument {
            document: name.to_string(),
            message: e.to_string(),
        })?
    };
    document.name = name.to_string();
    document.test |= test;
    document.mark_test_functions();
    Ok(document)
}

/// YAML files directly inside `dir`, sorted by path
fn document_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(vec![]);
    }

    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
        {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}
