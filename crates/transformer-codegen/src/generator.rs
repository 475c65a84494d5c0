//! Service source generator
//!
//! Renders the service module that exposes every accepted transformer
//! function as `POST /<name>`. Output depends only on the function names and
//! the service configuration.

use minijinja::{Environment, UndefinedBehavior};
use sha2::{Digest, Sha256};
use transformer_core::ServiceConfig;

use crate::error::{Error, Result};
use crate::ir::{DEFAULT_PORT, ServiceIR};

const SERVICE_TEMPLATE_NAME: &str = "service.bal";
const SERVICE_TEMPLATE: &str = include_str!("../templates/service.bal.j2");

/// Extension of generated source files
pub const SOURCE_EXTENSION: &str = "bal";

/// A generated source artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedService {
    /// Full source text
    pub source_text: String,

    /// Logical file name, without extension
    pub logical_file_name: String,
}

impl GeneratedService {
    /// SHA-256 of the source text, hex encoded
    pub fn content_hash(&self) -> String {
        content_hash(&self.source_text)
    }

    /// File name including the source extension
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.logical_file_name, SOURCE_EXTENSION)
    }

    /// Number of generated resources
    pub fn resource_count(&self) -> usize {
        self.source_text
            .lines()
            .filter(|line| line.trim_start().starts_with("resource function post "))
            .count()
    }
}

/// SHA-256 of `text`, hex encoded
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Template-driven service generator
pub struct Generator {
    env: Environment<'static>,
    config: ServiceConfig,
}

impl Generator {
    /// Create a generator for the given service settings
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template(SERVICE_TEMPLATE_NAME, SERVICE_TEMPLATE)?;
        Ok(Self { env, config })
    }

    /// Generate the service wrapping `function_names`, in order
    pub fn generate(&self, function_names: &[String]) -> Result<GeneratedService> {
        self.render(&ServiceIR::new(&self.config, function_names))
    }

    /// Render a prepared IR
    pub fn render(&self, ir: &ServiceIR) -> Result<GeneratedService> {
        if let Some(resource) = ir.resources.iter().find(|r| r.function.trim().is_empty()) {
            return Err(Error::GenerationError(format!(
                "resource '{}' wraps a function with an empty name",
                resource.path
            )));
        }

        let template = self.env.get_template(SERVICE_TEMPLATE_NAME)?;
        let source_text = template.render(ir)?;

        tracing::debug!(
            "Generated service '{}' with {} resources",
            ir.file_name,
            ir.resources.len()
        );

        Ok(GeneratedService {
            source_text,
            logical_file_name: ir.file_name.clone(),
        })
    }
}

/// Generate a service for `function_names` with default settings and the
/// given port.
pub fn synthesize(function_names: &[String], port: u16) -> Result<GeneratedService> {
    let config = ServiceConfig {
        port,
        ..ServiceConfig::default()
    };
    Generator::new(config)?.generate(function_names)
}

/// [`synthesize`] on the default port
pub fn synthesize_default(function_names: &[String]) -> Result<GeneratedService> {
    synthesize(function_names, DEFAULT_PORT)
}
