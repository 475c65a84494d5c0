//! Error types for code generation

use thiserror::Error;

/// Result type for codegen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during code generation
#[derive(Error, Debug)]
pub enum Error {
    /// Loading or parsing the project failed
    #[error(transparent)]
    Core(#[from] transformer_core::Error),

    /// Invalid or failing service template
    #[error("invalid template: {0}")]
    InvalidTemplate(#[from] minijinja::Error),

    /// Failed to generate service source
    #[error("code generation failed: {0}")]
    GenerationError(String),

    /// A document analysis task did not complete
    #[error("analysis task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
