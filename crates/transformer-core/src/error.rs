//! Error types for transformer-core
//!
//! These are operational failures (unreadable files, malformed documents).
//! Rule violations found in a module are never errors; they are reported as
//! [`Diagnostic`](crate::diagnostics::Diagnostic) values.

use thiserror::Error;

/// Result type alias for transformer-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in transformer-core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be found
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched
        path: String,
    },

    /// Failed to parse YAML configuration or document
    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {message}")]
    ConfigInvalid {
        /// Description of what's invalid
        message: String,
    },

    /// A document file could not be turned into a declaration tree
    #[error("invalid document '{document}': {message}")]
    InvalidDocument {
        /// Document name
        document: String,
        /// Description of the error
        message: String,
    },

    /// A type descriptor could not be parsed
    #[error("invalid type descriptor '{descriptor}': {message}")]
    InvalidTypeDescriptor {
        /// The descriptor text
        descriptor: String,
        /// Description of the error
        message: String,
    },

    /// Directory traversal failed
    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
