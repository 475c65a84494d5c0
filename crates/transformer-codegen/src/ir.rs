//! Intermediate representation of the generated service
//!
//! The IR is the template context: everything the service template needs,
//! already resolved from configuration and the accepted function names.

use serde::Serialize;
use transformer_core::ServiceConfig;

/// Default listener port of the generated service
pub const DEFAULT_PORT: u16 = 8080;

/// Intermediate representation of a generated service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceIR {
    /// Organization providing the `http` module
    pub transport_org: String,

    /// Default value of the `port` configurable
    pub port: u16,

    /// Logical file name of the generated source
    pub file_name: String,

    /// Resources in declaration order
    pub resources: Vec<ResourceIR>,
}

/// One POST resource wrapping a transformer function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceIR {
    /// Resource path segment
    pub path: String,

    /// Wrapped function
    pub function: String,
}

impl ServiceIR {
    /// Build the IR from configuration and ordered function names
    pub fn new(config: &ServiceConfig, function_names: &[String]) -> Self {
        Self {
            transport_org: config.transport_org.clone(),
            port: config.port,
            file_name: config.file_name.clone(),
            resources: function_names
                .iter()
                .map(|name| ResourceIR {
                    path: name.clone(),
                    function: name.clone(),
                })
                .collect(),
        }
    }

    /// Service with default configuration
    pub fn with_defaults(function_names: &[String]) -> Self {
        Self::new(&ServiceConfig::default(), function_names)
    }
}
