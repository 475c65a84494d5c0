//! Transformer Core Library
//!
//! This crate provides the analysis half of the transformer toolchain:
//! - Declaration tree model and document loading
//! - Serializable type checks for transformer signatures
//! - Module-shape rules and their diagnostics
//! - Per-compilation module state and completion tracking
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Declaration │────▶│ Classifier  │────▶│ Diagnostics │
//! │    Tree     │     │  + Types    │     │    Sink     │
//! └─────────────┘     └──────┬──────┘     └─────────────┘
//!                            │
//!                     ┌──────▼──────┐     ┌─────────────┐
//!                     │   Module    │────▶│ Completion  │
//!                     │   State     │     │  Tracker    │
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use transformer_core::{Project, analyze_project};
//!
//! let project = Project::load("./converters")?;
//! let report = analyze_project(&project);
//! for diagnostic in &report.diagnostics {
//!     println!("{}", diagnostic);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analyzer;
pub mod classifier;
pub mod completion;
pub mod config;
pub mod declaration;
pub mod diagnostics;
pub mod error;
pub mod module;
pub mod project;
pub mod state;
pub mod types;

pub use analyzer::{AnalysisReport, Analyzer, analyze_project};
pub use classifier::{Classification, DeclarationContext, StateEffect, classify};
pub use completion::CompletionTracker;
pub use config::{Config, DeliveryMode, ProjectConfig, ServiceConfig};
pub use declaration::{BodyKind, Declaration, FunctionDeclaration, Parameter, Qualifier};
pub use diagnostics::{Diagnostic, DiagnosticAccumulator, DiagnosticCode, DiagnosticSink, Location};
pub use error::{Error, Result};
pub use module::{Document, Module};
pub use project::Project;
pub use state::ModuleAnalysisState;
pub use types::{TypeDescriptor, is_serializable};
