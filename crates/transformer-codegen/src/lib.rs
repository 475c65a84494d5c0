//! Transformer Code Generation
//!
//! This crate turns an analyzed transformer module into the HTTP service
//! that exposes it.
//!
//! # Pipeline Overview
//!
//! ```text
//! ┌─────────┐     ┌──────────┐     ┌─────────┐     ┌─────────┐
//! │ Project │────▶│ Analysis │────▶│   IR    │────▶│ Service │
//! │  YAML   │     │ (Core)   │     │ (Names) │     │ Source  │
//! └─────────┘     └──────────┘     └─────────┘     └─────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use transformer_codegen::{Compiler, CompileOptions};
//!
//! let compiler = Compiler::new(CompileOptions::default());
//! let compilation = compiler.compile_path("./converters").await?;
//! if !compilation.has_errors() {
//!     compiler.write_service(&compilation.service).await?;
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod compiler;
pub mod error;
pub mod generator;
pub mod ir;

pub use compiler::{CompileOptions, Compilation, Compiler, WriteOutcome};
pub use error::{Error, Result};
pub use generator::{GeneratedService, Generator, content_hash, synthesize};
pub use ir::{ResourceIR, ServiceIR};
