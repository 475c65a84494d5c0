//! Diagnostics reported by module analysis
//!
//! Every rule violation is a [`Diagnostic`]: a stable code, a severity, a
//! fixed message and the location it is attached to. Diagnostics are
//! delivered to a [`DiagnosticSink`]; [`DiagnosticAccumulator`] is the sink
//! used by the analyzer.
//!
//! The codes and messages are a public contract and must not change between
//! versions:
//!
//! | code      | message |
//! |-----------|---------|
//! | ERROR_100 | `main` function is not allowed in a transformer module |
//! | ERROR_101 | public functions in a transformer module must be expression-bodied |
//! | ERROR_102 | listener declarations are not allowed in a transformer module |
//! | ERROR_103 | class definitions are not allowed in a transformer module |
//! | ERROR_104 | service declarations are not allowed in a transformer module |
//! | ERROR_105 | no public isolated expression-bodied function found in the module |
//! | ERROR_106 | annotations are not allowed on module-level functions |
//! | ERROR_107 | transformer function has an unsupported signature |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Diagnostic code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// Entry-point function present
    #[serde(rename = "ERROR_100")]
    EntryPointForbidden,
    /// Public function without an expression body
    #[serde(rename = "ERROR_101")]
    PublicFunctionNotExpressionBodied,
    /// Listener declaration present
    #[serde(rename = "ERROR_102")]
    ListenerForbidden,
    /// Class definition present
    #[serde(rename = "ERROR_103")]
    ClassForbidden,
    /// Service declaration present
    #[serde(rename = "ERROR_104")]
    ServiceForbidden,
    /// No transformer function in the default module
    #[serde(rename = "ERROR_105")]
    NoTransformerFunction,
    /// Annotation on a module-level function
    #[serde(rename = "ERROR_106")]
    AnnotationForbidden,
    /// Transformer function parameters cannot be bound from JSON
    #[serde(rename = "ERROR_107")]
    UnsupportedSignature,
}

impl DiagnosticCode {
    /// All codes, in numeric order
    pub const ALL: [DiagnosticCode; 8] = [
        DiagnosticCode::EntryPointForbidden,
        DiagnosticCode::PublicFunctionNotExpressionBodied,
        DiagnosticCode::ListenerForbidden,
        DiagnosticCode::ClassForbidden,
        DiagnosticCode::ServiceForbidden,
        DiagnosticCode::NoTransformerFunction,
        DiagnosticCode::AnnotationForbidden,
        DiagnosticCode::UnsupportedSignature,
    ];

    /// Stable code string
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticCode::EntryPointForbidden => "ERROR_100",
            DiagnosticCode::PublicFunctionNotExpressionBodied => "ERROR_101",
            DiagnosticCode::ListenerForbidden => "ERROR_102",
            DiagnosticCode::ClassForbidden => "ERROR_103",
            DiagnosticCode::ServiceForbidden => "ERROR_104",
            DiagnosticCode::NoTransformerFunction => "ERROR_105",
            DiagnosticCode::AnnotationForbidden => "ERROR_106",
            DiagnosticCode::UnsupportedSignature => "ERROR_107",
        }
    }

    /// Stable message template
    pub fn message(self) -> &'static str {
        match self {
            DiagnosticCode::EntryPointForbidden => {
                "`main` function is not allowed in a transformer module"
            }
            DiagnosticCode::PublicFunctionNotExpressionBodied => {
                "public functions in a transformer module must be expression-bodied"
            }
            DiagnosticCode::ListenerForbidden => {
                "listener declarations are not allowed in a transformer module"
            }
            DiagnosticCode::ClassForbidden => {
                "class definitions are not allowed in a transformer module"
            }
            DiagnosticCode::ServiceForbidden => {
                "service declarations are not allowed in a transformer module"
            }
            DiagnosticCode::NoTransformerFunction => {
                "no public isolated expression-bodied function found in the module"
            }
            DiagnosticCode::AnnotationForbidden => {
                "annotations are not allowed on module-level functions"
            }
            DiagnosticCode::UnsupportedSignature => {
                "transformer function has an unsupported signature"
            }
        }
    }

    /// Severity of every diagnostic with this code
    pub fn severity(self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Fails the build
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Where a diagnostic is attached
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// Document (module part) name
    pub document: String,

    /// 1-based line, absent for module-level findings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,

    /// 1-based column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl Location {
    /// Location of a whole document
    pub fn document(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            line: None,
            column: None,
        }
    }

    /// Location of a position within a document
    pub fn at(document: impl Into<String>, line: Option<usize>, column: Option<usize>) -> Self {
        Self {
            document: document.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.document)?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
            if let Some(column) = self.column {
                write!(f, ":{}", column)?;
            }
        }
        Ok(())
    }
}

/// A reported finding
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable code
    pub code: DiagnosticCode,

    /// Severity
    pub severity: Severity,

    /// Message text
    pub message: String,

    /// Attached location
    pub location: Location,
}

impl Diagnostic {
    /// Create a diagnostic with the code's fixed message and severity
    pub fn new(code: DiagnosticCode, location: Location) -> Self {
        Self {
            code,
            severity: code.severity(),
            message: code.message().to_string(),
            location,
        }
    }

    /// Whether this diagnostic fails the build
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.severity, self.code, self.location, self.message
        )
    }
}

/// Receiver of diagnostics
///
/// Emission is fire-and-forget and may happen from several threads at once.
pub trait DiagnosticSink: Send + Sync {
    /// Accept one diagnostic
    fn emit(&self, diagnostic: Diagnostic);
}

/// Thread-safe diagnostic collector
#[derive(Debug, Default)]
pub struct DiagnosticAccumulator {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics in arrival order
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    /// Diagnostics ordered by location, then code
    pub fn sorted(&self) -> Vec<Diagnostic> {
        let mut diagnostics = self.snapshot();
        diagnostics.sort_by(|a, b| (&a.location, a.code).cmp(&(&b.location, b.code)));
        diagnostics
    }

    /// Number of diagnostics collected
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been collected
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of error-severity diagnostics
    pub fn error_count(&self) -> usize {
        self.lock().iter().filter(|d| d.is_error()).count()
    }

    /// Whether any diagnostic carries the given code
    pub fn contains(&self, code: DiagnosticCode) -> bool {
        self.lock().iter().any(|d| d.code == code)
    }

    /// Consume the accumulator
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DiagnosticSink for DiagnosticAccumulator {
    fn emit(&self, diagnostic: Diagnostic) {
        tracing::debug!(code = %diagnostic.code, location = %diagnostic.location, "diagnostic reported");
        self.lock().push(diagnostic);
    }
}
