//! Module analysis driver
//!
//! The [`Analyzer`] ties the classifier, the shared state, the completion
//! tracker and the diagnostic sink together for one compilation. It is
//! `Send + Sync`: documents may be analyzed from several tasks at once as
//! long as they share the same analyzer.
//!
//! # Example
//!
//! ```rust,ignore
//! let analyzer = Analyzer::for_module(&default_module);
//! for document in &default_module.documents {
//!     analyzer.analyze_document(document, true);
//! }
//! analyzer.finish(&default_module.name);
//! let report = analyzer.report();
//! ```

use serde::Serialize;
use std::sync::Arc;

use crate::classifier::{StateEffect, classify};
use crate::completion::CompletionTracker;
use crate::diagnostics::{Diagnostic, DiagnosticAccumulator, DiagnosticSink, Location};
use crate::module::{Document, DocumentContext, Module};
use crate::project::Project;
use crate::state::{DeclarationKey, ModuleAnalysisState};

/// Drives classification for one compilation
#[derive(Debug)]
pub struct Analyzer<S: DiagnosticSink = DiagnosticAccumulator> {
    state: Arc<ModuleAnalysisState>,
    sink: Arc<S>,
    tracker: CompletionTracker,
}

impl Analyzer<DiagnosticAccumulator> {
    /// Analyzer expecting `total_documents_expected` countable documents
    pub fn new(total_documents_expected: usize) -> Self {
        Self::with_sink(
            Arc::new(ModuleAnalysisState::new(total_documents_expected)),
            Arc::new(DiagnosticAccumulator::new()),
        )
    }

    /// Analyzer sized for the given default module
    pub fn for_module(default_module: &Module) -> Self {
        Self::new(default_module.countable_documents())
    }

    /// Diagnostics and accepted names collected so far
    pub fn report(&self) -> AnalysisReport {
        AnalysisReport {
            diagnostics: self.sink.sorted(),
            transformer_func_names: self.state.transformer_func_names(),
        }
    }
}

impl<S: DiagnosticSink> Analyzer<S> {
    /// Analyzer over caller-provided state and sink
    pub fn with_sink(state: Arc<ModuleAnalysisState>, sink: Arc<S>) -> Self {
        Self {
            state,
            sink,
            tracker: CompletionTracker::new(),
        }
    }

    /// Shared module state
    pub fn state(&self) -> &Arc<ModuleAnalysisState> {
        &self.state
    }

    /// Diagnostic sink
    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }

    /// Classify every declaration of a document, then report it processed.
    ///
    /// Only non-test documents of the default module reach the completion
    /// barrier.
    pub fn analyze_document(&self, document: &Document, default_module: bool) {
        let context = DocumentContext::new(document, default_module);

        for (index, declaration) in document.declarations.iter().enumerate() {
            let classification = classify(declaration, &context);
            for diagnostic in classification.diagnostics {
                self.sink.emit(diagnostic);
            }
            if let Some(StateEffect::RecordTransformer(name)) = classification.effect {
                let key = DeclarationKey {
                    document: document.ordinal,
                    declaration: index,
                };
                self.state.record_transformer(key, name);
            }
        }

        if default_module && !document.is_test() {
            self.complete(
                self.tracker
                    .on_document_processed(&self.state, Location::document(&document.name)),
            );
        }
    }

    /// Analyze every document of a module in ordinal order
    pub fn analyze_module(&self, module: &Module) {
        tracing::debug!(
            "Analyzing module '{}' ({} documents)",
            module.name,
            module.documents.len()
        );
        for document in &module.documents {
            self.analyze_document(document, module.is_default);
        }
    }

    /// Settle the default module once every document has been analyzed
    pub fn finish(&self, default_module_name: &str) {
        self.complete(
            self.tracker
                .on_module_finished(&self.state, Location::document(default_module_name)),
        );
    }

    fn complete(&self, diagnostic: Option<Diagnostic>) {
        if let Some(diagnostic) = diagnostic {
            self.sink.emit(diagnostic);
        }
    }
}

/// Result of analyzing a project
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// All diagnostics, ordered by location
    pub diagnostics: Vec<Diagnostic>,

    /// Accepted transformer function names in module order
    pub transformer_func_names: Vec<String>,
}

impl AnalysisReport {
    /// Number of error-severity diagnostics
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Whether the compilation should fail
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

/// Analyze a whole project, one document at a time
pub fn analyze_project(project: &Project) -> AnalysisReport {
    let analyzer = Analyzer::for_module(&project.default_module);
    for module in project.modules() {
        analyzer.analyze_module(module);
    }
    analyzer.finish(&project.default_module.name);

    let report = analyzer.report();
    tracing::info!(
        "Analysis complete: {} diagnostics, {} transformer functions",
        report.diagnostics.len(),
        report.transformer_func_names.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{
        BodyKind, Declaration, FunctionDeclaration, ItemDeclaration, Parameter, Qualifier,
    };
    use crate::diagnostics::DiagnosticCode;

    fn transformer(name: &str) -> Declaration {
        Declaration::Function(
            FunctionDeclaration::new(name)
                .with_qualifier(Qualifier::Public)
                .with_qualifier(Qualifier::Isolated)
                .with_body(BodyKind::Expression)
                .with_parameter(Parameter::required("string".parse().unwrap())),
        )
    }

    fn codes(report: &AnalysisReport) -> Vec<DiagnosticCode> {
        let mut codes: Vec<DiagnosticCode> = report.diagnostics.iter().map(|d| d.code).collect();
        codes.sort();
        codes
    }

    fn module(documents: Vec<Document>) -> Module {
        let mut module = Module::new("app", true);
        for document in documents {
            module.push_document(document);
        }
        module
    }

    fn run(module: &Module) -> AnalysisReport {
        let analyzer = Analyzer::for_module(module);
        analyzer.analyze_module(module);
        analyzer.finish(&module.name);
        analyzer.report()
    }

    #[test]
    fn test_main_only_module() {
        let module = module(vec![Document::new("main.yaml").with_declaration(
            Declaration::Function(FunctionDeclaration::new("main")),
        )]);
        let report = run(&module);
        assert_eq!(
            codes(&report),
            vec![
                DiagnosticCode::EntryPointForbidden,
                DiagnosticCode::NoTransformerFunction
            ]
        );
    }

    #[test]
    fn test_public_block_body_module() {
        let module = module(vec![Document::new("main.yaml").with_declaration(
            Declaration::Function(
                FunctionDeclaration::new("convert")
                    .with_qualifier(Qualifier::Public)
                    .with_body(BodyKind::Statement)
                    .with_parameter(Parameter::required("string".parse().unwrap())),
            ),
        )]);
        let report = run(&module);
        assert_eq!(report.diagnostics.len(), 2);
        assert_eq!(
            codes(&report),
            vec![
                DiagnosticCode::PublicFunctionNotExpressionBodied,
                DiagnosticCode::NoTransformerFunction
            ]
        );
        assert!(report.transformer_func_names.is_empty());
    }

    #[test]
    fn test_class_only_module() {
        let module = module(vec![
            Document::new("a.yaml")
                .with_declaration(Declaration::Class(ItemDeclaration::named("Counter"))),
        ]);
        let report = run(&module);
        assert_eq!(report.diagnostics.len(), 2);
        assert_eq!(
            codes(&report),
            vec![
                DiagnosticCode::ClassForbidden,
                DiagnosticCode::NoTransformerFunction
            ]
        );
    }

    #[test]
    fn test_absence_reported_once_across_documents() {
        let module = module(vec![
            Document::new("a.yaml"),
            Document::new("b.yaml"),
            Document::new("c.yaml"),
        ]);
        let report = run(&module);
        assert_eq!(codes(&report), vec![DiagnosticCode::NoTransformerFunction]);
    }

    #[test]
    fn test_transformer_in_any_document_suppresses_absence() {
        let module = module(vec![
            Document::new("a.yaml"),
            Document::new("b.yaml").with_declaration(transformer("toUpper")),
        ]);
        let report = run(&module);
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.transformer_func_names, vec!["toUpper"]);
    }

    #[test]
    fn test_test_documents_do_not_count() {
        let module = module(vec![
            Document::new("a.yaml"),
            Document::new("a_test.yaml")
                .with_import("ballerina/test")
                .with_declaration(transformer("fromTest")),
        ]);
        let report = run(&module);
        assert_eq!(codes(&report), vec![DiagnosticCode::NoTransformerFunction]);
        assert!(report.transformer_func_names.is_empty());
    }

    #[test]
    fn test_empty_default_module_reports_absence() {
        let module = module(vec![]);
        let report = run(&module);
        assert_eq!(codes(&report), vec![DiagnosticCode::NoTransformerFunction]);
        assert_eq!(report.diagnostics[0].location.document, "app");
    }

    #[test]
    fn test_names_ordered_by_document_then_declaration() {
        let module = module(vec![
            Document::new("a.yaml")
                .with_declaration(transformer("first"))
                .with_declaration(transformer("second")),
            Document::new("b.yaml").with_declaration(transformer("third")),
        ]);
        let analyzer = Analyzer::for_module(&module);
        // Deliver out of order
        analyzer.analyze_document(&module.documents[1], true);
        analyzer.analyze_document(&module.documents[0], true);
        assert_eq!(
            analyzer.report().transformer_func_names,
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn test_concurrent_delivery_matches_sequential() {
        let documents: Vec<Document> = (0..12)
            .map(|i| {
                Document::new(format!("d{:02}.yaml", i))
                    .with_declaration(transformer(&format!("f{}", i)))
            })
            .collect();
        let module = module(documents);

        let sequential = run(&module);

        let analyzer = Analyzer::for_module(&module);
        std::thread::scope(|scope| {
            for document in module.documents.iter().rev() {
                let analyzer = &analyzer;
                scope.spawn(move || analyzer.analyze_document(document, true));
            }
        });
        analyzer.finish(&module.name);

        assert_eq!(analyzer.report(), sequential);
    }

    #[test]
    fn test_report_error_count() {
        let module = module(vec![Document::new("a.yaml")]);
        let report = run(&module);
        assert_eq!(report.error_count(), 1);
        assert!(report.has_errors());
        assert!(!AnalysisReport::default().has_errors());
    }
}
