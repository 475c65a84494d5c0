//! Declaration classifier
//!
//! [`classify`] applies the module-shape rules to one top-level declaration.
//! It is a pure function: it reads its [`DeclarationContext`] and returns the
//! diagnostics and the [`StateEffect`] for the caller to apply.
//!
//! # Rules
//!
//! - listeners, classes and services are always rejected
//! - a function named `main` is rejected
//! - a public function must have an expression body
//! - annotations on functions are rejected outside test documents
//! - a public isolated expression-bodied function in the default module is a
//!   transformer candidate; its parameters must all be JSON-serializable

use crate::declaration::{Declaration, FunctionDeclaration, Qualifier};
use crate::diagnostics::{Diagnostic, DiagnosticCode, Location};

/// Read-only facts about where a declaration lives
pub trait DeclarationContext {
    /// Name of the enclosing document, used for locations
    fn document_name(&self) -> &str;

    /// Whether the enclosing document is a test document
    fn is_test_document(&self) -> bool;

    /// Whether the enclosing module is the package's default module
    fn is_default_module(&self) -> bool;
}

/// Change to apply to the module analysis state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEffect {
    /// Record a transformer function by name
    RecordTransformer(String),
}

/// Outcome of classifying one declaration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    /// Findings for this declaration
    pub diagnostics: Vec<Diagnostic>,

    /// State change, if the declaration is a transformer candidate
    pub effect: Option<StateEffect>,
}

impl Classification {
    fn report(&mut self, code: DiagnosticCode, location: &Location) {
        self.diagnostics.push(Diagnostic::new(code, location.clone()));
    }

    /// Codes of the reported diagnostics, in order
    pub fn codes(&self) -> Vec<DiagnosticCode> {
        self.diagnostics.iter().map(|d| d.code).collect()
    }
}

/// Classify one top-level declaration
pub fn classify(declaration: &Declaration, context: &impl DeclarationContext) -> Classification {
    let (line, column) = declaration.position();
    let location = Location::at(context.document_name(), line, column);
    let mut classification = Classification::default();

    match declaration {
        Declaration::Function(func) => classify_function(func, context, &location, &mut classification),
        Declaration::Listener(_) => classification.report(DiagnosticCode::ListenerForbidden, &location),
        Declaration::Class(_) => classification.report(DiagnosticCode::ClassForbidden, &location),
        Declaration::Service(_) => classification.report(DiagnosticCode::ServiceForbidden, &location),
        Declaration::Type(_) => {}
    }

    tracing::debug!(
        kind = declaration.kind_name(),
        name = declaration.name().unwrap_or("<anonymous>"),
        location = %location,
        diagnostics = classification.diagnostics.len(),
        "classified declaration"
    );

    classification
}

fn classify_function(
    func: &FunctionDeclaration,
    context: &impl DeclarationContext,
    location: &Location,
    classification: &mut Classification,
) {
    let in_test_document = context.is_test_document() || func.owner_module_part_is_test;

    if func.is_entry_point() {
        classification.report(DiagnosticCode::EntryPointForbidden, location);
    }

    if func.has_qualifier(Qualifier::Public) && !func.is_expression_bodied() {
        classification.report(DiagnosticCode::PublicFunctionNotExpressionBodied, location);
    }

    if func.has_annotations() && !in_test_document {
        classification.report(DiagnosticCode::AnnotationForbidden, location);
    }

    if context.is_default_module() && !in_test_document && func.is_transformer_shaped() {
        classification.effect = Some(StateEffect::RecordTransformer(func.name.clone()));
        if !func.has_serializable_signature() {
            classification.report(DiagnosticCode::UnsupportedSignature, location);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{BodyKind, ItemDeclaration, Parameter};

    struct TestContext {
        test_document: bool,
        default_module: bool,
    }

    impl DeclarationContext for TestContext {
        fn document_name(&self) -> &str {
            "transform.yaml"
        }

        fn is_test_document(&self) -> bool {
            self.test_document
        }

        fn is_default_module(&self) -> bool {
            self.default_module
        }
    }

    const DEFAULT: TestContext = TestContext {
        test_document: false,
        default_module: true,
    };

    fn transformer(name: &str, parameter: &str) -> FunctionDeclaration {
        FunctionDeclaration::new(name)
            .with_qualifier(Qualifier::Public)
            .with_qualifier(Qualifier::Isolated)
            .with_body(BodyKind::Expression)
            .with_parameter(Parameter::required(parameter.parse().unwrap()))
    }

    #[test]
    fn test_forbidden_item_kinds() {
        let cases = [
            (
                Declaration::Listener(ItemDeclaration::named("ep")),
                DiagnosticCode::ListenerForbidden,
            ),
            (
                Declaration::Class(ItemDeclaration::named("Counter")),
                DiagnosticCode::ClassForbidden,
            ),
            (
                Declaration::Service(ItemDeclaration::default()),
                DiagnosticCode::ServiceForbidden,
            ),
        ];
        for (declaration, code) in cases {
            let result = classify(&declaration, &DEFAULT);
            assert_eq!(result.codes(), vec![code]);
            assert!(result.effect.is_none());
        }
    }

    #[test]
    fn test_type_definition_is_allowed() {
        let result = classify(&Declaration::Type(ItemDeclaration::named("Person")), &DEFAULT);
        assert!(result.diagnostics.is_empty());
        assert!(result.effect.is_none());
    }

    #[test]
    fn test_main_function_rejected() {
        let func = FunctionDeclaration::new("main").at_line(1);
        let result = classify(&Declaration::Function(func), &DEFAULT);
        assert_eq!(result.codes(), vec![DiagnosticCode::EntryPointForbidden]);
        assert_eq!(result.diagnostics[0].location.line, Some(1));
        assert_eq!(result.diagnostics[0].location.document, "transform.yaml");
    }

    #[test]
    fn test_public_main_with_block_body_reports_both() {
        let func = FunctionDeclaration::new("main").with_qualifier(Qualifier::Public);
        let result = classify(&Declaration::Function(func), &DEFAULT);
        assert_eq!(
            result.codes(),
            vec![
                DiagnosticCode::EntryPointForbidden,
                DiagnosticCode::PublicFunctionNotExpressionBodied
            ]
        );
    }

    #[test]
    fn test_public_statement_body_rejected() {
        let func = FunctionDeclaration::new("convert").with_qualifier(Qualifier::Public);
        let result = classify(&Declaration::Function(func), &DEFAULT);
        assert_eq!(
            result.codes(),
            vec![DiagnosticCode::PublicFunctionNotExpressionBodied]
        );
        assert!(result.effect.is_none());
    }

    #[test]
    fn test_private_statement_body_allowed() {
        let func = FunctionDeclaration::new("helper");
        let result = classify(&Declaration::Function(func), &DEFAULT);
        assert!(result.diagnostics.is_empty());
        assert!(result.effect.is_none());
    }

    #[test]
    fn test_annotations_rejected_outside_tests() {
        let func = FunctionDeclaration::new("helper").with_annotation("display");
        let result = classify(&Declaration::Function(func.clone()), &DEFAULT);
        assert_eq!(result.codes(), vec![DiagnosticCode::AnnotationForbidden]);

        let test_context = TestContext {
            test_document: true,
            default_module: true,
        };
        let result = classify(&Declaration::Function(func.clone()), &test_context);
        assert!(result.diagnostics.is_empty());

        let mut owned_by_test = func;
        owned_by_test.owner_module_part_is_test = true;
        let result = classify(&Declaration::Function(owned_by_test), &DEFAULT);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_transformer_candidate_recorded() {
        let result = classify(&Declaration::Function(transformer("toUpper", "string")), &DEFAULT);
        assert!(result.diagnostics.is_empty());
        assert_eq!(
            result.effect,
            Some(StateEffect::RecordTransformer("toUpper".to_string()))
        );
    }

    #[test]
    fn test_unsupported_signature_still_recorded() {
        let result = classify(&Declaration::Function(transformer("parse", "xml")), &DEFAULT);
        assert_eq!(result.codes(), vec![DiagnosticCode::UnsupportedSignature]);
        assert_eq!(
            result.effect,
            Some(StateEffect::RecordTransformer("parse".to_string()))
        );
    }

    #[test]
    fn test_parameterless_transformer_is_unsupported() {
        let func = FunctionDeclaration::new("now")
            .with_qualifier(Qualifier::Public)
            .with_qualifier(Qualifier::Isolated)
            .with_body(BodyKind::Expression);
        let result = classify(&Declaration::Function(func), &DEFAULT);
        assert_eq!(result.codes(), vec![DiagnosticCode::UnsupportedSignature]);
        assert!(result.effect.is_some());
    }

    #[test]
    fn test_one_bad_parameter_is_unsupported() {
        let func = transformer("merge", "json")
            .with_parameter(Parameter::required("stream<int>".parse().unwrap()));
        let result = classify(&Declaration::Function(func), &DEFAULT);
        assert_eq!(result.codes(), vec![DiagnosticCode::UnsupportedSignature]);
    }

    #[test]
    fn test_non_default_module_not_recorded() {
        let context = TestContext {
            test_document: false,
            default_module: false,
        };
        let result = classify(&Declaration::Function(transformer("toUpper", "xml")), &context);
        assert!(result.diagnostics.is_empty());
        assert!(result.effect.is_none());
    }

    #[test]
    fn test_non_default_module_still_validated() {
        let context = TestContext {
            test_document: false,
            default_module: false,
        };
        let func = FunctionDeclaration::new("main").with_annotation("deprecated");
        let result = classify(&Declaration::Function(func), &context);
        assert_eq!(
            result.codes(),
            vec![
                DiagnosticCode::EntryPointForbidden,
                DiagnosticCode::AnnotationForbidden
            ]
        );
    }

    #[test]
    fn test_test_document_transformer_not_recorded() {
        let context = TestContext {
            test_document: true,
            default_module: true,
        };
        let result = classify(&Declaration::Function(transformer("toUpper", "string")), &context);
        assert!(result.effect.is_none());
    }
}
