//! Top-level declarations of a module part
//!
//! These types are the already-parsed declaration tree handed over by the
//! collaborator. Only the parts the rules look at are modelled.
//!
//! # Example
//!
//! ```yaml
//! - kind: function
//!   name: toUpper
//!   qualifiers: [public, isolated]
//!   body: expression
//!   parameters:
//!     - { kind: required, type: string }
//!   line: 3
//! - kind: listener
//!   name: ep
//!   line: 7
//! ```

use serde::{Deserialize, Serialize};

use crate::types::TypeDescriptor;

/// Name of the entry-point function.
pub const ENTRY_POINT_NAME: &str = "main";

/// Qualifier keyword attached to a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Qualifier {
    /// `public`
    Public,
    /// `isolated`
    Isolated,
    /// `private`
    Private,
    /// `transactional`
    Transactional,
    /// `remote`
    Remote,
    /// `final`
    Final,
    /// `configurable`
    Configurable,
}

/// How a parameter is bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    /// `T name`
    Required,
    /// `T name = default`
    Defaulted,
    /// `T... name`
    Rest,
}

/// A function parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Binding kind
    pub kind: BindingKind,

    /// Declared type; for a rest parameter this is the element type
    #[serde(rename = "type")]
    pub type_descriptor: TypeDescriptor,

    /// Parameter name, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Parameter {
    /// A required parameter of the given type
    pub fn required(type_descriptor: TypeDescriptor) -> Self {
        Self {
            kind: BindingKind::Required,
            type_descriptor,
            name: None,
        }
    }

    /// Whether the parameter can be bound from a JSON payload
    pub fn is_serializable(&self) -> bool {
        self.type_descriptor.is_serializable()
    }
}

/// Kind of function body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    /// `=> expr;`
    Expression,
    /// `{ ... }`
    #[default]
    #[serde(alias = "block")]
    Statement,
    /// `= external;`
    External,
}

/// A module-level function definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    /// Function name
    pub name: String,

    /// Qualifiers in source order
    #[serde(default)]
    pub qualifiers: Vec<Qualifier>,

    /// Body kind
    #[serde(default)]
    pub body: BodyKind,

    /// Names of annotations attached to the function
    #[serde(default)]
    pub annotations: Vec<String>,

    /// Parameters in signature order
    #[serde(default)]
    pub parameters: Vec<Parameter>,

    /// Set by the loader when the owning module part is a test part
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub owner_module_part_is_test: bool,

    /// 1-based source line
    #[serde(default)]
    pub line: Option<usize>,

    /// 1-based source column
    #[serde(default)]
    pub column: Option<usize>,
}

impl FunctionDeclaration {
    /// Create a function with a statement body and no qualifiers
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualifiers: Vec::new(),
            body: BodyKind::Statement,
            annotations: Vec::new(),
            parameters: Vec::new(),
            owner_module_part_is_test: false,
            line: None,
            column: None,
        }
    }

    /// Add a qualifier
    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.push(qualifier);
        self
    }

    /// Set the body kind
    pub fn with_body(mut self, body: BodyKind) -> Self {
        self.body = body;
        self
    }

    /// Add a parameter
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Attach an annotation
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    /// Set the source line
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Whether the given qualifier is present
    pub fn has_qualifier(&self, qualifier: Qualifier) -> bool {
        self.qualifiers.contains(&qualifier)
    }

    /// Whether any annotation is attached
    pub fn has_annotations(&self) -> bool {
        !self.annotations.is_empty()
    }

    /// Whether the body is a single expression
    pub fn is_expression_bodied(&self) -> bool {
        self.body == BodyKind::Expression
    }

    /// Whether this is the entry-point function
    pub fn is_entry_point(&self) -> bool {
        self.name == ENTRY_POINT_NAME
    }

    /// Public, isolated and expression-bodied
    pub fn is_transformer_shaped(&self) -> bool {
        self.has_qualifier(Qualifier::Public)
            && self.has_qualifier(Qualifier::Isolated)
            && self.is_expression_bodied()
    }

    /// True when at least one parameter exists and every one is serializable
    pub fn has_serializable_signature(&self) -> bool {
        !self.parameters.is_empty() && self.parameters.iter().all(Parameter::is_serializable)
    }
}

/// A listener, class, service or type declaration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemDeclaration {
    /// Declared name (services are usually anonymous)
    #[serde(default)]
    pub name: Option<String>,

    /// 1-based source line
    #[serde(default)]
    pub line: Option<usize>,

    /// 1-based source column
    #[serde(default)]
    pub column: Option<usize>,
}

impl ItemDeclaration {
    /// Create a named item
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// A top-level declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    /// Function definition
    Function(FunctionDeclaration),
    /// `listener` declaration
    Listener(ItemDeclaration),
    /// `class` definition
    Class(ItemDeclaration),
    /// `service` declaration
    Service(ItemDeclaration),
    /// `type` definition
    Type(ItemDeclaration),
}

impl Declaration {
    /// Keyword describing the declaration kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            Declaration::Function(_) => "function",
            Declaration::Listener(_) => "listener",
            Declaration::Class(_) => "class",
            Declaration::Service(_) => "service",
            Declaration::Type(_) => "type",
        }
    }

    /// Declared name, if any
    pub fn name(&self) -> Option<&str> {
        match self {
            Declaration::Function(func) => Some(&func.name),
            Declaration::Listener(item)
            | Declaration::Class(item)
            | Declaration::Service(item)
            | Declaration::Type(item) => item.name.as_deref(),
        }
    }

    /// Source line and column
    pub fn position(&self) -> (Option<usize>, Option<usize>) {
        match self {
            Declaration::Function(func) => (func.line, func.column),
            Declaration::Listener(item)
            | Declaration::Class(item)
            | Declaration::Service(item)
            | Declaration::Type(item) => (item.line, item.column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveKind;

    #[test]
    fn test_parse_function_declaration() {
        let yaml = r#"
kind: function
name: toUpper
qualifiers: [public, isolated]
body: expression
parameters:
  - kind: required
    type: string
line: 3
"#;
        let decl: Declaration = serde_yaml::from_str(yaml).unwrap();
        match decl {
            Declaration::Function(func) => {
                assert_eq!(func.name, "toUpper");
                assert!(func.is_transformer_shaped());
                assert_eq!(func.line, Some(3));
                assert_eq!(
                    func.parameters[0].type_descriptor,
                    TypeDescriptor::Primitive(PrimitiveKind::String)
                );
            }
            _ => panic!("Expected function declaration"),
        }
    }

    #[test]
    fn test_function_defaults_to_statement_body() {
        let decl: Declaration = serde_yaml::from_str("kind: function\nname: helper\n").unwrap();
        match decl {
            Declaration::Function(func) => {
                assert_eq!(func.body, BodyKind::Statement);
                assert!(func.qualifiers.is_empty());
                assert!(!func.has_annotations());
                assert!(!func.owner_module_part_is_test);
            }
            _ => panic!("Expected function declaration"),
        }
    }

    #[test]
    fn test_block_is_statement_alias() {
        let decl: Declaration =
            serde_yaml::from_str("kind: function\nname: f\nbody: block\n").unwrap();
        assert!(matches!(
            decl,
            Declaration::Function(FunctionDeclaration {
                body: BodyKind::Statement,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_item_declarations() {
        let yaml = r#"
- { kind: listener, name: ep, line: 2 }
- { kind: class, name: Counter }
- { kind: service, line: 10 }
- { kind: type, name: Person }
"#;
        let decls: Vec<Declaration> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(decls.len(), 4);
        assert_eq!(decls[0].kind_name(), "listener");
        assert_eq!(decls[0].position(), (Some(2), None));
        assert_eq!(decls[1].name(), Some("Counter"));
        assert_eq!(decls[2].name(), None);
        assert!(matches!(decls[3], Declaration::Type(_)));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result: Result<Declaration, _> = serde_yaml::from_str("kind: enum\nname: Color\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_transformer_shape_requires_all_three() {
        let base = FunctionDeclaration::new("f")
            .with_qualifier(Qualifier::Public)
            .with_qualifier(Qualifier::Isolated);
        assert!(!base.is_transformer_shaped());
        assert!(base.clone().with_body(BodyKind::Expression).is_transformer_shaped());

        let not_isolated = FunctionDeclaration::new("f")
            .with_qualifier(Qualifier::Public)
            .with_body(BodyKind::Expression);
        assert!(!not_isolated.is_transformer_shaped());
    }

    #[test]
    fn test_signature_needs_a_parameter() {
        let func = FunctionDeclaration::new("f");
        assert!(!func.has_serializable_signature());

        let func = func.with_parameter(Parameter::required("int".parse().unwrap()));
        assert!(func.has_serializable_signature());

        let func = func.with_parameter(Parameter::required("xml".parse().unwrap()));
        assert!(!func.has_serializable_signature());
    }
}
