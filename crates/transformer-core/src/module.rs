//! Modules and their documents
//!
//! A package has one default module and any number of named modules. Each
//! module is made of documents (module parts), some of which may be test
//! documents.

use serde::{Deserialize, Serialize};

use crate::classifier::DeclarationContext;
use crate::declaration::Declaration;

/// One module part with its top-level declarations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document name used in locations
    #[serde(default)]
    pub name: String,

    /// Position of the document within its module
    #[serde(default)]
    pub ordinal: usize,

    /// Whether the collaborator marked this as a test document
    #[serde(default)]
    pub test: bool,

    /// Imported module paths, e.g. `ballerina/test`
    #[serde(default)]
    pub imports: Vec<String>,

    /// Top-level declarations in source order
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

impl Document {
    /// Create an empty document
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ordinal: 0,
            test: false,
            imports: Vec::new(),
            declarations: Vec::new(),
        }
    }

    /// Add a declaration
    pub fn with_declaration(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Add an import
    pub fn with_import(mut self, import: impl Into<String>) -> Self {
        self.imports.push(import.into());
        self
    }

    /// Mark as a test document
    pub fn as_test(mut self) -> Self {
        self.test = true;
        self
    }

    /// Whether this document is a test part: flagged as such, or importing a
    /// module with a `test` path segment.
    pub fn is_test(&self) -> bool {
        self.test
            || self
                .imports
                .iter()
                .any(|import| import.split(['/', '.']).any(|segment| segment == "test"))
    }

    /// Propagate the document's test status into its function declarations
    pub fn mark_test_functions(&mut self) {
        if !self.is_test() {
            return;
        }
        for declaration in &mut self.declarations {
            if let Declaration::Function(func) = declaration {
                func.owner_module_part_is_test = true;
            }
        }
    }
}

/// A module of the package
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    /// Module name
    pub name: String,

    /// Whether this is the package's default (root) module
    pub is_default: bool,

    /// Documents ordered by ordinal
    pub documents: Vec<Document>,
}

impl Module {
    /// Create an empty module
    pub fn new(name: impl Into<String>, is_default: bool) -> Self {
        Self {
            name: name.into(),
            is_default,
            documents: Vec::new(),
        }
    }

    /// Append a document, assigning it the next ordinal
    pub fn push_document(&mut self, mut document: Document) {
        document.ordinal = self.documents.len();
        self.documents.push(document);
    }

    /// Non-test documents, those that count toward module completion
    pub fn countable_documents(&self) -> usize {
        self.documents.iter().filter(|doc| !doc.is_test()).count()
    }
}

/// Context handed to the classifier for one document
#[derive(Debug, Clone, Copy)]
pub struct DocumentContext<'a> {
    document: &'a Document,
    default_module: bool,
}

impl<'a> DocumentContext<'a> {
    /// Context for a document of a module
    pub fn new(document: &'a Document, default_module: bool) -> Self {
        Self {
            document,
            default_module,
        }
    }
}

impl DeclarationContext for DocumentContext<'_> {
    fn document_name(&self) -> &str {
        &self.document.name
    }

    fn is_test_document(&self) -> bool {
        self.document.is_test()
    }

    fn is_default_module(&self) -> bool {
        self.default_module
    }
}
