//! Type descriptors and the serializable type check
//!
//! A [`TypeDescriptor`] is the syntactic shape of a parameter type as written
//! in the source. Aliases are never resolved; only the descriptor itself is
//! inspected.
//!
//! # Textual form
//!
//! Descriptors round-trip through a compact textual form used by document
//! files and diagnostics:
//!
//! ```text
//! int            string[]          map<json>
//! record         table<map<int>>   xml
//! ```
//!
//! Anything that is not recognized becomes [`TypeDescriptor::Other`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Built-in primitive type kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// `boolean`
    Boolean,
    /// `int`
    Int,
    /// `float`
    Float,
    /// `decimal`
    Decimal,
    /// `byte`
    Byte,
    /// `string`
    String,
    /// `json`
    Json,
    /// `()`
    Nil,
    /// `any`
    Any,
    /// `anydata`
    Anydata,
    /// `xml`
    Xml,
    /// `error`
    Error,
    /// `handle`
    Handle,
}

impl PrimitiveKind {
    /// Keyword used for this kind in source
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Decimal => "decimal",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::String => "string",
            PrimitiveKind::Json => "json",
            PrimitiveKind::Nil => "()",
            PrimitiveKind::Any => "any",
            PrimitiveKind::Anydata => "anydata",
            PrimitiveKind::Xml => "xml",
            PrimitiveKind::Error => "error",
            PrimitiveKind::Handle => "handle",
        }
    }

    fn from_keyword(keyword: &str) -> Option<Self> {
        let kind = match keyword {
            "boolean" => PrimitiveKind::Boolean,
            "int" => PrimitiveKind::Int,
            "float" => PrimitiveKind::Float,
            "decimal" => PrimitiveKind::Decimal,
            "byte" => PrimitiveKind::Byte,
            "string" => PrimitiveKind::String,
            "json" => PrimitiveKind::Json,
            "()" => PrimitiveKind::Nil,
            "any" => PrimitiveKind::Any,
            "anydata" => PrimitiveKind::Anydata,
            "xml" => PrimitiveKind::Xml,
            "error" => PrimitiveKind::Error,
            "handle" => PrimitiveKind::Handle,
            _ => return None,
        };
        Some(kind)
    }
}

/// Syntactic type descriptor of a parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeDescriptor {
    /// Built-in primitive
    Primitive(PrimitiveKind),
    /// `T[]`
    Array(Box<TypeDescriptor>),
    /// `map<T>`
    Map(Box<TypeDescriptor>),
    /// `table<R>`
    Table(Box<TypeDescriptor>),
    /// Inline or generic record
    Record,
    /// Any other descriptor, kept verbatim
    Other(String),
}

/// Shape of a descriptor, ignoring its type parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Primitive of the given kind
    Primitive(PrimitiveKind),
    /// Array shape
    Array,
    /// Map shape
    Map,
    /// Table shape
    Table,
    /// Record shape
    Record,
    /// Unrecognized shape
    Other,
}

/// Kinds the HTTP binding can convert to and from JSON in one hop.
pub const SERIALIZABLE_KINDS: [TypeKind; 9] = [
    TypeKind::Primitive(PrimitiveKind::Boolean),
    TypeKind::Primitive(PrimitiveKind::Int),
    TypeKind::Primitive(PrimitiveKind::Float),
    TypeKind::Primitive(PrimitiveKind::Decimal),
    TypeKind::Primitive(PrimitiveKind::Byte),
    TypeKind::Primitive(PrimitiveKind::String),
    TypeKind::Primitive(PrimitiveKind::Json),
    TypeKind::Map,
    TypeKind::Record,
];

impl TypeDescriptor {
    /// Shorthand for a primitive descriptor
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeDescriptor::Primitive(kind)
    }

    /// Shorthand for `T[]`
    pub fn array_of(element: TypeDescriptor) -> Self {
        TypeDescriptor::Array(Box::new(element))
    }

    /// Shorthand for `map<T>`
    pub fn map_of(value: TypeDescriptor) -> Self {
        TypeDescriptor::Map(Box::new(value))
    }

    /// Shorthand for `table<R>`
    pub fn table_of(row: TypeDescriptor) -> Self {
        TypeDescriptor::Table(Box::new(row))
    }

    /// Shape of this descriptor
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeDescriptor::Primitive(kind) => TypeKind::Primitive(*kind),
            TypeDescriptor::Array(_) => TypeKind::Array,
            TypeDescriptor::Map(_) => TypeKind::Map,
            TypeDescriptor::Table(_) => TypeKind::Table,
            TypeDescriptor::Record => TypeKind::Record,
            TypeDescriptor::Other(_) => TypeKind::Other,
        }
    }

    /// Whether the descriptor can be bound from a JSON payload.
    ///
    /// Arrays, maps and tables are unwrapped exactly one level: the member
    /// is accepted on its shape alone, without looking inside it.
    pub fn is_serializable(&self) -> bool {
        match self {
            TypeDescriptor::Primitive(_) => has_serializable_kind(self),
            TypeDescriptor::Array(element) => has_serializable_kind(element),
            TypeDescriptor::Map(value) => has_serializable_kind(value),
            TypeDescriptor::Table(row) => match row.as_ref() {
                TypeDescriptor::Map(value) => has_serializable_kind(value),
                _ => false,
            },
            TypeDescriptor::Record => true,
            TypeDescriptor::Other(_) => false,
        }
    }
}

fn has_serializable_kind(descriptor: &TypeDescriptor) -> bool {
    SERIALIZABLE_KINDS.contains(&descriptor.kind())
}

/// Free-function form of [`TypeDescriptor::is_serializable`]
pub fn is_serializable(descriptor: &TypeDescriptor) -> bool {
    descriptor.is_serializable()
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(kind) => f.write_str(kind.keyword()),
            TypeDescriptor::Array(element) => write!(f, "{}[]", element),
            TypeDescriptor::Map(value) => write!(f, "map<{}>", value),
            TypeDescriptor::Table(row) => write!(f, "table<{}>", row),
            TypeDescriptor::Record => f.write_str("record"),
            TypeDescriptor::Other(raw) => f.write_str(raw),
        }
    }
}

/// Deepest `[]`, `map<..>` or `table<..>` nesting accepted by the parser
pub const MAX_NESTING: usize = 32;

impl FromStr for TypeDescriptor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_nested(s, 0)
    }
}

fn parse_nested(s: &str, depth: usize) -> Result<TypeDescriptor> {
    let text = s.trim();
    if text.is_empty() {
        return Err(Error::InvalidTypeDescriptor {
            descriptor: s.to_string(),
            message: "empty type descriptor".to_string(),
        });
    }

    let is_wrapper = text.ends_with("[]") || text.starts_with("map") || text.starts_with("table");
    if is_wrapper && depth >= MAX_NESTING {
        return Err(Error::InvalidTypeDescriptor {
            descriptor: truncated(text),
            message: "type nesting too deep".to_string(),
        });
    }

    if let Some(element) = text.strip_suffix("[]") {
        return Ok(TypeDescriptor::array_of(parse_nested(element, depth + 1)?));
    }
    if let Some(inner) = type_parameter(text, "map")? {
        return Ok(TypeDescriptor::map_of(parse_nested(inner, depth + 1)?));
    }
    if let Some(inner) = type_parameter(text, "table")? {
        return Ok(TypeDescriptor::table_of(parse_nested(inner, depth + 1)?));
    }
    if text == "record" || (text.starts_with("record") && text.ends_with('}')) {
        return Ok(TypeDescriptor::Record);
    }

    Ok(PrimitiveKind::from_keyword(text)
        .map(TypeDescriptor::Primitive)
        .unwrap_or_else(|| TypeDescriptor::Other(text.to_string())))
}

/// Descriptor text for error messages, capped at 64 characters
fn truncated(text: &str) -> String {
    match text.char_indices().nth(64) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

/// Returns the text between `<` and the closing `>` of `keyword<...>`.
fn type_parameter<'a>(text: &'a str, keyword: &str) -> Result<Option<&'a str>> {
    let Some(rest) = text.strip_prefix(keyword) else {
        return Ok(None);
    };
    let Some(rest) = rest.trim_start().strip_prefix('<') else {
        return Ok(None);
    };
    match rest.strip_suffix('>') {
        Some(inner) if !inner.trim().is_empty() => Ok(Some(inner)),
        _ => Err(Error::InvalidTypeDescriptor {
            descriptor: truncated(text),
            message: format!("unterminated `{}<...>` type parameter", keyword),
        }),
    }
}

impl TryFrom<String> for TypeDescriptor {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TypeDescriptor> for String {
    fn from(value: TypeDescriptor) -> Self {
        value.to_string()
    }
}
