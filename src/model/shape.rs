//! Shape tree describing an operation's input parameters

use serde::{Deserialize, Serialize};

use crate::generation::utils::to_exported_name;

/// A typed description of a value's structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    String,
    Integer,
    Float,
    Boolean,
    Timestamp,
    Enum {
        #[serde(default)]
        values: Vec<String>,
    },
    List {
        member: Box<ShapeRef>,
    },
    Map {
        key: Box<ShapeRef>,
        value: Box<ShapeRef>,
    },
    Structure {
        name: String,
        #[serde(default)]
        members: Vec<Member>,
    },
}

impl Shape {
    /// Short name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::String => "string",
            Shape::Integer => "integer",
            Shape::Float => "float",
            Shape::Boolean => "boolean",
            Shape::Timestamp => "timestamp",
            Shape::Enum { .. } => "enum",
            Shape::List { .. } => "list",
            Shape::Map { .. } => "map",
            Shape::Structure { .. } => "structure",
        }
    }
}

/// A reference to a shape from a member, list element or map value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRef {
    pub shape: Shape,
    /// Pointer-like reference; the encoded value is wrapped in an address-of form
    #[serde(default)]
    pub boxed: bool,
}

impl ShapeRef {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            boxed: false,
        }
    }

    pub fn boxed(shape: Shape) -> Self {
        Self { shape, boxed: true }
    }

    /// Whether `null` has a valid unset representation for this reference.
    ///
    /// Lists and maps are nil-able in Go even when not boxed.
    pub fn is_optional(&self) -> bool {
        self.boxed || matches!(self.shape, Shape::List { .. } | Shape::Map { .. })
    }
}

/// A named field of a structure shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Schema-level field name, matched against literal keys
    pub name: String,
    /// Exported identifier; derived from `name` when absent
    #[serde(default)]
    pub exported_name: Option<String>,
    pub target: ShapeRef,
}

impl Member {
    pub fn new(name: impl Into<String>, target: ShapeRef) -> Self {
        Self {
            name: name.into(),
            exported_name: None,
            target,
        }
    }

    pub fn exported_name(&self) -> String {
        self.exported_name
            .clone()
            .unwrap_or_else(|| to_exported_name(&self.name))
    }
}
