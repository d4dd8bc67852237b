//! Data types of properties, parameters and return values.
//!
//! A type string is either a primitive keyword (with aliases, matched
//! case-insensitively), the name of an enum or model declared in the same
//! definition, or `list:<type>` (nested to any depth). A single trailing `?`
//! marks the type as nullable.

use std::collections::HashSet;

use serde::{Serialize, Serializer};
use serde_json::{json, Value as JsonValue};

use crate::error::{Error, Result};

/// Prefix introducing a list type
pub const LIST_PREFIX: &str = "list:";

/// The fixed set of type variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    String,
    Boolean,
    Integer,
    Float,
    Double,
    Byte,
    Any,
    /// Reference to an enum of the owning definition, by name
    Enum(String),
    /// Reference to a model of the owning definition, by name
    Model(String),
    List(Box<DataType>),
}

/// A resolved, validated type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataType {
    pub kind: TypeKind,
    pub nullable: bool,
}

/// Names a type string may refer to besides the primitive keywords.
///
/// Collected from the raw document before any type is resolved so that all
/// enums and models of a definition can reference each other.
#[derive(Debug, Clone, Default)]
pub struct KnownNames {
    pub enums: HashSet<String>,
    pub models: HashSet<String>,
}

impl KnownNames {
    pub fn new<E, M>(enums: E, models: M) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            enums: enums.into_iter().map(Into::into).collect(),
            models: models.into_iter().map(Into::into).collect(),
        }
    }
}

impl TypeKind {
    /// Canonical name of the variant, as exposed to templates
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Double => "double",
            Self::Byte => "byte",
            Self::Any => "any",
            Self::Enum(_) => "enum",
            Self::Model(_) => "model",
            Self::List(_) => "list",
        }
    }

    fn from_keyword(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "string" | "str" => Some(Self::String),
            "boolean" | "bool" => Some(Self::Boolean),
            "integer" | "int" => Some(Self::Integer),
            "float" | "single" => Some(Self::Float),
            "double" => Some(Self::Double),
            "byte" => Some(Self::Byte),
            "any" => Some(Self::Any),
            _ => None,
        }
    }
}

impl DataType {
    pub fn new(kind: TypeKind, nullable: bool) -> Self {
        Self { kind, nullable }
    }

    /// Serializable descriptor: `{nullable, dataType, ...}` with `enumName`,
    /// `modelName` or a recursively described `itemType` where applicable.
    pub fn descriptor(&self) -> JsonValue {
        let mut descriptor = json!({
            "dataType": self.kind.as_str(),
            "nullable": self.nullable,
        });
        let extra = match &self.kind {
            TypeKind::Enum(name) => Some(("enumName", json!(name))),
            TypeKind::Model(name) => Some(("modelName", json!(name))),
            TypeKind::List(item) => Some(("itemType", item.descriptor())),
            TypeKind::String
            | TypeKind::Boolean
            | TypeKind::Integer
            | TypeKind::Float
            | TypeKind::Double
            | TypeKind::Byte
            | TypeKind::Any => None,
        };
        if let (Some((key, value)), Some(map)) = (extra, descriptor.as_object_mut()) {
            map.insert(key.to_string(), value);
        }
        descriptor
    }
}

impl Serialize for DataType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.descriptor().serialize(serializer)
    }
}

/// Resolve a type string against the enum and model names of a definition.
pub fn parse_type(raw: &str, known: &KnownNames) -> Result<DataType> {
    resolve(raw.trim(), known).ok_or_else(|| Error::UnsupportedType(raw.to_string()))
}

fn resolve(raw: &str, known: &KnownNames) -> Option<DataType> {
    let (name, nullable) = match raw.strip_suffix('?') {
        Some(stripped) => (stripped, true),
        None => (raw, false),
    };

    let kind = if let Some(kind) = TypeKind::from_keyword(name) {
        kind
    } else if known.enums.contains(name) {
        TypeKind::Enum(name.to_string())
    } else if known.models.contains(name) {
        TypeKind::Model(name.to_string())
    } else if let Some(item) = name.strip_prefix(LIST_PREFIX) {
        TypeKind::List(Box::new(resolve(item, known)?))
    } else {
        return None;
    };

    Some(DataType::new(kind, nullable))
}
