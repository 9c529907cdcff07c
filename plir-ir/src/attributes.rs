//! Operation attributes
//! 
//! Attributes are named compile-time constants attached to an operation,
//! e.g. the `format` string of a print.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use crate::types::IrType;
use crate::values::escape_bytes;

/// Attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Attribute {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Type(IrType),
}

/// Attribute name -> value, ordered so printing is deterministic
pub type AttributeMap = BTreeMap<String, Attribute>;

impl Attribute {
    /// Short name of the attribute's kind for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Attribute::String(_) => "string",
            Attribute::Integer(_) => "integer",
            Attribute::Float(_) => "float",
            Attribute::Bool(_) => "bool",
            Attribute::Type(_) => "type",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::String(s) => write!(f, "\"{}\"", escape_bytes(s)),
            Attribute::Integer(v) => write!(f, "{v}"),
            Attribute::Float(v) => write!(f, "{v:?}"),
            Attribute::Bool(v) => write!(f, "{v}"),
            Attribute::Type(ty) => write!(f, "{ty}"),
        }
    }
}

/// Result of looking up an attribute that is expected to hold a string
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StringAttr<'a> {
    Absent,
    Present(&'a str),
    /// The attribute exists but holds something other than a string
    WrongKind(&'a Attribute),
}

pub fn lookup_string_attr<'a>(attributes: &'a AttributeMap, name: &str) -> StringAttr<'a> {
    match attributes.get(name) {
        None => StringAttr::Absent,
        Some(Attribute::String(value)) => StringAttr::Present(value),
        Some(other) => StringAttr::WrongKind(other),
    }
}
