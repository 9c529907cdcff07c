//! IR Value Representations
//! 
//! Values used as operands: temporaries, constants, string data for
//! global initializers, and references to module-level symbols.

use plir_common::TempId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// IR Value - represents operands in IR instructions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Temporary variable
    Temp(TempId),
    
    /// Constant integer
    Constant(i64),

    /// Constant floating point number
    Float(f64),

    /// Raw string data (global initializers)
    ConstantString(String),
    
    /// Global symbol reference
    Global(String),
    
    /// Function reference
    Function(String),
    
    /// Undefined value (for uninitialized variables)
    Undef,
}

impl Value {
    pub fn as_temp(&self) -> Option<TempId> {
        match self {
            Value::Temp(id) => Some(*id),
            _ => None,
        }
    }
}

/// Escape string data the way LLVM prints `c"..."` literals
pub(crate) fn escape_bytes(data: &str) -> String {
    let mut escaped = String::with_capacity(data.len());
    for byte in data.bytes() {
        if byte == b'"' || byte == b'\\' || !(0x20..0x7f).contains(&byte) {
            escaped.push_str(&format!("\\{byte:02X}"));
        } else {
            escaped.push(byte as char);
        }
    }
    escaped
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Temp(id) => write!(f, "%{id}"),
            Value::Constant(val) => write!(f, "{val}"),
            Value::Float(val) => write!(f, "{val:?}"),
            Value::ConstantString(data) => write!(f, "c\"{}\"", escape_bytes(data)),
            Value::Global(name) => write!(f, "@{name}"),
            Value::Function(name) => write!(f, "@{name}"),
            Value::Undef => write!(f, "undef"),
        }
    }
}
