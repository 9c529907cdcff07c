//! IR Type System
//! 
//! Integer, floating point, pointer, array and function types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// IR Type system
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrType {
    /// Void type
    Void,
    
    /// Integer types with bit width
    I1,
    I8,
    I16,
    I32,
    I64,

    /// Floating point types
    F32,
    F64,

    /// Target-sized integer used for loop bounds and indices
    Index,
    
    /// Pointer type
    Ptr(Box<IrType>),
    
    /// Array type [size x element_type]
    Array { size: u64, element_type: Box<IrType> },
    
    /// Function type
    Function {
        return_type: Box<IrType>,
        param_types: Vec<IrType>,
        is_vararg: bool,
    },
}

impl IrType {
    /// Pointer to `target`
    pub fn ptr_to(target: IrType) -> Self {
        IrType::Ptr(Box::new(target))
    }

    /// `i8*`, the C string pointer type
    pub fn byte_ptr() -> Self {
        Self::ptr_to(IrType::I8)
    }

    /// `[size x i8]`
    pub fn byte_array(size: u64) -> Self {
        IrType::Array { size, element_type: Box::new(IrType::I8) }
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrType::Void => write!(f, "void"),
            IrType::I1 => write!(f, "i1"),
            IrType::I8 => write!(f, "i8"),
            IrType::I16 => write!(f, "i16"),
            IrType::I32 => write!(f, "i32"),
            IrType::I64 => write!(f, "i64"),
            IrType::F32 => write!(f, "f32"),
            IrType::F64 => write!(f, "f64"),
            IrType::Index => write!(f, "index"),
            IrType::Ptr(target) => write!(f, "{target}*"),
            IrType::Array { size, element_type } => write!(f, "[{size} x {element_type}]"),
            IrType::Function { return_type, param_types, is_vararg } => {
                write!(f, "{return_type} (")?;
                for (i, param) in param_types.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{param}")?;
                }
                if *is_vararg {
                    if !param_types.is_empty() { write!(f, ", ")?; }
                    write!(f, "...")?;
                }
                write!(f, ")")
            }
        }
    }
}
