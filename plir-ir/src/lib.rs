//! Print Lowering IR - Intermediate Representation
//! 
//! A small structured IR: modules own external declarations, global
//! constants and function definitions; functions own basic blocks of
//! operations, and `for` operations own a nested body, so a function is
//! walked as a tree.
//! 
//! ## Architecture
//! 
//! - `types` - Type system (IrType)
//! - `values` - Value representations
//! - `attributes` - Named operation attributes
//! - `ops` - Binary operations
//! - `instructions` - Instructions and the `Operation` node wrapping them
//! - `blocks` - Basic block management
//! - `function` - Function definitions, tree walks, insertion and erasure
//! - `symbols` - Per-module symbol namespace
//! - `module` - Module, declarations, globals and the module scope
//! - `builder` - IR construction utilities

pub use self::types::IrType;
pub use self::values::Value;
pub use self::attributes::{Attribute, AttributeMap, StringAttr, lookup_string_attr};
pub use self::ops::IrBinaryOp;
pub use self::instructions::{Instruction, Operation, OpId};
pub use self::blocks::BasicBlock;
pub use self::function::Function;
pub use self::symbols::{SymbolKind, SymbolTable, Interned};
pub use self::module::{Module, ModuleScope, FunctionDecl, GlobalVariable, Linkage};
pub use self::builder::{IrBuilder, OpBuilder};
pub use self::error::IrError;

mod types;
mod values;
mod attributes;
mod ops;
mod instructions;
mod blocks;
mod function;
mod symbols;
mod module;
mod builder;
mod error;
