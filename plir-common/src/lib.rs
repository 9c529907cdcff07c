//! Print Lowering IR - Common Types and Utilities
//! 
//! This crate contains shared identifiers, source locations, error
//! definitions and diagnostic reporting used across the IR, the passes
//! and the driver.

pub mod error;
pub mod types;
pub mod source_loc;

pub use error::{CompilerError, Diagnostic, ErrorReporter, Severity};
pub use types::*;
pub use source_loc::{SourceLocation, SourceSpan};
