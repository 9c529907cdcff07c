//! Print Lowering IR - Module Passes
//! 
//! This crate provides the pass interface used by the driver and the
//! passes themselves. The main pass lowers high-level `print` operations
//! to calls to the C `printf` function.

pub mod pass;
pub mod lower_print;

pub use pass::{Pass, PassError, PassManager, PassRegistry};
pub use lower_print::{
    apply_lower_print_ops, apply_lower_print_ops_with, create_lower_print_ops_pass,
    FormatInterning, LowerError, LowerPrintOpsPass, LowerPrintOptions, LoweringReport,
};
