//! Lowering of high-level `print` operations to `printf` calls
//!
//! Every `print(args...) {format = "..."}` in a function body becomes
//!
//! ```text
//! %a = addressof @frmt_spec : [N x i8]*
//! %z = constant i64 0
//! %p = getelementptr %a, %z, %z : i8*
//! %r = call i32 @printf(%p, args...)
//! ```
//!
//! backed by a single `declare i32 @printf(i8*, ...)` and one internal
//! string constant per distinct format, both placed at the start of the
//! module. The pass is split in three layers: the interner (module-level
//! symbols), the rewriter (one print) and the dispatcher (one function).

mod error;
mod options;
mod interner;
mod rewriter;
mod dispatcher;
mod pass;

#[cfg(test)]
mod tests;

pub use self::error::LowerError;
pub use self::options::{FormatInterning, LowerPrintOptions};
pub use self::interner::{
    check_string_global_name, format_global_name, get_or_create_global_string, get_or_insert_printf,
    printf_declaration,
};
pub use self::rewriter::lower_print;
pub use self::dispatcher::{lower_prints_in_function, LoweringStats};
pub use self::pass::{
    apply_lower_print_ops, apply_lower_print_ops_with, create_lower_print_ops_pass,
    LowerPrintOpsPass, LoweringReport,
};

/// Name under which the pass is registered
pub const PASS_NAME: &str = "lower-print-ops";

/// Reserved name of the output primitive
pub const PRINTF_NAME: &str = "printf";

/// Reserved name (and name prefix) of interned format strings
pub const FORMAT_GLOBAL_PREFIX: &str = "frmt_spec";

/// Attribute holding a print's format string
pub const FORMAT_ATTR: &str = "format";

/// Format used by prints without a `format` attribute
pub const DEFAULT_FORMAT: &str = "%f ";
