use log::{debug, error, trace};
use plir_common::{Diagnostic, ErrorReporter, SourceSpan};
use plir_ir::{Function, ModuleScope, OpId};
use super::rewriter::lower_print;
use super::{LowerError, LowerPrintOptions};

/// Per-function counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoweringStats {
    /// Prints replaced by a `printf` call
    pub lowered: usize,
    /// Prints left in place after a per-operation error
    pub skipped: usize,
}

/// Lower every print in `function`.
///
/// All prints are collected (pre-order) before anything is rewritten.
/// A print whose `format` attribute is not a string is reported to
/// `reporter` and left alone; any other error stops the function. Prints
/// that were lowered are erased in reverse discovery order in both cases.
/// A function without prints is not touched at all.
pub fn lower_prints_in_function(
    function: &mut Function,
    scope: &mut ModuleScope<'_>,
    options: &LowerPrintOptions,
    reporter: &mut ErrorReporter,
) -> Result<LoweringStats, LowerError> {
    let mut has_prints = false;
    function.walk(&mut |op| has_prints |= op.inst.is_print());
    if !has_prints {
        trace!("No print operations in '{}'", function.name);
        return Ok(LoweringStats::default());
    }

    function.assign_ids();
    let prints = function.collect_ops(|op| op.inst.is_print());
    debug!("Lowering {} print operation(s) in '{}'", prints.len(), function.name);

    let mut stats = LoweringStats::default();
    let mut lowered = Vec::with_capacity(prints.len());
    let mut failure = None;

    for &print in &prints {
        match lower_print(function, print, scope, options) {
            Ok(()) => lowered.push(print),
            Err(LowerError::FormatAttribute { id, location, found }) => {
                let diagnostic = Diagnostic::error(
                    format!("'format' attribute of print {id} must be a string, found {found}"),
                    SourceSpan::from_location(location),
                )
                .with_note(format!("print left in place in function '{}'", function.name));
                reporter.report(diagnostic);
                stats.skipped += 1;
            }
            Err(err) => {
                failure = Some(err);
                break;
            }
        }
    }

    let erased = erase_lowered(function, &lowered);
    stats.lowered = lowered.len();
    first_error(failure, erased).map(|()| stats)
}

fn erase_lowered(function: &mut Function, lowered: &[OpId]) -> Result<(), LowerError> {
    for &print in lowered.iter().rev() {
        function
            .erase_op(print)
            .map_err(|source| LowerError::Erase { id: print, source })?;
    }
    Ok(())
}

/// The error that stopped lowering wins over a later erase failure,
/// which is only logged.
pub(super) fn first_error(
    failure: Option<LowerError>,
    erased: Result<(), LowerError>,
) -> Result<(), LowerError> {
    match (failure, erased) {
        (Some(failure), Err(erase_error)) => {
            error!("{erase_error}");
            Err(failure)
        }
        (Some(failure), Ok(())) => Err(failure),
        (None, erased) => erased,
    }
}
