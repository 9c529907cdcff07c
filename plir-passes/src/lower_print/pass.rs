use log::{debug, error, info};
use plir_common::ErrorReporter;
use plir_ir::Module;
use crate::pass::{Pass, PassError};
use super::dispatcher::lower_prints_in_function;
use super::{LowerError, LowerPrintOptions, PASS_NAME};

/// Outcome of lowering one module
#[derive(Debug, Default)]
pub struct LoweringReport {
    pub lowered: usize,
    pub skipped: usize,
    /// Functions processed, including the one that failed
    pub functions: usize,
    pub diagnostics: ErrorReporter,
    /// The error that stopped the lowering, if any
    pub error: Option<LowerError>,
}

impl LoweringReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none() && !self.diagnostics.has_errors()
    }
}

/// Lower the prints of every function in `module`, in declaration order.
///
/// Stops at the first function that fails; functions after it keep their
/// prints.
pub fn apply_lower_print_ops_with(
    module: &mut Module,
    options: &LowerPrintOptions,
) -> LoweringReport {
    info!("Lowering print operations in module '{}'", module.name);
    let mut report = LoweringReport::default();
    let (functions, mut scope) = module.split_mut();

    for function in functions.iter_mut() {
        report.functions += 1;
        match lower_prints_in_function(function, &mut scope, options, &mut report.diagnostics) {
            Ok(stats) => {
                report.lowered += stats.lowered;
                report.skipped += stats.skipped;
            }
            Err(err) => {
                debug!("Stopping at function '{}'", function.name);
                report.error = Some(err);
                break;
            }
        }
    }

    info!(
        "Lowered {} print operation(s) in {} function(s)",
        report.lowered, report.functions
    );
    report
}

/// Lower with the default options; `true` on success.
pub fn apply_lower_print_ops(module: &mut Module) -> bool {
    let report = apply_lower_print_ops_with(module, &LowerPrintOptions::default());
    for diagnostic in report.diagnostics.diagnostics() {
        error!("{diagnostic}");
    }
    if let Some(err) = &report.error {
        error!("{err}");
    }
    report.succeeded()
}

/// Pass wrapper around the print lowering
#[derive(Debug, Clone, Default)]
pub struct LowerPrintOpsPass {
    options: LowerPrintOptions,
}

impl LowerPrintOpsPass {
    pub fn new(options: LowerPrintOptions) -> Self {
        Self { options }
    }
}

impl Pass for LowerPrintOpsPass {
    fn name(&self) -> &'static str {
        PASS_NAME
    }

    fn run_on_module(&mut self, module: &mut Module) -> Result<(), PassError> {
        let report = apply_lower_print_ops_with(module, &self.options);
        if report.succeeded() {
            return Ok(());
        }

        let message = match &report.error {
            Some(err) => err.to_string(),
            None => format!("{} print operation(s) could not be lowered", report.skipped),
        };
        Err(PassError::Failed {
            pass: PASS_NAME,
            message,
            diagnostics: report.diagnostics.diagnostics().to_vec(),
        })
    }
}

pub fn create_lower_print_ops_pass() -> Box<dyn Pass> {
    Box::new(LowerPrintOpsPass::default())
}
