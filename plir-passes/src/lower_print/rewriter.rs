use log::trace;
use plir_common::SourceLocation;
use plir_ir::{
    lookup_string_attr, Function, Instruction, IrError, IrType, ModuleScope, OpBuilder, OpId,
    StringAttr,
};
use super::interner::{
    check_string_global_name, format_global_name, get_or_create_global_string, get_or_insert_printf,
};
use super::{LowerError, LowerPrintOptions, FORMAT_ATTR};

/// Replace-in-place half of lowering one print: emit the `printf` call
/// (and the format pointer it needs) right before the print.
///
/// The print itself is left where it is; erasing it is up to the caller.
pub fn lower_print(
    function: &mut Function,
    print: OpId,
    scope: &mut ModuleScope<'_>,
    options: &LowerPrintOptions,
) -> Result<(), LowerError> {
    let op = function
        .find_op(print)
        .ok_or_else(|| IrError::OperationNotFound { function: function.name.clone(), id: print })?;

    let (args, format) = match &op.inst {
        Instruction::Print { args, attributes } => {
            let format = match lookup_string_attr(attributes, FORMAT_ATTR) {
                StringAttr::Absent => options.default_format.clone(),
                StringAttr::Present(format) => format.to_string(),
                StringAttr::WrongKind(attr) => {
                    return Err(LowerError::FormatAttribute {
                        id: print,
                        location: op.location.clone().unwrap_or_else(SourceLocation::unknown),
                        found: attr.kind_name(),
                    });
                }
            };
            (args.clone(), format)
        }
        _ => return Err(LowerError::NotAPrint { id: print }),
    };

    let global_name = format_global_name(scope, &format, options.interning);
    check_string_global_name(scope, &global_name)?;
    let printf = get_or_insert_printf(scope)?;

    let mut builder = OpBuilder::before(function, print)?;
    let format_ptr = get_or_create_global_string(&mut builder, scope, &global_name, &format)?;

    let mut call_args = Vec::with_capacity(args.len() + 1);
    call_args.push(format_ptr);
    call_args.extend(args);
    builder.build_call(printf, call_args, IrType::I32)?;

    trace!("  {}: print {print} now calls printf with @{global_name}", builder.function().name);
    Ok(())
}
