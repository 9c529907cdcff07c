//! Module-level symbols needed by lowered prints: the `printf`
//! declaration and the format string constants.

use log::warn;
use plir_ir::{
    FunctionDecl, GlobalVariable, Interned, IrType, ModuleScope, OpBuilder, SymbolKind, Value,
};
use super::{FormatInterning, LowerError, FORMAT_GLOBAL_PREFIX, PRINTF_NAME};

/// `declare i32 @printf(i8*, ...)`
pub fn printf_declaration() -> FunctionDecl {
    FunctionDecl::new(PRINTF_NAME, IrType::I32, vec![IrType::byte_ptr()], true)
}

/// Reference to `printf`, declaring it at the start of the module the
/// first time it is needed.
pub fn get_or_insert_printf(scope: &mut ModuleScope<'_>) -> Result<Value, LowerError> {
    let expected = printf_declaration();

    match scope.get_or_insert_declaration(PRINTF_NAME, || expected.clone()) {
        Interned::Created => {}
        Interned::Existing(SymbolKind::Declaration) => {
            let existing = scope.declaration(PRINTF_NAME);
            if existing.map(FunctionDecl::signature) != Some(expected.signature()) {
                let found = existing.map_or_else(
                    || "an unknown declaration".to_string(),
                    |decl| format!("a declaration of type {}", decl.signature()),
                );
                return Err(LowerError::SymbolCollision {
                    name: PRINTF_NAME.to_string(),
                    found,
                    expected: format!("{}", expected.signature()),
                });
            }
        }
        Interned::Existing(kind) => {
            return Err(LowerError::SymbolCollision {
                name: PRINTF_NAME.to_string(),
                found: describe(kind),
                expected: format!("{}", expected.signature()),
            });
        }
    }

    Ok(Value::Function(PRINTF_NAME.to_string()))
}

/// Fails if `name` is taken by anything other than a constant string
/// global, so the collision surfaces before any symbol is created.
pub fn check_string_global_name(scope: &ModuleScope<'_>, name: &str) -> Result<(), LowerError> {
    let found = match scope.lookup(name) {
        None => return Ok(()),
        Some(SymbolKind::Global) => match scope.global(name) {
            Some(global) if global.string_content().is_some() => return Ok(()),
            _ => "a global that is not a constant string".to_string(),
        },
        Some(kind) => describe(kind),
    };
    Err(LowerError::SymbolCollision {
        name: name.to_string(),
        found,
        expected: "a constant string".to_string(),
    })
}

/// Pointer to the first byte of the string global `name`, creating the
/// global with `content` if the name is free.
///
/// The address computation is emitted through `builder` on every call,
/// whether or not the global already existed. An existing global keeps
/// its contents.
pub fn get_or_create_global_string(
    builder: &mut OpBuilder<'_>,
    scope: &mut ModuleScope<'_>,
    name: &str,
    content: &str,
) -> Result<Value, LowerError> {
    check_string_global_name(scope, name)?;

    let interned =
        scope.get_or_insert_global(name, || GlobalVariable::string_constant(name, content));
    let existing = scope
        .global(name)
        .and_then(|global| global.string_content().map(|stored| (stored, global.var_type.clone())));
    let array_type = match (interned, existing) {
        (Interned::Existing(_), Some((stored, var_type))) => {
            if stored != content {
                warn!("Global '{name}' already holds {stored:?}; {content:?} is not stored");
            }
            var_type
        }
        _ => IrType::byte_array(content.len() as u64),
    };

    let global_ptr = builder.build_address_of(name, IrType::ptr_to(array_type))?;
    let zero = builder.build_constant(Value::Constant(0), IrType::I64)?;
    Ok(builder.build_gep(global_ptr, vec![zero.clone(), zero], IrType::byte_ptr())?)
}

/// Name of the global a format string is interned under
pub fn format_global_name(
    scope: &ModuleScope<'_>,
    content: &str,
    interning: FormatInterning,
) -> String {
    if interning == FormatInterning::SharedName {
        return FORMAT_GLOBAL_PREFIX.to_string();
    }

    let same_content = scope
        .globals()
        .iter()
        .find(|global| is_format_global(&global.name) && global.string_content() == Some(content));
    if let Some(global) = same_content {
        return global.name.clone();
    }

    let mut suffix = 0u32;
    loop {
        let name = if suffix == 0 {
            FORMAT_GLOBAL_PREFIX.to_string()
        } else {
            format!("{FORMAT_GLOBAL_PREFIX}_{suffix}")
        };
        if scope.lookup(&name).is_none() {
            return name;
        }
        suffix += 1;
    }
}

fn is_format_global(name: &str) -> bool {
    match name.strip_prefix(FORMAT_GLOBAL_PREFIX) {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix('_')
            .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())),
        None => false,
    }
}

fn describe(kind: SymbolKind) -> String {
    match kind {
        SymbolKind::Declaration => "an external declaration".to_string(),
        other => format!("a {other}"),
    }
}
