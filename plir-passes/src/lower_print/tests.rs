//! Unit tests for the interner, rewriter and dispatcher

use super::*;
use plir_common::{ErrorReporter, SourceLocation};
use plir_ir::{
    Attribute, AttributeMap, Function, FunctionDecl, GlobalVariable, Instruction, IrBuilder,
    IrError, IrType, Linkage, Module, OpBuilder, OpId, Operation, SymbolKind, Value,
};
use pretty_assertions::assert_eq;

/// `main(%0: f64)` printing `%0` once, then returning
fn single_print(format: Option<&str>) -> Function {
    let mut builder = IrBuilder::new();
    builder.create_function("main", IrType::Void);
    let x = builder.add_parameter(IrType::F64).unwrap();
    builder.create_block(0).unwrap();
    builder.set_location(Some(SourceLocation::new("main.mlir", 4, 5)));
    builder.build_print(vec![Value::Temp(x)], format).unwrap();
    builder.set_location(None);
    builder.build_return(None).unwrap();
    builder.finish_function().unwrap()
}

fn module_with(functions: Vec<Function>) -> Module {
    let mut module = Module::new("test".to_string());
    for function in functions {
        module.add_function(function).unwrap();
    }
    module
}

fn instruction_kinds(function: &Function) -> Vec<&'static str> {
    let mut kinds = Vec::new();
    function.walk(&mut |op| {
        kinds.push(match &op.inst {
            Instruction::AddressOf { .. } => "addressof",
            Instruction::Constant { .. } => "constant",
            Instruction::GetElementPtr { .. } => "gep",
            Instruction::Call { .. } => "call",
            Instruction::Print { .. } => "print",
            Instruction::Return(_) => "ret",
            _ => "other",
        })
    });
    kinds
}

#[test]
fn test_printf_declared_once_at_front() {
    let mut module = Module::new("test".to_string());
    module
        .add_declaration(FunctionDecl::new("puts", IrType::I32, vec![IrType::byte_ptr()], false))
        .unwrap();

    let mut scope = module.scope();
    let first = get_or_insert_printf(&mut scope).unwrap();
    let second = get_or_insert_printf(&mut scope).unwrap();

    assert_eq!(first, Value::Function("printf".to_string()));
    assert_eq!(second, first);
    assert_eq!(module.declarations().len(), 2);
    assert_eq!(module.declarations()[0], printf_declaration());
    assert_eq!(module.symbols().lookup("printf"), Some(SymbolKind::Declaration));
}

#[test]
fn test_printf_reuses_matching_declaration() {
    let mut module = Module::new("test".to_string());
    module.add_declaration(printf_declaration()).unwrap();

    get_or_insert_printf(&mut module.scope()).unwrap();
    assert_eq!(module.declarations().len(), 1);
}

#[test]
fn test_printf_collides_with_other_signature() {
    let mut module = Module::new("test".to_string());
    module
        .add_declaration(FunctionDecl::new("printf", IrType::Void, vec![], false))
        .unwrap();

    let err = get_or_insert_printf(&mut module.scope()).unwrap_err();
    assert!(matches!(&err, LowerError::SymbolCollision { name, .. } if name == "printf"));
    assert!(err.to_string().contains("void ()"));
}

#[test]
fn test_printf_collides_with_global() {
    let mut module = Module::new("test".to_string());
    module.add_global(GlobalVariable::string_constant("printf", "x")).unwrap();

    let err = get_or_insert_printf(&mut module.scope()).unwrap_err();
    assert!(matches!(&err, LowerError::SymbolCollision { found, .. } if found == "a global"));
    assert!(module.declarations().is_empty());
}

#[test]
fn test_format_names_by_content() {
    let mut module = Module::new("test".to_string());
    {
        let scope = module.scope();
        assert_eq!(format_global_name(&scope, "%d\n", FormatInterning::ByContent), "frmt_spec");
    }

    module.add_global(GlobalVariable::string_constant("frmt_spec", "%d\n")).unwrap();
    module.add_function(Function::new("frmt_spec_1".to_string(), IrType::Void)).unwrap();
    let scope = module.scope();

    assert_eq!(format_global_name(&scope, "%d\n", FormatInterning::ByContent), "frmt_spec");
    assert_eq!(format_global_name(&scope, "%f\n", FormatInterning::ByContent), "frmt_spec_2");
    assert_eq!(format_global_name(&scope, "%f\n", FormatInterning::SharedName), "frmt_spec");
}

#[test]
fn test_format_names_ignore_unrelated_globals() {
    let mut module = Module::new("test".to_string());
    module.add_global(GlobalVariable::string_constant("greeting", "%d\n")).unwrap();
    module.add_global(GlobalVariable::string_constant("frmt_spec_x", "%d\n")).unwrap();

    let scope = module.scope();
    assert_eq!(format_global_name(&scope, "%d\n", FormatInterning::ByContent), "frmt_spec");
}

#[test]
fn test_global_string_emits_address_on_every_call() {
    let mut module = module_with(vec![single_print(None)]);
    let (functions, mut scope) = module.split_mut();
    let function = &mut functions[0];
    let print = function.collect_ops(|op| op.inst.is_print())[0];

    let mut builder = OpBuilder::before(function, print).unwrap();
    let first = get_or_create_global_string(&mut builder, &mut scope, "frmt_spec", "%d").unwrap();
    let second = get_or_create_global_string(&mut builder, &mut scope, "frmt_spec", "%d").unwrap();

    assert_eq!(first, Value::Temp(3));
    assert_eq!(second, Value::Temp(6));
    assert_eq!(scope.globals().len(), 1);
    assert_eq!(
        instruction_kinds(function),
        vec!["addressof", "constant", "gep", "addressof", "constant", "gep", "print", "ret"]
    );

    let ops = &function.blocks[0].operations;
    assert_eq!(
        ops[0].inst,
        Instruction::AddressOf {
            result: 1,
            global: "frmt_spec".to_string(),
            result_type: IrType::ptr_to(IrType::byte_array(2)),
        }
    );
    assert_eq!(
        ops[2].inst,
        Instruction::GetElementPtr {
            result: 3,
            ptr: Value::Temp(1),
            indices: vec![Value::Temp(2), Value::Temp(2)],
            result_type: IrType::byte_ptr(),
        }
    );
    // emitted code carries the location of the print it serves
    assert_eq!(ops[0].location, Some(SourceLocation::new("main.mlir", 4, 5)));
}

#[test]
fn test_global_string_keeps_existing_content() {
    let mut module = module_with(vec![single_print(None)]);
    module.add_global(GlobalVariable::string_constant("frmt_spec", "%d\n")).unwrap();
    let (functions, mut scope) = module.split_mut();
    let function = &mut functions[0];
    let print = function.collect_ops(|op| op.inst.is_print())[0];

    let mut builder = OpBuilder::before(function, print).unwrap();
    get_or_create_global_string(&mut builder, &mut scope, "frmt_spec", "%s").unwrap();

    assert_eq!(scope.globals().len(), 1);
    assert_eq!(scope.global("frmt_spec").and_then(|g| g.string_content()), Some("%d\n"));
    // the address computation is typed after the stored array
    assert!(matches!(
        &function.blocks[0].operations[0].inst,
        Instruction::AddressOf { result_type, .. }
            if *result_type == IrType::ptr_to(IrType::byte_array(3))
    ));
}

#[test]
fn test_global_string_collisions() {
    let mut mutable = GlobalVariable::string_constant("frmt_spec", "%d");
    mutable.is_constant = false;
    mutable.linkage = Linkage::External;

    let mut module = module_with(vec![single_print(None)]);
    module.add_global(mutable).unwrap();
    module.add_declaration(FunctionDecl::new("frmt_spec_1", IrType::Void, vec![], false)).unwrap();
    let (functions, mut scope) = module.split_mut();
    let function = &mut functions[0];
    let print = function.collect_ops(|op| op.inst.is_print())[0];
    let mut builder = OpBuilder::before(function, print).unwrap();

    for name in ["frmt_spec", "frmt_spec_1", "main"] {
        let err = get_or_create_global_string(&mut builder, &mut scope, name, "%d").unwrap_err();
        assert!(matches!(err, LowerError::SymbolCollision { .. }), "{name}: {err}");
    }
    assert_eq!(function.operation_count(), 2);
}

#[test]
fn test_lower_print_emits_call_before_print() {
    let mut module = module_with(vec![single_print(Some("%d\n"))]);
    let (functions, mut scope) = module.split_mut();
    let function = &mut functions[0];
    let print = function.collect_ops(|op| op.inst.is_print())[0];

    lower_print(function, print, &mut scope, &LowerPrintOptions::default()).unwrap();

    assert_eq!(
        instruction_kinds(function),
        vec!["addressof", "constant", "gep", "call", "print", "ret"]
    );
    assert_eq!(
        function.blocks[0].operations[3].inst,
        Instruction::Call {
            result: Some(4),
            function: Value::Function("printf".to_string()),
            args: vec![Value::Temp(3), Value::Temp(0)],
            result_type: IrType::I32,
        }
    );
}

#[test]
fn test_lower_print_uses_configured_default_format() {
    let mut module = module_with(vec![single_print(None)]);
    let options = LowerPrintOptions {
        default_format: "%g\n".to_string(),
        ..LowerPrintOptions::default()
    };
    let (functions, mut scope) = module.split_mut();
    let print = functions[0].collect_ops(|op| op.inst.is_print())[0];

    lower_print(&mut functions[0], print, &mut scope, &options).unwrap();
    assert_eq!(scope.global("frmt_spec").and_then(|g| g.string_content()), Some("%g\n"));
}

#[test]
fn test_lower_print_rejects_other_operations() {
    let mut module = module_with(vec![single_print(None)]);
    let (functions, mut scope) = module.split_mut();
    let ret = functions[0].collect_ops(|op| op.inst.is_terminator())[0];

    let err = lower_print(&mut functions[0], ret, &mut scope, &LowerPrintOptions::default())
        .unwrap_err();
    assert!(matches!(err, LowerError::NotAPrint { id } if id == ret));
    assert!(scope.lookup("printf").is_none());
}

#[test]
fn test_lower_print_wrong_format_kind() {
    let mut attributes = AttributeMap::new();
    attributes.insert(FORMAT_ATTR.to_string(), Attribute::Integer(7));

    let mut builder = IrBuilder::new();
    builder.create_function("main", IrType::Void);
    builder.create_block(0).unwrap();
    builder.set_location(Some(SourceLocation::new("bad.mlir", 9, 1)));
    builder.build_print_with_attributes(vec![], attributes).unwrap();
    let mut module = module_with(vec![builder.finish_function().unwrap()]);

    let (functions, mut scope) = module.split_mut();
    let print = functions[0].collect_ops(|op| op.inst.is_print())[0];
    let err = lower_print(&mut functions[0], print, &mut scope, &LowerPrintOptions::default())
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        format!("bad.mlir:9:1: 'format' attribute of print {print} must be a string, found integer")
    );
    assert_eq!(functions[0].operation_count(), 1);
    assert!(scope.lookup("printf").is_none());
}

#[test]
fn test_dispatcher_skips_bad_print_and_lowers_the_rest() {
    let mut attributes = AttributeMap::new();
    attributes.insert(FORMAT_ATTR.to_string(), Attribute::Bool(true));

    let mut builder = IrBuilder::new();
    builder.create_function("main", IrType::Void);
    builder.create_block(0).unwrap();
    builder.build_print(vec![Value::Constant(1)], Some("%d")).unwrap();
    builder.build_print_with_attributes(vec![], attributes).unwrap();
    builder.build_print(vec![Value::Constant(2)], Some("%d")).unwrap();
    builder.build_return(None).unwrap();
    let mut module = module_with(vec![builder.finish_function().unwrap()]);

    let mut reporter = ErrorReporter::new();
    let (functions, mut scope) = module.split_mut();
    let stats = lower_prints_in_function(
        &mut functions[0],
        &mut scope,
        &LowerPrintOptions::default(),
        &mut reporter,
    )
    .unwrap();

    assert_eq!(stats, LoweringStats { lowered: 2, skipped: 1 });
    assert_eq!(reporter.error_count(), 1);
    assert!(reporter.diagnostics()[0].message.contains("found bool"));
    assert_eq!(
        instruction_kinds(&functions[0]),
        vec![
            "addressof", "constant", "gep", "call", "print", "addressof", "constant", "gep", "call",
            "ret",
        ]
    );
}

#[test]
fn test_dispatcher_without_prints_touches_nothing() {
    let mut builder = IrBuilder::new();
    builder.create_function("empty", IrType::Void);
    builder.create_block(0).unwrap();
    builder.build_return(None).unwrap();
    let mut module = module_with(vec![builder.finish_function().unwrap()]);
    let before = module.clone();

    let mut reporter = ErrorReporter::new();
    let (functions, mut scope) = module.split_mut();
    let stats = lower_prints_in_function(
        &mut functions[0],
        &mut scope,
        &LowerPrintOptions::default(),
        &mut reporter,
    )
    .unwrap();

    assert_eq!(stats, LoweringStats::default());
    assert_eq!(module, before);
}

#[test]
fn test_dispatcher_keeps_unnumbered_ops_without_prints() {
    let mut builder = IrBuilder::new();
    builder.create_function("idle", IrType::Void);
    builder.create_block(0).unwrap();
    builder.build_return(None).unwrap();
    let mut module = module_with(vec![builder.finish_function().unwrap()]);
    let idle = module.get_function_mut("idle").unwrap();
    idle.blocks[0]
        .operations
        .insert(0, Operation::new(Instruction::Comment("added late".to_string())));
    let before = module.clone();

    let mut reporter = ErrorReporter::new();
    let (functions, mut scope) = module.split_mut();
    let stats = lower_prints_in_function(
        &mut functions[0],
        &mut scope,
        &LowerPrintOptions::default(),
        &mut reporter,
    )
    .unwrap();

    assert_eq!(stats, LoweringStats::default());
    assert_eq!(module, before);
    assert_eq!(module.functions()[0].blocks[0].operations[0].id, OpId::default());
}

#[test]
fn test_shared_name_collision_declares_nothing() {
    let mut builder = IrBuilder::new();
    builder.create_function("frmt_spec", IrType::Void);
    builder.create_block(0).unwrap();
    builder.build_return(None).unwrap();
    let shadow = builder.finish_function().unwrap();
    let mut module = module_with(vec![single_print(Some("%f\n")), shadow]);
    let options = LowerPrintOptions {
        interning: FormatInterning::SharedName,
        ..LowerPrintOptions::default()
    };

    let (functions, mut scope) = module.split_mut();
    let print = functions[0].collect_ops(|op| op.inst.is_print())[0];
    let err = lower_print(&mut functions[0], print, &mut scope, &options).unwrap_err();

    assert!(
        matches!(&err, LowerError::SymbolCollision { name, .. } if name == "frmt_spec"),
        "{err}"
    );
    assert!(scope.lookup("printf").is_none());
    assert_eq!(functions[0].operation_count(), 2);
    assert!(module.declarations().is_empty());
}

#[test]
fn test_erase_failure_does_not_hide_first_error() {
    let collision = LowerError::SymbolCollision {
        name: "printf".to_string(),
        found: "a global".to_string(),
        expected: "a function declaration".to_string(),
    };
    let erase = LowerError::Erase {
        id: OpId(3),
        source: IrError::OperationNotFound { function: "main".to_string(), id: OpId(3) },
    };

    let err = dispatcher::first_error(Some(collision), Err(erase)).unwrap_err();
    assert!(matches!(&err, LowerError::SymbolCollision { name, .. } if name == "printf"), "{err}");

    let erase = LowerError::Erase {
        id: OpId(3),
        source: IrError::OperationNotFound { function: "main".to_string(), id: OpId(3) },
    };
    let err = dispatcher::first_error(None, Err(erase)).unwrap_err();
    assert!(matches!(err, LowerError::Erase { id, .. } if id == OpId(3)));
    assert!(dispatcher::first_error(None, Ok(())).is_ok());
}

#[test]
fn test_interning_mode_parsing() {
    assert_eq!("by-content".parse::<FormatInterning>(), Ok(FormatInterning::ByContent));
    assert_eq!("shared-name".parse::<FormatInterning>(), Ok(FormatInterning::SharedName));
    assert!("by-name".parse::<FormatInterning>().is_err());
    assert_eq!(FormatInterning::SharedName.to_string(), "shared-name");
}
