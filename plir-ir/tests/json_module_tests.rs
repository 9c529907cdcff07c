//! Loading and saving modules as JSON

use plir_ir::{Instruction, IrError, Module, SymbolKind, Value};
use pretty_assertions::assert_eq;

const KERNEL: &str = r#"{
  "name": "kernel",
  "declarations": [
    { "name": "puts", "return_type": "I32", "param_types": [{ "Ptr": "I8" }], "is_vararg": false }
  ],
  "functions": [
    {
      "name": "main",
      "return_type": "Void",
      "parameters": [[0, "F64"]],
      "blocks": [
        {
          "id": 0,
          "operations": [
            {
              "inst": {
                "Print": {
                  "args": [{ "Temp": 0 }],
                  "attributes": { "format": { "String": "%f\n" } }
                }
              },
              "location": { "filename": "kernel.mlir", "line": 2, "column": 3 }
            },
            { "inst": { "Print": { "args": [] } } },
            { "inst": { "Return": null } }
          ]
        }
      ]
    }
  ]
}"#;

#[test]
fn test_load_module_builds_symbols_and_ids() {
    let module = Module::from_json(KERNEL).unwrap();

    assert_eq!(module.symbols().lookup("main"), Some(SymbolKind::Function));
    assert_eq!(module.symbols().lookup("puts"), Some(SymbolKind::Declaration));
    assert!(module.globals().is_empty());

    let main = module.get_function("main").unwrap();
    let prints = main.collect_ops(|op| op.inst.is_print());
    assert_eq!(prints.len(), 2);
    assert_ne!(prints[0], prints[1]);

    let first = main.find_op(prints[0]).unwrap();
    assert_eq!(first.location.as_ref().map(|l| l.line), Some(2));
    assert!(matches!(&first.inst, Instruction::Print { args, .. } if args == &[Value::Temp(0)]));
}

#[test]
fn test_round_trip_preserves_module() {
    let module = Module::from_json(KERNEL).unwrap();
    let reloaded = Module::from_json(&module.to_json().unwrap()).unwrap();
    assert_eq!(reloaded, module);
}

#[test]
fn test_duplicate_names_are_rejected() {
    let text = r#"{
      "name": "dup",
      "globals": [
        {
          "name": "main", "var_type": "I32", "is_constant": false,
          "initializer": null, "linkage": "Internal"
        }
      ],
      "functions": [
        { "name": "main", "return_type": "Void", "parameters": [], "blocks": [] }
      ]
    }"#;

    let err = Module::from_json(text).unwrap_err();
    assert!(matches!(err, IrError::Json(_)));
    assert!(err.to_string().contains("Duplicate symbol 'main'"));
}
