//! IR Instructions
//! 
//! Defines all instruction kinds available in the IR and the `Operation`
//! node that owns one inside a block.

use plir_common::{TempId, LabelId, SourceLocation};
use serde::{Deserialize, Serialize};
use std::fmt;
use crate::attributes::AttributeMap;
use crate::{Value, IrType, IrBinaryOp};

/// Per-function operation handle, stable across insertions and erasures
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct OpId(pub u32);

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// IR Instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// Binary operation: result = op lhs, rhs
    Binary {
        result: TempId,
        op: IrBinaryOp,
        lhs: Value,
        rhs: Value,
        result_type: IrType,
    },

    /// Materialize a constant: result = constant value
    Constant {
        result: TempId,
        value: Value,
        result_type: IrType,
    },

    /// Address of a module global: result = addressof @global
    AddressOf {
        result: TempId,
        global: String,
        result_type: IrType,
    },
    
    /// Get element pointer: result = getelementptr ptr, indices...
    GetElementPtr {
        result: TempId,
        ptr: Value,
        indices: Vec<Value>,
        result_type: IrType,
    },

    /// Load from memory: result = load ptr
    Load {
        result: TempId,
        ptr: Value,
        result_type: IrType,
    },
    
    /// Store to memory: store value, ptr
    Store {
        value: Value,
        ptr: Value,
    },
    
    /// Allocate stack memory: result = alloca type, count
    Alloca {
        result: TempId,
        alloc_type: IrType,
        count: Option<Value>,
        result_type: IrType,
    },
    
    /// Function call: result = call func(args...)
    Call {
        result: Option<TempId>,
        function: Value,
        args: Vec<Value>,
        result_type: IrType,
    },

    /// Structured counted loop; `induction` is defined inside `body` only
    For {
        induction: TempId,
        lower: Value,
        upper: Value,
        step: Value,
        body: Vec<Operation>,
    },

    /// High-level print of zero or more values, optionally formatted
    Print {
        args: Vec<Value>,
        #[serde(default)]
        attributes: AttributeMap,
    },
    
    /// Return: ret value or ret void
    Return(Option<Value>),
    
    /// Unconditional branch: br label
    Branch(LabelId),
    
    /// Conditional branch: br condition, true_label, false_label
    BranchCond {
        condition: Value,
        true_label: LabelId,
        false_label: LabelId,
    },
    
    /// Comment (for debugging)
    Comment(String),
}

impl Instruction {
    /// Temporary defined by this instruction, visible to later operations
    pub fn result(&self) -> Option<TempId> {
        match self {
            Instruction::Binary { result, .. }
            | Instruction::Constant { result, .. }
            | Instruction::AddressOf { result, .. }
            | Instruction::GetElementPtr { result, .. }
            | Instruction::Load { result, .. }
            | Instruction::Alloca { result, .. } => Some(*result),
            Instruction::Call { result, .. } => *result,
            _ => None,
        }
    }

    /// Values read by this instruction itself (nested bodies excluded)
    pub fn operands(&self) -> Vec<&Value> {
        match self {
            Instruction::Binary { lhs, rhs, .. } => vec![lhs, rhs],
            Instruction::Constant { value, .. } => vec![value],
            Instruction::AddressOf { .. } => Vec::new(),
            Instruction::GetElementPtr { ptr, indices, .. } => {
                std::iter::once(ptr).chain(indices.iter()).collect()
            }
            Instruction::Load { ptr, .. } => vec![ptr],
            Instruction::Store { value, ptr } => vec![value, ptr],
            Instruction::Alloca { count, .. } => count.iter().collect(),
            Instruction::Call { function, args, .. } => {
                std::iter::once(function).chain(args.iter()).collect()
            }
            Instruction::For { lower, upper, step, .. } => vec![lower, upper, step],
            Instruction::Print { args, .. } => args.iter().collect(),
            Instruction::Return(value) => value.iter().collect(),
            Instruction::BranchCond { condition, .. } => vec![condition],
            Instruction::Branch(_) | Instruction::Comment(_) => Vec::new(),
        }
    }

    pub fn body(&self) -> Option<&Vec<Operation>> {
        match self {
            Instruction::For { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn body_mut(&mut self) -> Option<&mut Vec<Operation>> {
        match self {
            Instruction::For { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_print(&self) -> bool {
        matches!(self, Instruction::Print { .. })
    }

    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            Instruction::Return(_) | Instruction::Branch(_) | Instruction::BranchCond { .. }
        )
    }
}

/// An instruction placed in a function, with its handle and location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(skip)]
    pub id: OpId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
    pub inst: Instruction,
}

impl Operation {
    /// Wrap an instruction; the id is assigned once it is placed in a function
    pub fn new(inst: Instruction) -> Self {
        Self { id: OpId::default(), location: None, inst }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

impl From<Instruction> for Operation {
    fn from(inst: Instruction) -> Self {
        Operation::new(inst)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, values: &[Value]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 { write!(f, ", ")?; }
        write!(f, "{value}")?;
    }
    Ok(())
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Binary { result, op, lhs, rhs, result_type } => {
                write!(f, "%{result} = {op} {result_type} {lhs}, {rhs}")
            }
            Instruction::Constant { result, value, result_type } => {
                write!(f, "%{result} = constant {result_type} {value}")
            }
            Instruction::AddressOf { result, global, result_type } => {
                write!(f, "%{result} = addressof @{global} : {result_type}")
            }
            Instruction::GetElementPtr { result, ptr, indices, result_type } => {
                write!(f, "%{result} = getelementptr {ptr}")?;
                for index in indices {
                    write!(f, ", {index}")?;
                }
                write!(f, " : {result_type}")
            }
            Instruction::Load { result, ptr, result_type } => {
                write!(f, "%{result} = load {result_type}, {result_type}* {ptr}")
            }
            Instruction::Store { value, ptr } => write!(f, "store {value}, {ptr}"),
            Instruction::Alloca { result, alloc_type, count, .. } => {
                write!(f, "%{result} = alloca {alloc_type}")?;
                if let Some(count) = count {
                    write!(f, ", {count}")?;
                }
                Ok(())
            }
            Instruction::Call { result, function, args, result_type } => {
                if let Some(result) = result {
                    write!(f, "%{result} = ")?;
                }
                write!(f, "call {result_type} {function}(")?;
                write_list(f, args)?;
                write!(f, ")")
            }
            Instruction::For { induction, lower, upper, step, .. } => {
                write!(f, "for %{induction} = {lower} to {upper} step {step}")
            }
            Instruction::Print { args, attributes } => {
                write!(f, "print(")?;
                write_list(f, args)?;
                write!(f, ")")?;
                if !attributes.is_empty() {
                    write!(f, " {{")?;
                    for (i, (name, value)) in attributes.iter().enumerate() {
                        if i > 0 { write!(f, ", ")?; }
                        write!(f, "{name} = {value}")?;
                    }
                    write!(f, "}}")?;
                }
                Ok(())
            }
            Instruction::Return(Some(value)) => write!(f, "ret {value}"),
            Instruction::Return(None) => write!(f, "ret void"),
            Instruction::Branch(label) => write!(f, "br label %L{label}"),
            Instruction::BranchCond { condition, true_label, false_label } => {
                write!(f, "br {condition}, label %L{true_label}, label %L{false_label}")
            }
            Instruction::Comment(text) => write!(f, "; {text}"),
        }
    }
}
