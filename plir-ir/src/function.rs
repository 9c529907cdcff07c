//! Function Definitions
//!
//! Defines IR functions with their parameters and blocks, plus the tree
//! operations passes need: pre-order walks, lookup by `OpId`, insertion
//! before an operation and checked erasure.

use plir_common::{TempId, LabelId, SourceLocation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use crate::{BasicBlock, IrError, IrType, Operation, OpId, Value};

/// Function in IR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub return_type: IrType,
    pub parameters: Vec<(TempId, IrType)>,
    pub blocks: Vec<BasicBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,

    #[serde(skip)]
    next_temp: TempId,
    #[serde(skip)]
    next_op_id: u32,
}

/// Where an operation lives: block index, then one index per nesting level
struct OpPosition {
    block: usize,
    path: Vec<usize>,
}

impl Function {
    pub fn new(name: String, return_type: IrType) -> Self {
        Self {
            name,
            return_type,
            parameters: Vec::new(),
            blocks: Vec::new(),
            location: None,
            next_temp: 0,
            next_op_id: 1,
        }
    }

    pub fn add_parameter(&mut self, param_id: TempId, param_type: IrType) {
        self.parameters.push((param_id, param_type));
    }

    pub fn add_block(&mut self, block: BasicBlock) {
        self.blocks.push(block);
    }

    pub fn get_block(&self, id: LabelId) -> Option<&BasicBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn get_block_mut(&mut self, id: LabelId) -> Option<&mut BasicBlock> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    /// Give every operation without a unique id a fresh one and resync the
    /// temporary counter with the temporaries already in use.
    ///
    /// Operations added straight to `blocks` carry `OpId(0)` until this runs.
    pub fn assign_ids(&mut self) {
        let mut max_id = 0;
        let mut max_temp = None;
        for (param, _) in &self.parameters {
            max_temp = max_temp.max(Some(*param));
        }
        self.walk(&mut |op| {
            max_id = max_id.max(op.id.0);
            max_temp = max_temp.max(op.inst.result());
            if let crate::Instruction::For { induction, .. } = &op.inst {
                max_temp = max_temp.max(Some(*induction));
            }
            for value in op.inst.operands() {
                max_temp = max_temp.max(value.as_temp());
            }
        });

        self.next_op_id = self.next_op_id.max(max_id + 1);
        self.next_temp = self.next_temp.max(max_temp.map_or(0, |t| t + 1));

        let mut seen = HashSet::new();
        let mut next_op_id = self.next_op_id;
        for block in &mut self.blocks {
            renumber(&mut block.operations, &mut seen, &mut next_op_id);
        }
        self.next_op_id = next_op_id;
    }

    /// Allocate a temporary that is not used anywhere in the function
    pub fn new_temp(&mut self) -> TempId {
        let temp = self.next_temp;
        self.next_temp += 1;
        temp
    }

    pub fn new_op_id(&mut self) -> OpId {
        let id = OpId(self.next_op_id);
        self.next_op_id += 1;
        id
    }

    /// Visit every operation in pre-order: blocks in order, operations in
    /// order, a nested body right after the operation that owns it.
    pub fn walk<F: FnMut(&Operation)>(&self, visitor: &mut F) {
        for block in &self.blocks {
            walk_ops(&block.operations, visitor);
        }
    }

    /// Ids of all operations matching `predicate`, in walk order
    pub fn collect_ops<P: Fn(&Operation) -> bool>(&self, predicate: P) -> Vec<OpId> {
        let mut found = Vec::new();
        self.walk(&mut |op| {
            if predicate(op) {
                found.push(op.id);
            }
        });
        found
    }

    pub fn operation_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }

    pub fn find_op(&self, id: OpId) -> Option<&Operation> {
        let pos = self.position_of(id)?;
        let (last, parents) = pos.path.split_last()?;
        let mut ops = &self.blocks.get(pos.block)?.operations;
        for &index in parents {
            ops = ops.get(index)?.inst.body()?;
        }
        ops.get(*last)
    }

    /// Insert `op` immediately before the operation `anchor`, in the same
    /// list. Returns the id given to the inserted operation.
    pub fn insert_before(&mut self, anchor: OpId, mut op: Operation) -> Result<OpId, IrError> {
        let pos = self.position_of(anchor).ok_or_else(|| self.not_found(anchor))?;
        let id = self.new_op_id();
        op.id = id;
        match self.container_mut(&pos) {
            Some((ops, index)) => {
                ops.insert(index, op);
                Ok(id)
            }
            None => Err(self.not_found(anchor)),
        }
    }

    /// Remove an operation (with any nested body) from its parent.
    ///
    /// Fails if the operation does not exist or if anything outside of it
    /// still reads its result.
    pub fn erase_op(&mut self, id: OpId) -> Result<Operation, IrError> {
        let pos = self.position_of(id).ok_or_else(|| self.not_found(id))?;
        let result = self.find_op(id).and_then(|op| op.inst.result());

        if let Some(temp) = result {
            if self.is_used_outside(temp, id) {
                return Err(IrError::ResultStillUsed {
                    function: self.name.clone(),
                    id,
                    temp,
                });
            }
        }

        match self.container_mut(&pos) {
            Some((ops, index)) => Ok(ops.remove(index)),
            None => Err(self.not_found(id)),
        }
    }

    fn is_used_outside(&self, temp: TempId, owner: OpId) -> bool {
        let target = Value::Temp(temp);
        let mut used = false;
        for block in &self.blocks {
            used |= uses_excluding(&block.operations, &target, owner);
        }
        used
    }

    fn position_of(&self, id: OpId) -> Option<OpPosition> {
        for (block_index, block) in self.blocks.iter().enumerate() {
            let mut path = Vec::new();
            if locate(&block.operations, id, &mut path) {
                return Some(OpPosition { block: block_index, path });
            }
        }
        None
    }

    fn container_mut(&mut self, pos: &OpPosition) -> Option<(&mut Vec<Operation>, usize)> {
        let (last, parents) = pos.path.split_last()?;
        let mut ops = &mut self.blocks.get_mut(pos.block)?.operations;
        for &index in parents {
            ops = ops.get_mut(index)?.inst.body_mut()?;
        }
        Some((ops, *last))
    }

    fn not_found(&self, id: OpId) -> IrError {
        IrError::OperationNotFound { function: self.name.clone(), id }
    }
}

fn walk_ops<F: FnMut(&Operation)>(ops: &[Operation], visitor: &mut F) {
    for op in ops {
        visitor(op);
        if let Some(body) = op.inst.body() {
            walk_ops(body, visitor);
        }
    }
}

fn renumber(ops: &mut [Operation], seen: &mut HashSet<OpId>, next_op_id: &mut u32) {
    for op in ops {
        if op.id == OpId::default() || !seen.insert(op.id) {
            op.id = OpId(*next_op_id);
            *next_op_id += 1;
            seen.insert(op.id);
        }
        if let Some(body) = op.inst.body_mut() {
            renumber(body, seen, next_op_id);
        }
    }
}

fn locate(ops: &[Operation], id: OpId, path: &mut Vec<usize>) -> bool {
    for (index, op) in ops.iter().enumerate() {
        path.push(index);
        if op.id == id {
            return true;
        }
        if let Some(body) = op.inst.body() {
            if locate(body, id, path) {
                return true;
            }
        }
        path.pop();
    }
    false
}

fn uses_excluding(ops: &[Operation], target: &Value, owner: OpId) -> bool {
    ops.iter().filter(|op| op.id != owner).any(|op| {
        op.inst.operands().into_iter().any(|value| value == target)
            || op.inst.body().is_some_and(|body| uses_excluding(body, target, owner))
    })
}

fn write_ops(f: &mut fmt::Formatter<'_>, ops: &[Operation], depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    for op in ops {
        match op.inst.body() {
            Some(body) => {
                writeln!(f, "{indent}{} {{", op.inst)?;
                write_ops(f, body, depth + 1)?;
                writeln!(f, "{indent}}}")?;
            }
            None => writeln!(f, "{indent}{}", op.inst)?,
        }
    }
    Ok(())
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "define {} @{}(", self.return_type, self.name)?;
        for (i, (param, ty)) in self.parameters.iter().enumerate() {
            if i > 0 { write!(f, ", ")?; }
            write!(f, "{ty} %{param}")?;
        }
        writeln!(f, ") {{")?;
        for block in &self.blocks {
            writeln!(f, "L{}:", block.id)?;
            write_ops(f, &block.operations, 1)?;
        }
        write!(f, "}}")
    }
}
