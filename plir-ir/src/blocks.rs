//! Basic Block Management
//! 
//! Defines basic blocks - sequences of operations with single entry/exit points.

use plir_common::LabelId;
use serde::{Deserialize, Serialize};
use crate::Operation;

/// Basic Block - a sequence of operations with a single entry and exit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicBlock {
    pub id: LabelId,
    pub operations: Vec<Operation>,
}

impl BasicBlock {
    pub fn new(id: LabelId) -> Self {
        Self {
            id,
            operations: Vec::new(),
        }
    }
    
    pub fn add_operation(&mut self, op: Operation) {
        self.operations.push(op);
    }
    
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
    
    pub fn has_terminator(&self) -> bool {
        self.operations.last().is_some_and(|op| op.inst.is_terminator())
    }
}
