//! Binary operators of `Instruction::Binary`

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrBinaryOp {
    Add,
    Sub,
    Mul,
    SDiv,
    SRem,
    FAdd,
    FSub,
    FMul,
    FDiv,
    /// Signed integer comparisons, producing an `i1`
    Eq,
    Ne,
    Slt,
    Sle,
    Sgt,
    Sge,
}

impl IrBinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            IrBinaryOp::Eq
                | IrBinaryOp::Ne
                | IrBinaryOp::Slt
                | IrBinaryOp::Sle
                | IrBinaryOp::Sgt
                | IrBinaryOp::Sge
        )
    }

    fn mnemonic(self) -> &'static str {
        match self {
            IrBinaryOp::Add => "add",
            IrBinaryOp::Sub => "sub",
            IrBinaryOp::Mul => "mul",
            IrBinaryOp::SDiv => "sdiv",
            IrBinaryOp::SRem => "srem",
            IrBinaryOp::FAdd => "fadd",
            IrBinaryOp::FSub => "fsub",
            IrBinaryOp::FMul => "fmul",
            IrBinaryOp::FDiv => "fdiv",
            IrBinaryOp::Eq => "eq",
            IrBinaryOp::Ne => "ne",
            IrBinaryOp::Slt => "slt",
            IrBinaryOp::Sle => "sle",
            IrBinaryOp::Sgt => "sgt",
            IrBinaryOp::Sge => "sge",
        }
    }
}

impl fmt::Display for IrBinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_comparison() {
            write!(f, "icmp {}", self.mnemonic())
        } else {
            f.write_str(self.mnemonic())
        }
    }
}
