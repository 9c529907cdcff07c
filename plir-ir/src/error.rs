//! Errors raised by IR construction and mutation

use plir_common::CompilerError;
use thiserror::Error;
use crate::OpId;

#[derive(Error, Debug)]
pub enum IrError {
    #[error("Duplicate symbol '{name}'")]
    DuplicateSymbol { name: String },

    #[error("Operation {id} not found in function '{function}'")]
    OperationNotFound { function: String, id: OpId },

    #[error("Cannot erase operation {id} in function '{function}': result %{temp} is still used")]
    ResultStillUsed { function: String, id: OpId, temp: u32 },

    #[error("Builder error: {message}")]
    Builder { message: String },

    #[error("Malformed module JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl IrError {
    pub(crate) fn builder(message: &str) -> Self {
        IrError::Builder { message: message.to_string() }
    }
}

impl From<IrError> for CompilerError {
    fn from(err: IrError) -> Self {
        CompilerError::invalid_ir(err.to_string())
    }
}
