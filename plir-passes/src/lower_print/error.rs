use plir_common::SourceLocation;
use plir_ir::{IrError, OpId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LowerError {
    /// A reserved name already denotes something the lowering cannot reuse
    #[error("symbol '{name}' already exists as {found}, expected {expected}")]
    SymbolCollision {
        name: String,
        found: String,
        expected: String,
    },

    #[error("{location}: 'format' attribute of print {id} must be a string, found {found}")]
    FormatAttribute {
        id: OpId,
        location: SourceLocation,
        found: &'static str,
    },

    #[error("operation {id} is not a print")]
    NotAPrint { id: OpId },

    #[error("failed to erase lowered print {id}: {source}")]
    Erase {
        id: OpId,
        #[source]
        source: IrError,
    },

    #[error(transparent)]
    Ir(#[from] IrError),
}
