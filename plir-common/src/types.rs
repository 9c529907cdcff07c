//! Identifier types shared by the IR and the passes

/// Temporary value identifier (`%N` in printed IR)
pub type TempId = u32;

/// Basic block label identifier
pub type LabelId = u32;
