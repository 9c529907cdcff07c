//! Per-module symbol namespace
//! 
//! Every function definition, external declaration and global of a module
//! is registered here under its name. Names are unique within a module.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use crate::IrError;

/// What a module-level name denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    /// Function with a body
    Function,
    /// External function declaration
    Declaration,
    /// Global variable or constant
    Global,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Function => write!(f, "function"),
            SymbolKind::Declaration => write!(f, "external declaration"),
            SymbolKind::Global => write!(f, "global"),
        }
    }
}

/// Outcome of a get-or-insert on the symbol table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interned {
    /// The name was already taken, by a symbol of this kind
    Existing(SymbolKind),
    /// The name was free and is now registered
    Created,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: BTreeMap<String, SymbolKind>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolKind> {
        self.symbols.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SymbolKind)> {
        self.symbols.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    /// Register a new name; fails if it is already taken
    pub fn insert(&mut self, name: &str, kind: SymbolKind) -> Result<(), IrError> {
        match self.get_or_insert(name, kind) {
            Interned::Created => Ok(()),
            Interned::Existing(_) => Err(IrError::DuplicateSymbol { name: name.to_string() }),
        }
    }

    /// Look the name up and register it as `kind` if it is free, in one step
    pub fn get_or_insert(&mut self, name: &str, kind: SymbolKind) -> Interned {
        use std::collections::btree_map::Entry;

        match self.symbols.entry(name.to_string()) {
            Entry::Occupied(existing) => Interned::Existing(*existing.get()),
            Entry::Vacant(slot) => {
                slot.insert(kind);
                Interned::Created
            }
        }
    }
}
