//! Module, Declarations and Global Variables
//!
//! Defines the top-level module structure. A module owns three ordered
//! lists (external declarations, globals, function definitions) and the
//! symbol table that keeps their names unique.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use crate::{Function, Interned, IrError, IrType, SymbolKind, SymbolTable, Value};

/// Linkage types for global symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Linkage {
    External,  // Visible to other modules
    Internal,  // Only visible within this module
}

impl fmt::Display for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Linkage::External => write!(f, "external"),
            Linkage::Internal => write!(f, "internal"),
        }
    }
}

/// External function declaration (a signature without a body)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub return_type: IrType,
    pub param_types: Vec<IrType>,
    pub is_vararg: bool,
}

impl FunctionDecl {
    pub fn new(name: &str, return_type: IrType, param_types: Vec<IrType>, is_vararg: bool) -> Self {
        Self {
            name: name.to_string(),
            return_type,
            param_types,
            is_vararg,
        }
    }

    pub fn signature(&self) -> IrType {
        IrType::Function {
            return_type: Box::new(self.return_type.clone()),
            param_types: self.param_types.clone(),
            is_vararg: self.is_vararg,
        }
    }
}

impl fmt::Display for FunctionDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "declare {} @{}(", self.return_type, self.name)?;
        for (i, param) in self.param_types.iter().enumerate() {
            if i > 0 { write!(f, ", ")?; }
            write!(f, "{param}")?;
        }
        if self.is_vararg {
            if !self.param_types.is_empty() { write!(f, ", ")?; }
            write!(f, "...")?;
        }
        write!(f, ")")
    }
}

/// Global variable definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalVariable {
    pub name: String,
    pub var_type: IrType,
    pub is_constant: bool,
    pub initializer: Option<Value>,
    pub linkage: Linkage,
}

impl GlobalVariable {
    /// Immutable, module-private `[len x i8]` holding exactly `content`
    pub fn string_constant(name: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            var_type: IrType::byte_array(content.len() as u64),
            is_constant: true,
            initializer: Some(Value::ConstantString(content.to_string())),
            linkage: Linkage::Internal,
        }
    }

    /// The string held by a constant string global
    pub fn string_content(&self) -> Option<&str> {
        match (&self.initializer, self.is_constant) {
            (Some(Value::ConstantString(content)), true) => Some(content),
            _ => None,
        }
    }
}

impl fmt::Display for GlobalVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_constant { "constant" } else { "global" };
        write!(f, "@{} = {} {} {}", self.name, self.linkage, kind, self.var_type)?;
        if let Some(init) = &self.initializer {
            write!(f, " {init}")?;
        }
        Ok(())
    }
}

/// IR Module - represents a complete compilation unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawModule")]
pub struct Module {
    pub name: String,
    declarations: Vec<FunctionDecl>,
    globals: Vec<GlobalVariable>,
    functions: Vec<Function>,
    #[serde(skip)]
    symbols: SymbolTable,
}

/// Serialized form; validated and indexed on the way in
#[derive(Deserialize)]
struct RawModule {
    name: String,
    #[serde(default)]
    declarations: Vec<FunctionDecl>,
    #[serde(default)]
    globals: Vec<GlobalVariable>,
    #[serde(default)]
    functions: Vec<Function>,
}

impl TryFrom<RawModule> for Module {
    type Error = IrError;

    fn try_from(raw: RawModule) -> Result<Self, Self::Error> {
        let mut module = Module::new(raw.name);
        for decl in raw.declarations {
            module.add_declaration(decl)?;
        }
        for global in raw.globals {
            module.add_global(global)?;
        }
        for function in raw.functions {
            module.add_function(function)?;
        }
        Ok(module)
    }
}

impl Module {
    pub fn new(name: String) -> Self {
        Self {
            name,
            declarations: Vec::new(),
            globals: Vec::new(),
            functions: Vec::new(),
            symbols: SymbolTable::new(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, IrError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, IrError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Append a function definition; operation ids are assigned here
    pub fn add_function(&mut self, mut function: Function) -> Result<(), IrError> {
        self.symbols.insert(&function.name, SymbolKind::Function)?;
        function.assign_ids();
        self.functions.push(function);
        Ok(())
    }

    pub fn add_declaration(&mut self, decl: FunctionDecl) -> Result<(), IrError> {
        self.symbols.insert(&decl.name, SymbolKind::Declaration)?;
        self.declarations.push(decl);
        Ok(())
    }

    pub fn add_global(&mut self, global: GlobalVariable) -> Result<(), IrError> {
        self.symbols.insert(&global.name, SymbolKind::Global)?;
        self.globals.push(global);
        Ok(())
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Functions can be rewritten in place but not added or removed here
    pub fn functions_mut(&mut self) -> &mut [Function] {
        &mut self.functions
    }

    pub fn declarations(&self) -> &[FunctionDecl] {
        &self.declarations
    }

    pub fn globals(&self) -> &[GlobalVariable] {
        &self.globals
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn get_function_mut(&mut self, name: &str) -> Option<&mut Function> {
        self.functions.iter_mut().find(|f| f.name == name)
    }

    pub fn get_declaration(&self, name: &str) -> Option<&FunctionDecl> {
        self.declarations.iter().find(|d| d.name == name)
    }

    pub fn get_global(&self, name: &str) -> Option<&GlobalVariable> {
        self.globals.iter().find(|g| g.name == name)
    }

    /// Module-level declarations and globals, without the function bodies
    pub fn scope(&mut self) -> ModuleScope<'_> {
        self.split_mut().1
    }

    /// Borrow the function definitions and the rest of the module
    /// separately, so a function body can be rewritten while symbols are
    /// declared in its module.
    pub fn split_mut(&mut self) -> (&mut [Function], ModuleScope<'_>) {
        let scope = ModuleScope {
            declarations: &mut self.declarations,
            globals: &mut self.globals,
            symbols: &mut self.symbols,
        };
        (&mut self.functions, scope)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; module {}", self.name)?;
        for decl in &self.declarations {
            writeln!(f, "{decl}")?;
        }
        for global in &self.globals {
            writeln!(f, "{global}")?;
        }
        for function in &self.functions {
            writeln!(f)?;
            writeln!(f, "{function}")?;
        }
        Ok(())
    }
}

/// Mutable view of a module's symbol namespace, declarations and globals
pub struct ModuleScope<'m> {
    declarations: &'m mut Vec<FunctionDecl>,
    globals: &'m mut Vec<GlobalVariable>,
    symbols: &'m mut SymbolTable,
}

impl ModuleScope<'_> {
    pub fn lookup(&self, name: &str) -> Option<SymbolKind> {
        self.symbols.lookup(name)
    }

    pub fn declaration(&self, name: &str) -> Option<&FunctionDecl> {
        self.declarations.iter().find(|d| d.name == name)
    }

    pub fn global(&self, name: &str) -> Option<&GlobalVariable> {
        self.globals.iter().find(|g| g.name == name)
    }

    pub fn globals(&self) -> &[GlobalVariable] {
        self.globals
    }

    /// Declare `name` at the start of the module unless the name is taken.
    ///
    /// `make` only runs when the declaration is created.
    pub fn get_or_insert_declaration<F>(&mut self, name: &str, make: F) -> Interned
    where
        F: FnOnce() -> FunctionDecl,
    {
        let outcome = self.symbols.get_or_insert(name, SymbolKind::Declaration);
        if outcome == Interned::Created {
            let decl = make();
            debug!("Declared external function {decl}");
            self.declarations.insert(0, decl);
        }
        outcome
    }

    /// Define global `name` at the start of the module unless the name is taken.
    ///
    /// `make` only runs when the global is created.
    pub fn get_or_insert_global<F>(&mut self, name: &str, make: F) -> Interned
    where
        F: FnOnce() -> GlobalVariable,
    {
        let outcome = self.symbols.get_or_insert(name, SymbolKind::Global);
        if outcome == Interned::Created {
            let global = make();
            debug!("Created global {global}");
            self.globals.insert(0, global);
        }
        outcome
    }
}
