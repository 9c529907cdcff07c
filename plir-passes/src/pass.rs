//! Pass interface
//! 
//! A pass transforms one module in place and reports success or failure.
//! `PassManager` runs a pipeline of passes in order; `PassRegistry` maps
//! pass names to constructors so pipelines can be described by name.

use log::{debug, info};
use plir_common::{CompilerError, Diagnostic};
use plir_ir::Module;
use std::collections::BTreeMap;
use thiserror::Error;

/// A transformation over a whole module
pub trait Pass {
    /// Name of the pass, as used on the command line
    fn name(&self) -> &'static str;

    /// Run the pass once over `module`.
    ///
    /// On failure the module keeps whatever changes were already made.
    fn run_on_module(&mut self, module: &mut Module) -> Result<(), PassError>;
}

#[derive(Error, Debug)]
pub enum PassError {
    #[error("pass '{pass}' failed: {message}")]
    Failed {
        pass: &'static str,
        message: String,
        diagnostics: Vec<Diagnostic>,
    },

    #[error("unknown pass '{0}'")]
    UnknownPass(String),
}

impl PassError {
    /// Diagnostics reported before the failure, if any
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            PassError::Failed { diagnostics, .. } => diagnostics,
            PassError::UnknownPass(_) => &[],
        }
    }
}

impl From<PassError> for CompilerError {
    fn from(err: PassError) -> Self {
        match err {
            PassError::Failed { pass, message, .. } => CompilerError::pass_failed(pass, message),
            PassError::UnknownPass(name) => {
                CompilerError::config_error(format!("unknown pass '{name}'"))
            }
        }
    }
}

/// Runs a sequence of passes over a module
#[derive(Default)]
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pass(&mut self, pass: Box<dyn Pass>) {
        self.passes.push(pass);
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    /// Run every pass in order, stopping at the first failure
    pub fn run(&mut self, module: &mut Module) -> Result<(), PassError> {
        for pass in &mut self.passes {
            info!("Running pass '{}' on module '{}'", pass.name(), module.name);
            pass.run_on_module(module)?;
            debug!("Pass '{}' finished", pass.name());
        }
        Ok(())
    }
}

type PassConstructor = fn() -> Box<dyn Pass>;

/// Name -> constructor table for the passes a pipeline can use
pub struct PassRegistry {
    constructors: BTreeMap<&'static str, PassConstructor>,
}

impl PassRegistry {
    pub fn new() -> Self {
        Self { constructors: BTreeMap::new() }
    }

    /// Registry holding every pass this crate provides
    pub fn with_builtin_passes() -> Self {
        let mut registry = Self::new();
        registry.register(
            crate::lower_print::PASS_NAME,
            crate::lower_print::create_lower_print_ops_pass,
        );
        registry
    }

    pub fn register(&mut self, name: &'static str, constructor: PassConstructor) {
        self.constructors.insert(name, constructor);
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.constructors.keys().copied()
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn Pass>, PassError> {
        self.constructors
            .get(name)
            .map(|constructor| constructor())
            .ok_or_else(|| PassError::UnknownPass(name.to_string()))
    }

    /// Build a pass manager from a list of pass names
    pub fn pipeline<'a, I>(&self, names: I) -> Result<PassManager, PassError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut manager = PassManager::new();
        for name in names {
            manager.add_pass(self.create(name)?);
        }
        Ok(manager)
    }
}

impl Default for PassRegistry {
    fn default() -> Self {
        Self::with_builtin_passes()
    }
}
