use plir_common::CompilerError;
use plir_passes::lower_print::PASS_NAME;
use plir_passes::{LowerPrintOpsPass, LowerPrintOptions, PassError, PassManager, PassRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Driver configuration loaded from a JSON file (`--config`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
    pub lower_print: LowerPrintOptions,
    /// Passes run by `plir run` when `--passes` is not given
    pub pipeline: Vec<String>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            lower_print: LowerPrintOptions::default(),
            pipeline: vec![PASS_NAME.to_string()],
        }
    }
}

impl DriverConfig {
    pub fn from_json(text: &str) -> Result<Self, CompilerError> {
        serde_json::from_str(text).map_err(|e| CompilerError::config_error(e.to_string()))
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, CompilerError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
            .map_err(|e| CompilerError::config_error(format!("{}: {e}", path.display())))
    }

    /// Configuration from `path`, or the defaults when no file is given
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, CompilerError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Build a pass manager for `names`. The print lowering gets this
    /// configuration's options; other passes come from the registry as is.
    pub fn build_pipeline(
        &self,
        registry: &PassRegistry,
        names: &[String],
    ) -> Result<PassManager, PassError> {
        let mut manager = PassManager::new();
        for name in names {
            if name == PASS_NAME {
                manager.add_pass(Box::new(LowerPrintOpsPass::new(self.lower_print.clone())));
            } else {
                manager.add_pass(registry.create(name)?);
            }
        }
        Ok(manager)
    }
}
