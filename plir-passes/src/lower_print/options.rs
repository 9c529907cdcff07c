use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use super::DEFAULT_FORMAT;

/// How format strings are mapped to global names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatInterning {
    /// One global per distinct format string (`frmt_spec`, `frmt_spec_1`, ...)
    #[default]
    ByContent,
    /// Every print shares `frmt_spec`; the first format lowered in a module
    /// is the one all prints of that module use
    SharedName,
}

impl fmt::Display for FormatInterning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatInterning::ByContent => write!(f, "by-content"),
            FormatInterning::SharedName => write!(f, "shared-name"),
        }
    }
}

impl FromStr for FormatInterning {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "by-content" => Ok(FormatInterning::ByContent),
            "shared-name" => Ok(FormatInterning::SharedName),
            other => Err(format!(
                "unknown interning mode '{other}' (expected by-content or shared-name)"
            )),
        }
    }
}

/// Options for the print lowering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowerPrintOptions {
    pub interning: FormatInterning,
    /// Format for prints without a `format` attribute
    pub default_format: String,
}

impl Default for LowerPrintOptions {
    fn default() -> Self {
        Self {
            interning: FormatInterning::default(),
            default_format: DEFAULT_FORMAT.to_string(),
        }
    }
}
