//! Error handling for the print lowering toolchain
//! 
//! This module defines the top-level error type used by the driver and
//! the diagnostic collection used by passes that keep going after a
//! per-operation problem.

use crate::source_loc::SourceSpan;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Toolchain-level error that encompasses every layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("Invalid IR: {message}")]
    InvalidIr { message: String },

    #[error("Pass '{pass}' failed: {message}")]
    PassFailed { pass: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {message}")]
    IoError { message: String },
}

impl CompilerError {
    pub fn invalid_ir(message: impl Into<String>) -> Self {
        CompilerError::InvalidIr { message: message.into() }
    }

    pub fn pass_failed(pass: &str, message: impl Into<String>) -> Self {
        CompilerError::PassFailed {
            pass: pass.to_string(),
            message: message.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        CompilerError::ConfigError { message: message.into() }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IoError {
            message: err.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A diagnostic message with location and severity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: SourceSpan,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: String, span: SourceSpan) -> Self {
        Self::with_severity(Severity::Error, message, span)
    }

    pub fn warning(message: String, span: SourceSpan) -> Self {
        Self::with_severity(Severity::Warning, message, span)
    }

    fn with_severity(severity: Severity, message: String, span: SourceSpan) -> Self {
        Self {
            severity,
            message,
            span,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.span, self.severity, self.message)?;
        for note in &self.notes {
            write!(f, "\n  note: {}", note)?;
        }
        Ok(())
    }
}

/// Collects diagnostics emitted while a pass runs
#[derive(Debug, Default)]
pub struct ErrorReporter {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic, updating the counters
    pub fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
            Severity::Note => {}
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn error(&mut self, message: String, span: SourceSpan) {
        self.report(Diagnostic::error(message, span));
    }

    pub fn warning(&mut self, message: String, span: SourceSpan) {
        self.report(Diagnostic::warning(message, span));
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Move every diagnostic of `other` into this reporter
    pub fn absorb(&mut self, other: ErrorReporter) {
        for diagnostic in other.diagnostics {
            self.report(diagnostic);
        }
    }

    /// Print all diagnostics to stderr
    pub fn print_diagnostics(&self) {
        for diagnostic in &self.diagnostics {
            eprintln!("{}", diagnostic);
        }
    }

    /// Create a summary string
    pub fn summary(&self) -> String {
        match (self.error_count, self.warning_count) {
            (0, 0) => "No errors or warnings".to_string(),
            (0, w) => format!("{} warning{}", w, plural(w)),
            (e, 0) => format!("{} error{}", e, plural(e)),
            (e, w) => format!("{} error{} and {} warning{}", e, plural(e), w, plural(w)),
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_loc::SourceLocation;

    fn span() -> SourceSpan {
        SourceSpan::from_location(SourceLocation::new("kernel.mlir", 4, 2))
    }

    #[test]
    fn test_diagnostic_display_includes_location_and_notes() {
        let diag = Diagnostic::error("bad format".to_string(), span())
            .with_note("expected a string attribute".to_string());

        assert_eq!(
            diag.to_string(),
            "kernel.mlir:4:2: error: bad format\n  note: expected a string attribute"
        );
    }

    #[test]
    fn test_error_reporter_counts() {
        let mut reporter = ErrorReporter::new();
        assert!(!reporter.has_errors());

        reporter.error("first".to_string(), span());
        reporter.warning("second".to_string(), span());
        reporter.report(Diagnostic::with_severity(Severity::Note, "third".to_string(), span()));

        assert!(reporter.has_errors());
        assert_eq!(reporter.error_count(), 1);
        assert_eq!(reporter.warning_count(), 1);
        assert_eq!(reporter.diagnostics().len(), 3);
    }

    #[test]
    fn test_absorb_keeps_counts() {
        let mut outer = ErrorReporter::new();
        let mut inner = ErrorReporter::new();
        inner.error("inner".to_string(), span());
        outer.absorb(inner);
        assert_eq!(outer.error_count(), 1);
    }

    #[test]
    fn test_summary() {
        let mut reporter = ErrorReporter::new();
        assert_eq!(reporter.summary(), "No errors or warnings");

        reporter.error("Error 1".to_string(), span());
        assert_eq!(reporter.summary(), "1 error");

        reporter.error("Error 2".to_string(), span());
        assert_eq!(reporter.summary(), "2 errors");

        reporter.warning("Warning 1".to_string(), span());
        assert_eq!(reporter.summary(), "2 errors and 1 warning");
    }

    #[test]
    fn test_io_error_conversion() {
        let err: CompilerError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, CompilerError::IoError { .. }));
    }
}
