//! Source location tracking for diagnostics
//! 
//! Operations may carry the location of the source construct they were
//! produced from, so that problems found while lowering can point back
//! at it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A location in a source file (line and column are 1-based)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub filename: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(filename: &str, line: u32, column: u32) -> Self {
        Self {
            filename: filename.to_string(),
            line,
            column,
        }
    }
    
    /// Location used when an operation has none attached
    pub fn unknown() -> Self {
        Self::new("<unknown>", 0, 0)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}

/// A span in a source file (from start to end location)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        Self { start, end }
    }
    
    /// Create a span from a single location
    pub fn from_location(location: SourceLocation) -> Self {
        Self {
            end: location.clone(),
            start: location,
        }
    }
}

impl From<SourceLocation> for SourceSpan {
    fn from(location: SourceLocation) -> Self {
        Self::from_location(location)
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.filename != self.end.filename {
            write!(f, "{} to {}", self.start, self.end)
        } else if self.start.line == self.end.line {
            if self.start.column == self.end.column {
                write!(f, "{}", self.start)
            } else {
                write!(
                    f,
                    "{}:{}:{}-{}",
                    self.start.filename, self.start.line, self.start.column, self.end.column
                )
            }
        } else {
            write!(
                f,
                "{}:{}:{}-{}:{}",
                self.start.filename,
                self.start.line,
                self.start.column,
                self.end.line,
                self.end.column
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let loc = SourceLocation::new("kernel.mlir", 12, 5);
        assert_eq!(loc.to_string(), "kernel.mlir:12:5");
    }

    #[test]
    fn test_span_display() {
        let point = SourceSpan::from_location(SourceLocation::new("a.mlir", 3, 4));
        assert_eq!(point.to_string(), "a.mlir:3:4");

        let same_line = SourceSpan::new(
            SourceLocation::new("a.mlir", 3, 4),
            SourceLocation::new("a.mlir", 3, 9),
        );
        assert_eq!(same_line.to_string(), "a.mlir:3:4-9");

        let multi_line = SourceSpan::new(
            SourceLocation::new("a.mlir", 3, 4),
            SourceLocation::new("a.mlir", 5, 1),
        );
        assert_eq!(multi_line.to_string(), "a.mlir:3:4-5:1");
    }
}
