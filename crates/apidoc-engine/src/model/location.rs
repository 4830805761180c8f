//! Source positions attached to Documentables and diagnostics.

use std::fmt;
use std::path::PathBuf;

/// A 1-indexed line/column position within a specific source file.
///
/// 1-indexing matches how editors and tracebacks report positions, so a
/// driver can hand this straight to "jump to line" UI without translation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    #[must_use]
    pub fn new(file: PathBuf, line: u32, column: u32) -> Self {
        Self { file, line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}
