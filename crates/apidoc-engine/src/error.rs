//! Error and diagnostic types.
//!
//! The engine distinguishes two failure channels. `EngineError` covers
//! conditions that make further progress on a single input meaningless (an
//! unreadable source file, a base directory that doesn't exist) and is
//! returned as a `Result` error. Everything else — malformed `__all__`,
//! an unresolved import, a conflicting re-export — is a non-fatal
//! `Diagnostic` pushed to a `DiagnosticSink` so the driver can choose to
//! collect, log, or fail the whole run afterward.

use std::fmt;
use std::path::PathBuf;

use strum::{Display, EnumString, IntoStaticStr};

use crate::model::location::SourceLocation;

/// Fatal errors: construction failed outright, there is no partial `System`
/// worth returning.
#[derive(Debug, Clone)]
pub enum EngineError {
    /// A configured root path does not exist or is not readable.
    UnreadableRoot { path: PathBuf, reason: String },
    /// A source path escaped the configured base directory.
    PathEscapesBase { path: PathBuf, base: PathBuf },
    /// The binary-module introspector failed to start or exited abnormally.
    IntrospectionFailed { path: PathBuf, reason: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnreadableRoot { path, reason } => {
                write!(f, "cannot read root {}: {reason}", path.display())
            }
            Self::PathEscapesBase { path, base } => {
                write!(f, "{} is outside base directory {}", path.display(), base.display())
            }
            Self::IntrospectionFailed { path, reason } => {
                write!(f, "introspection of {} failed: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for EngineError {}

pub type EngineResult<T> = Result<T, EngineError>;

/// Severity of a non-fatal diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// Taxonomy of non-fatal conditions the engine can encounter while building
/// or post-processing a `System`. Each variant names the condition, not the
/// module that raised it, so the sink can group by meaning rather than by
/// source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum DiagnosticKind {
    /// `__all__` (or the configured public-names variable) was assigned a
    /// value that isn't a list/tuple/set literal of string constants.
    MalformedAllExports,
    /// Two modules exported the same name via re-export at equal path
    /// length; the later one lost the tie-break.
    DuplicateReexport,
    /// A name could not be resolved to any Documentable, import, or
    /// external inventory entry.
    UnresolvedName,
    /// A class's base list could not be linearized into a consistent MRO.
    InconsistentMro,
    /// An import statement referenced a module that was never scanned.
    UnresolvedImport,
    /// A source file could not be parsed into a syntax tree.
    ParseFailure,
    /// A source path could not be read or fell outside the scan root.
    PathUnreadable,
    /// A binary module's sandboxed introspection subprocess failed to start
    /// or exited abnormally; the module was still built as an empty
    /// placeholder.
    IntrospectionFailure,
    /// An annotation referenced a name that resolves differently depending
    /// on which branch of a conditional assignment is taken; reported only
    /// in verbose mode (spec §7), module scope wins over the ambiguity.
    AmbiguousAnnotationName,
    /// A decorator or base-class expression was too complex to analyze
    /// statically and was recorded as raw source text only.
    UnanalyzableExpression,
    /// An extension hook raised and `strict_extensions` was not set, so the
    /// condition was downgraded to a diagnostic instead of propagating.
    ExtensionFailure,
}

/// A single non-fatal finding, carrying enough context for a driver to
/// render a useful message without re-deriving it from the registry.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    pub location: Option<SourceLocation>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(kind: DiagnosticKind, severity: Severity, message: impl Into<String>) -> Self {
        Self { kind, severity, message: message.into(), location: None }
    }

    #[must_use]
    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{}: [{}] {}", loc, self.kind, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

/// Sink the driver supplies to collect diagnostics as they're raised.
///
/// The engine never decides what to do with a diagnostic beyond recording
/// it here — whether to log, collect, or abort the whole run is policy the
/// driver owns.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// A sink that simply accumulates every diagnostic it's given, in the order
/// reported. The obvious choice for tests and for a driver that wants to
/// triage at the end of a run rather than as it happens.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_preserves_order() {
        let mut sink = CollectingSink::new();
        sink.report(Diagnostic::new(DiagnosticKind::UnresolvedName, Severity::Warn, "first"));
        sink.report(Diagnostic::new(DiagnosticKind::UnresolvedImport, Severity::Error, "second"));
        assert_eq!(sink.diagnostics().len(), 2);
        assert_eq!(sink.diagnostics()[0].message, "first");
        assert!(sink.has_errors());
    }

    #[test]
    fn display_includes_kind_tag() {
        let d = Diagnostic::new(DiagnosticKind::InconsistentMro, Severity::Error, "bad bases");
        assert_eq!(d.to_string(), "[inconsistent_mro] bad bases");
    }
}
