//! Static function-signature representation.
//!
//! Unlike a runtime interpreter's signature (which tracks enough structure to
//! bind call arguments fast), this one only needs to describe the shape of a
//! `def` for documentation: parameter names, their kind (positional-only,
//! normal, `*args`, keyword-only, `**kwargs`), an optional annotation, and an
//! optional default value — both kept as raw source text, never evaluated.

use crate::intern::NameId;

/// The parameter-list "slot" a parameter occupies, mirroring the five
/// groups Python's grammar allows: positional-only (before `/`),
/// positional-or-keyword, `*args`, keyword-only (after `*`), `**kwargs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ParameterKind {
    PositionalOnly,
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

/// A single formal parameter.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Parameter {
    pub name: NameId,
    pub kind: ParameterKind,
    /// Raw, unparsed source text of the annotation expression, if any.
    pub annotation: Option<String>,
    /// Raw, unparsed source text of the default-value expression, if any.
    pub default: Option<String>,
}

impl Parameter {
    #[must_use]
    pub fn new(name: NameId, kind: ParameterKind) -> Self {
        Self { name, kind, annotation: None, default: None }
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// The full signature of a function or method, in declaration order.
///
/// Parameters are stored as a single ordered list rather than split per-kind
/// vectors: rendering a signature back to source text just walks this list
/// once, inserting `/` and `*` markers at kind transitions, which is simpler
/// than re-interleaving separate groups.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Signature {
    pub parameters: Vec<Parameter>,
    /// Raw source text of the return annotation, if any.
    pub return_annotation: Option<String>,
}

impl Signature {
    #[must_use]
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self { parameters, return_annotation: None }
    }

    #[must_use]
    pub fn with_return_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.return_annotation = Some(annotation.into());
        self
    }

    #[must_use]
    pub fn has_star_marker(&self) -> bool {
        self.parameters
            .iter()
            .any(|p| matches!(p.kind, ParameterKind::KeywordOnly | ParameterKind::VarPositional))
    }

    #[must_use]
    pub fn has_slash_marker(&self) -> bool {
        self.parameters.iter().any(|p| p.kind == ParameterKind::PositionalOnly)
    }
}
