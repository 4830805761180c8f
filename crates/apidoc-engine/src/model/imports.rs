//! Import records (spec §3.4).

use crate::intern::NameId;

/// What names an import brings into scope.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum ImportedNames {
    /// `from mod import *`.
    Wildcard,
    /// `from mod import a, b as c` / `import a, b as c` — (original name,
    /// local alias) pairs, in source order. `local alias` equals
    /// `original name` when no `as` clause is present.
    Named(Vec<ImportedName>),
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ImportedName {
    pub original: NameId,
    pub alias: NameId,
}

impl ImportedName {
    #[must_use]
    pub fn new(original: NameId, alias: NameId) -> Self {
        Self { original, alias }
    }
}

/// A single `import`/`from ... import ...` statement as recorded by the
/// AST builder, in source order within its owning module.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Import {
    /// The dotted source module name as written (e.g. `pkg.core.session`).
    /// For relative imports this is the resolved dotted name after walking
    /// up `level` packages from the importing module.
    pub source_module: String,
    pub names: ImportedNames,
    /// True when this import's target names also appear in the owning
    /// module's `all_exports`, marking a re-export intent (spec §4.5).
    pub is_reexport: bool,
}

impl Import {
    #[must_use]
    pub fn new(source_module: impl Into<String>, names: ImportedNames) -> Self {
        Self { source_module: source_module.into(), names, is_reexport: false }
    }

    #[must_use]
    pub fn as_reexport(mut self) -> Self {
        self.is_reexport = true;
        self
    }
}
