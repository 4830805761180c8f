//! Chained-scope lookup for the name resolver's anchor walk (spec §4.3
//! step 1).
//!
//! A `Scope` is a single level (method locals, a class body, a module's
//! top level); a `ScopeChain` is the sequence of scopes to search outward
//! from, nearest first. This mirrors the teacher's `ChainMap` — a stack of
//! maps where the first mapping to contain a key wins — generalized from
//! runtime namespace values to `DocId` bindings.

use ahash::AHashMap;

use crate::arena::DocId;
use crate::intern::NameId;

/// One level of a scope chain: the names bound directly in it.
#[derive(Debug, Default, Clone)]
pub struct Scope {
    bindings: AHashMap<NameId, DocId>,
}

impl Scope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: NameId, target: DocId) {
        self.bindings.insert(name, target);
    }

    #[must_use]
    pub fn get(&self, name: NameId) -> Option<DocId> {
        self.bindings.get(&name).copied()
    }
}

/// Ordered sequence of scopes searched nearest-first. Pushed in the order
/// the anchor walk of spec §4.3 describes: method locals, then class body,
/// then enclosing class (for nested classes), then module, then package
/// chain up to the root.
#[derive(Debug, Default, Clone)]
pub struct ScopeChain {
    /// Nearest scope is the *last* element, matching how the builder
    /// naturally pushes scopes as it descends and pops as it returns; the
    /// lookup walks this vector in reverse.
    levels: Vec<Scope>,
}

impl ScopeChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, scope: Scope) {
        self.levels.push(scope);
    }

    pub fn pop(&mut self) -> Option<Scope> {
        self.levels.pop()
    }

    /// First mapping (nearest to the context) that contains `name` wins —
    /// "a name defined in the current scope wins over an inherited one"
    /// (spec §4.3).
    #[must_use]
    pub fn resolve(&self, name: NameId) -> Option<DocId> {
        self.levels.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn bind_innermost(&mut self, name: NameId, target: DocId) {
        if let Some(top) = self.levels.last_mut() {
            top.bind(name, target);
        }
    }
}
