//! String interning for identifiers encountered while building the documentable tree.
//!
//! Fully-qualified names, segment names, and raw source forms (decorator
//! expressions, default-value text, base-class expressions) are all stored as
//! interned strings so that repeated segments (`self`, `__init__`, a package
//! name repeated in every submodule's qname) are stored once. Lookups happen
//! constantly during the build (every segment comparison, every privacy
//! check) and only rarely during rendering, so interning trades a small
//! amount of build-time bookkeeping for cheap equality and hashing
//! everywhere else.

use std::sync::LazyLock;

use ahash::AHashMap;

/// Index into the interner's storage.
///
/// `u32` keeps this small enough to embed in every `Documentable` header
/// without doubling the likely size of that struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct NameId(u32);

impl NameId {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifiers that recur in every source tree regardless of project content,
/// pre-interned so common comparisons (`__init__`, `__all__`) never need a
/// hash lookup.
static WELL_KNOWN: LazyLock<[&'static str; 13]> = LazyLock::new(|| {
    [
        "",
        "__init__",
        "__new__",
        "__all__",
        "__docformat__",
        "self",
        "cls",
        "object",
        "property",
        "staticmethod",
        "classmethod",
        "overload",
        "TYPE_CHECKING",
    ]
});

/// Append-only string interner.
///
/// Strings are never removed: the engine's lifecycle (spec §3.7) never
/// destroys a Documentable except by tearing down the whole `System`, so
/// there is no benefit to reclaiming interned slots mid-build.
#[derive(Debug, Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    lookup: AHashMap<Box<str>, NameId>,
}

impl Interner {
    #[must_use]
    pub fn new() -> Self {
        let mut interner = Self::default();
        for s in WELL_KNOWN.iter() {
            interner.intern(s);
        }
        interner
    }

    pub fn intern(&mut self, s: &str) -> NameId {
        if let Some(&id) = self.lookup.get(s) {
            return id;
        }
        let id = NameId(u32::try_from(self.strings.len()).expect("interner overflowed u32 capacity"));
        self.strings.push(s.into());
        self.lookup.insert(s.into(), id);
        id
    }

    #[must_use]
    pub fn resolve(&self, id: NameId) -> &str {
        &self.strings[id.index()]
    }

    #[must_use]
    pub fn get(&self, s: &str) -> Option<NameId> {
        self.lookup.get(s).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_strings_share_an_id() {
        let mut interner = Interner::new();
        let a = interner.intern("pkg.core.session");
        let b = interner.intern("pkg.core.session");
        assert_eq!(a, b);
        assert_eq!(interner.resolve(a), "pkg.core.session");
    }

    #[test]
    fn well_known_identifiers_preinterned() {
        let interner = Interner::new();
        assert!(interner.len() >= WELL_KNOWN.len());
    }
}
