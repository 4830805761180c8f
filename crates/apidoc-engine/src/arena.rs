//! Id-addressed storage for Documentables.
//!
//! Spec §9 calls for modeling Documentables "as nodes in an arena owned by
//! the System, addressed by stable integer ids" specifically to avoid
//! ownership cycles in the parent/child and cross-reference graphs (a class
//! referencing a type alias that mentions the class, a module re-exporting
//! an entity it does not own). Every cross-reference in the model —
//! `parent`, `resolved_bases`, `subclasses`, `mro` — is a `DocId`, never a
//! borrow.
//!
//! Unlike a runtime heap, the arena never frees slots: spec §3.7 states a
//! Documentable is destroyed only when the whole System is torn down, so
//! there is no free-list to maintain, only monotonic growth.

/// Stable identity of a Documentable within one `System`. Ids are assigned
/// in the deterministic order the scanner/builder produces entities, so two
/// builds of the same inputs assign the same ids to the same qnames — this
/// is what spec §8's "deterministic ordering" property rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct DocId(u32);

impl DocId {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Append-only arena of `T`, indexed by `DocId`.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Arena<T> {
    items: Vec<T>,
}

impl<T> Arena<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn insert(&mut self, value: T) -> DocId {
        let id = DocId(u32::try_from(self.items.len()).expect("arena overflowed u32 capacity"));
        self.items.push(value);
        id
    }

    #[must_use]
    pub fn get(&self, id: DocId) -> &T {
        &self.items[id.index()]
    }

    pub fn get_mut(&mut self, id: DocId) -> &mut T {
        &mut self.items[id.index()]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DocId, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, v)| (DocId(u32::try_from(i).expect("arena index exceeds u32")), v))
    }

    pub fn ids(&self) -> impl Iterator<Item = DocId> + '_ {
        (0..self.items.len()).map(|i| DocId(u32::try_from(i).expect("arena index exceeds u32")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_determines_ids() {
        let mut arena: Arena<&'static str> = Arena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");
        assert_eq!(arena.get(a), &"a");
        assert_eq!(arena.get(b), &"b");
        assert_ne!(a, b);
    }
}
