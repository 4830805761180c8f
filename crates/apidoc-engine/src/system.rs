//! The `System` registry (spec §3.5).
//!
//! Single-writer during the build and post-process phases, read-only
//! afterward — the same discipline the teacher crate applies to its heap
//! during bytecode execution, just at the scale of a whole build rather
//! than a single VM step (spec §5).

use ahash::AHashMap;

use crate::arena::{Arena, DocId};
use crate::extensions::ExtensionRegistry;
use crate::intern::Interner;
use crate::inventory::Inventory;
use crate::model::{Documentable, PrivacyTable};

/// Process-wide registry of every Documentable built so far, plus the
/// configuration that governs resolution and privacy.
pub struct System {
    arena: Arena<Documentable>,
    by_qname: AHashMap<String, DocId>,
    roots: Vec<DocId>,
    privacy_overrides: PrivacyTable,
    inventories: Vec<Inventory>,
    extensions: ExtensionRegistry,
    interner: Interner,
    next_id_hint: u32,
}

impl System {
    #[must_use]
    pub fn new(privacy_overrides: PrivacyTable) -> Self {
        Self {
            arena: Arena::new(),
            by_qname: AHashMap::new(),
            roots: Vec::new(),
            privacy_overrides,
            inventories: Vec::new(),
            extensions: ExtensionRegistry::new(),
            interner: Interner::new(),
            next_id_hint: 0,
        }
    }

    #[must_use]
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn interner_mut(&mut self) -> &mut Interner {
        &mut self.interner
    }

    #[must_use]
    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut ExtensionRegistry {
        &mut self.extensions
    }

    #[must_use]
    pub fn privacy_overrides(&self) -> &PrivacyTable {
        &self.privacy_overrides
    }

    #[must_use]
    pub fn inventories(&self) -> &[Inventory] {
        &self.inventories
    }

    pub fn load_inventory(&mut self, inventory: Inventory) {
        self.inventories.push(inventory);
    }

    /// Insert a freshly built Documentable and register its qname. The
    /// qname must not already be present; the builder is the only writer
    /// and is expected to pick qnames that are unique by construction
    /// (spec §3.6's uniqueness invariant holds by the scanner's ordering
    /// plus this check, not by chance).
    pub fn insert(&mut self, doc: Documentable) -> DocId {
        let qname = doc.fully_qualified_name.clone();
        let id = self.arena.insert(doc);
        let previous = self.by_qname.insert(qname, id);
        debug_assert!(previous.is_none(), "qname collision during build");
        self.next_id_hint += 1;
        id
    }

    pub fn register_root(&mut self, id: DocId) {
        self.roots.push(id);
    }

    #[must_use]
    pub fn roots(&self) -> &[DocId] {
        &self.roots
    }

    #[must_use]
    pub fn get(&self, id: DocId) -> &Documentable {
        self.arena.get(id)
    }

    pub fn get_mut(&mut self, id: DocId) -> &mut Documentable {
        self.arena.get_mut(id)
    }

    #[must_use]
    pub fn lookup(&self, qname: &str) -> Option<DocId> {
        self.by_qname.get(qname).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DocId, &Documentable)> {
        self.arena.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Re-point the registry's qname key for `id` (spec §4.5's re-export
    /// relocation: the entity's canonical qname changes but its `DocId`
    /// does not). The old key is left pointing nowhere; callers that need
    /// "reachable by both qnames" add an *alias* entry instead of calling
    /// this, see `alias_qname`.
    pub fn relocate(&mut self, id: DocId, new_qname: String) {
        let old_qname = self.arena.get(id).fully_qualified_name.clone();
        self.by_qname.remove(&old_qname);
        self.arena.get_mut(id).fully_qualified_name = new_qname.clone();
        self.by_qname.insert(new_qname, id);
    }

    /// Register an additional qname that resolves to `id` without changing
    /// its canonical qname (spec §3.6: "reachable by both its original
    /// qname and by every qname to which it has been relocated").
    pub fn alias_qname(&mut self, alias: String, id: DocId) {
        self.by_qname.entry(alias).or_insert(id);
    }
}
