//! Docstring-linker bridge (spec §4.9, §2's "Docstring-linker bridge"
//! component).
//!
//! Markup parsers are kept out of scope; the single operation they need
//! from the engine is `lookup`, delegating to the name resolver and caching
//! identical cross-references per `(context, text)` pair.

use ahash::AHashMap;

use crate::arena::DocId;
use crate::resolver::{ResolutionResult, ResolverCache};
use crate::system::System;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssClass {
    Internal,
    Intersphinx,
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    pub url_fragment: String,
    pub css_class: CssClass,
}

/// The linker wraps a `ResolverCache` with its own cache keyed by the raw
/// text a docstring role referenced, since the same role string
/// (`L{pkg.core.Session}`) may appear verbatim in many docstrings across a
/// build.
#[derive(Default)]
pub struct Linker {
    resolver: ResolverCache,
    link_cache: AHashMap<(DocId, String), LinkTarget>,
}

impl Linker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&mut self, system: &System, context: DocId, text: &str) -> LinkTarget {
        let key = (context, text.to_string());
        if let Some(cached) = self.link_cache.get(&key) {
            return cached.clone();
        }

        let target = match self.resolver.resolve(system, context, text) {
            ResolutionResult::Internal(id) => LinkTarget {
                url_fragment: format!("{}.html", system.get(id).fully_qualified_name.replace('.', "/")),
                css_class: CssClass::Internal,
            },
            ResolutionResult::External { url, .. } => LinkTarget { url_fragment: url, css_class: CssClass::Intersphinx },
            ResolutionResult::Unresolved { .. } => {
                LinkTarget { url_fragment: String::new(), css_class: CssClass::Unresolved }
            }
        };

        self.link_cache.insert(key, target.clone());
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::NameId;
    use crate::model::{DocKind, Documentable, Payload, PrivacyTable};

    #[test]
    fn repeated_lookup_hits_cache_and_returns_same_target() {
        let mut system = System::new(PrivacyTable::default());
        let foo_name = system.interner_mut().intern("foo");
        let module = system.insert(Documentable::new(NameId::default(), DocKind::Module, "m".to_string(), Payload::None));
        let func = system.insert(Documentable::new(foo_name, DocKind::Function, "m.foo".to_string(), Payload::None));
        system.get_mut(module).children.push(func);
        system.get_mut(func).parent = Some(module);

        let mut linker = Linker::new();
        let first = linker.lookup(&system, module, "foo");
        let second = linker.lookup(&system, module, "foo");
        assert_eq!(first, second);
        assert_eq!(first.css_class, CssClass::Internal);
    }

    #[test]
    fn unresolved_name_yields_unresolved_class() {
        let mut system = System::new(PrivacyTable::default());
        let module = system.insert(Documentable::new(NameId::default(), DocKind::Module, "m".to_string(), Payload::None));
        let mut linker = Linker::new();
        let target = linker.lookup(&system, module, "nonexistent");
        assert_eq!(target.css_class, CssClass::Unresolved);
    }
}
