//! Base-class resolution (spec §4.3's name resolution feeding §4.4's MRO).
//!
//! `ast_builder` only records each class's bases as source text
//! (`ClassPayload.raw_bases`); this pass turns that text into `BaseRef`s
//! using the same `resolver::ResolverCache` cross-reference resolution
//! uses, so `compute_all_mros` has real base class graph to linearize
//! instead of an always-empty `resolved_bases`.

use crate::arena::DocId;
use crate::model::BaseRef;
use crate::resolver::{ResolutionResult, ResolverCache};
use crate::system::System;

pub fn resolve_bases(system: &mut System) {
    let classes: Vec<DocId> = system.iter().filter(|(_, d)| d.kind.is_class_like()).map(|(id, _)| id).collect();
    let mut cache = ResolverCache::new();

    let mut resolved_by_class = Vec::with_capacity(classes.len());
    for &class_id in &classes {
        let raw_bases = system.get(class_id).as_class().map(|c| c.raw_bases.clone()).unwrap_or_default();
        let resolved = raw_bases
            .iter()
            .map(|raw| match cache.resolve(system, class_id, raw) {
                ResolutionResult::Internal(id) => BaseRef::Internal(id),
                ResolutionResult::External { qname, .. } => BaseRef::External(qname),
                // Unresolved: carry the raw dotted name through unchanged
                // rather than dropping the base (spec §4.4).
                ResolutionResult::Unresolved { .. } => BaseRef::External(raw.clone()),
            })
            .collect::<Vec<_>>();
        resolved_by_class.push((class_id, resolved));
    }

    for (class_id, resolved) in resolved_by_class {
        if let Some(class) = system.get_mut(class_id).as_class_mut() {
            class.resolved_bases = resolved;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassPayload, DocKind, Documentable, Payload, PrivacyTable};

    #[test]
    fn raw_base_in_same_module_resolves_to_internal_ref() {
        let mut system = System::new(PrivacyTable::default());
        let base_name = system.interner_mut().intern("Base");
        let base = system.insert(Documentable::new(base_name, DocKind::Class, "m.Base".to_string(), Payload::Class(ClassPayload::default())));

        let derived_name = system.interner_mut().intern("Derived");
        let derived = system.insert(Documentable::new(
            derived_name,
            DocKind::Class,
            "m.Derived".to_string(),
            Payload::Class(ClassPayload { raw_bases: vec!["Base".to_string()], ..Default::default() }),
        ));
        system.get_mut(base).parent = None;
        system.get_mut(derived).parent = None;

        resolve_bases(&mut system);
        assert_eq!(system.get(derived).as_class().unwrap().resolved_bases, vec![BaseRef::Internal(base)]);
    }

    #[test]
    fn unresolved_base_is_carried_through_as_external() {
        let mut system = System::new(PrivacyTable::default());
        let derived_name = system.interner_mut().intern("Derived");
        let derived = system.insert(Documentable::new(
            derived_name,
            DocKind::Class,
            "m.Derived".to_string(),
            Payload::Class(ClassPayload { raw_bases: vec!["some.Unresolved".to_string()], ..Default::default() }),
        ));

        resolve_bases(&mut system);
        assert_eq!(system.get(derived).as_class().unwrap().resolved_bases, vec![BaseRef::External("some.Unresolved".to_string())]);
    }
}
