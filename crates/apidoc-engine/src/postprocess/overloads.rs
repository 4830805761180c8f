//! Overload grouping and property reclassification (spec §4.7).

use std::collections::HashMap;

use crate::arena::DocId;
use crate::model::{AttributeKind, AttributePayload, DocKind, Payload};
use crate::system::System;

pub fn group_overloads(system: &mut System) {
    reclassify_properties(system);
    group_overload_siblings(system);
}

/// A decorator whose dotted name ends in `property` (case-insensitive)
/// reclassifies the decorated Function into a Property Attribute; its
/// Function kind is discarded.
fn reclassify_properties(system: &mut System) {
    let functions: Vec<DocId> = system
        .iter()
        .filter(|(_, doc)| matches!(doc.kind, DocKind::Function | DocKind::Method))
        .map(|(id, _)| id)
        .collect();

    for id in functions {
        let is_property = system
            .get(id)
            .as_function()
            .is_some_and(|f| f.decorators.iter().any(|d| d.dotted_name.to_lowercase().ends_with("property")));
        if !is_property {
            continue;
        }
        let return_type = system.get(id).as_function().and_then(|f| f.return_type.clone());
        let doc = system.get_mut(id);
        doc.kind = DocKind::Property;
        doc.payload = Payload::Attribute(AttributePayload {
            attribute_kind: AttributeKind::InstanceVariable,
            declared_type: return_type,
            ..Default::default()
        });
    }
}

/// Group sibling Function/Method declarations that share a parent and name
/// where each overload-decorated declaration collapses into one logical
/// entity. The non-overload implementation (if present) becomes canonical
/// and records the others' ids in `overloads`.
fn group_overload_siblings(system: &mut System) {
    let mut groups: HashMap<(Option<DocId>, String), Vec<DocId>> = HashMap::new();
    for (id, doc) in system.iter() {
        if !matches!(doc.kind, DocKind::Function | DocKind::Method | DocKind::ClassMethod | DocKind::StaticMethod) {
            continue;
        }
        let name = system.interner().resolve(doc.name).to_string();
        groups.entry((doc.parent, name)).or_default().push(id);
    }

    for (_, mut members) in groups {
        if members.len() < 2 {
            continue;
        }
        members.sort_unstable();
        let canonical = members.iter().copied().find(|id| {
            !system.get(*id).as_function().is_some_and(|f| f.is_overload)
        });
        let canonical = canonical.unwrap_or(members[members.len() - 1]);
        let siblings: Vec<DocId> = members.into_iter().filter(|id| *id != canonical).collect();
        if let Some(func) = system.get_mut(canonical).as_function_mut() {
            func.overloads = siblings;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::NameId;
    use crate::model::{Decorator, DocKind, Documentable, FunctionPayload, Payload, PrivacyTable};

    #[test]
    fn property_decorator_reclassifies_function() {
        let mut system = System::new(PrivacyTable::default());
        let payload = FunctionPayload {
            decorators: vec![Decorator { dotted_name: "property".to_string(), arguments_source: None }],
            return_type: Some("int".to_string()),
            ..Default::default()
        };
        let id = system.insert(Documentable::new(NameId::default(), DocKind::Method, "A.value".to_string(), Payload::Function(payload)));

        group_overloads(&mut system);

        assert_eq!(system.get(id).kind, DocKind::Property);
        assert_eq!(system.get(id).as_attribute().unwrap().declared_type.as_deref(), Some("int"));
    }

    #[test]
    fn overload_declarations_collapse_into_canonical() {
        let mut system = System::new(PrivacyTable::default());
        let name = system.interner_mut().intern("f");
        let parent = system.insert(Documentable::new(NameId::default(), DocKind::Module, "m".to_string(), Payload::None));

        let overload_one = system.insert(Documentable::new(
            name,
            DocKind::Function,
            "m.f#1".to_string(),
            Payload::Function(FunctionPayload { is_overload: true, ..Default::default() }),
        ));
        system.get_mut(overload_one).parent = Some(parent);

        let implementation = system.insert(Documentable::new(
            name,
            DocKind::Function,
            "m.f".to_string(),
            Payload::Function(FunctionPayload::default()),
        ));
        system.get_mut(implementation).parent = Some(parent);

        group_overloads(&mut system);

        assert_eq!(system.get(implementation).as_function().unwrap().overloads, vec![overload_one]);
    }
}
