//! Subclass index population (spec §4.4: "Subclass lists are populated in
//! post-processing by walking every class's `mro` and appending the class
//! to each ancestor's `subclasses` set").

use crate::arena::DocId;
use crate::model::{BaseRef, DocKind};
use crate::system::System;

pub fn populate_subclasses(system: &mut System) {
    let classes: Vec<(DocId, Vec<BaseRef>)> = system
        .iter()
        .filter(|(_, doc)| doc.kind.is_class_like())
        .map(|(id, doc)| (id, doc.as_class().map(|c| c.mro.clone()).unwrap_or_default()))
        .collect();

    for (class_id, mro) in classes {
        for ancestor in &mro {
            if let BaseRef::Internal(ancestor_id) = ancestor {
                if *ancestor_id == class_id {
                    continue;
                }
                if let Some(ancestor_doc) = system.get_mut(*ancestor_id).as_class_mut() {
                    if !ancestor_doc.subclasses.contains(&class_id) {
                        ancestor_doc.subclasses.push(class_id);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::NameId;
    use crate::model::{ClassPayload, Documentable, Payload, PrivacyTable};

    fn make_class(system: &mut System, qname: &str, mro: Vec<BaseRef>) -> DocId {
        let id = system.insert(Documentable::new(NameId::default(), DocKind::Class, qname.to_string(), Payload::Class(ClassPayload::default())));
        system.get_mut(id).as_class_mut().unwrap().mro = mro;
        id
    }

    #[test]
    fn ancestor_gains_subclass_entry() {
        let mut system = System::new(PrivacyTable::default());
        let base = make_class(&mut system, "Base", vec![]);
        let derived = make_class(&mut system, "Derived", vec![BaseRef::Internal(base)]);
        // Retroactively give Derived's mro the self entry too, as the real
        // builder would after compute_c3_mro runs.
        system.get_mut(derived).as_class_mut().unwrap().mro = vec![BaseRef::Internal(derived), BaseRef::Internal(base)];

        populate_subclasses(&mut system);

        assert_eq!(system.get(base).as_class().unwrap().subclasses, vec![derived]);
    }
}
