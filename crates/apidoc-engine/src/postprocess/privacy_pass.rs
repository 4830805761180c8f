//! Privacy assignment pass (spec §4.6).
//!
//! Applies default rules plus the configured override table, then
//! propagates HIDDEN transitively: "A Module/Package/Class that is HIDDEN
//! transitively hides all descendants."

use crate::arena::DocId;
use crate::model::Privacy;
use crate::system::System;

pub fn assign_privacy(system: &mut System) {
    let ids: Vec<DocId> = system.iter().map(|(id, _)| id).collect();
    for id in &ids {
        let doc = system.get(*id);
        let name = system.interner().resolve(doc.name).to_string();
        let qname = doc.fully_qualified_name.clone();
        let privacy = system.privacy_overrides().resolve(&qname, &name);
        system.get_mut(*id).privacy = privacy;
    }

    // Propagate HIDDEN down the parent chain. Root-first traversal isn't
    // required for correctness (each lookup walks its own ancestor chain),
    // but doing it that way avoids an O(depth^2) walk per node.
    for id in &ids {
        if is_hidden_by_ancestor(*id, system) {
            system.get_mut(*id).privacy = Privacy::Hidden;
        }
    }
}

fn is_hidden_by_ancestor(id: DocId, system: &System) -> bool {
    let mut current = system.get(id).parent;
    while let Some(parent_id) = current {
        if system.get(parent_id).privacy == Privacy::Hidden {
            return true;
        }
        current = system.get(parent_id).parent;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::NameId;
    use crate::model::{DocKind, Documentable, Payload, PrivacyRule, PrivacyTable};

    #[test]
    fn hidden_package_hides_descendants() {
        let rules = vec![PrivacyRule::new("pkg", Privacy::Hidden)];
        let mut system = System::new(PrivacyTable::new(rules));
        let pkg = system.insert(Documentable::new(NameId::default(), DocKind::Package, "pkg".to_string(), Payload::None));
        let child = system.insert(Documentable::new(NameId::default(), DocKind::Module, "pkg.sub".to_string(), Payload::None));
        system.get_mut(child).parent = Some(pkg);

        assign_privacy(&mut system);

        assert_eq!(system.get(pkg).privacy, Privacy::Hidden);
        assert_eq!(system.get(child).privacy, Privacy::Hidden);
    }

    #[test]
    fn default_privacies_by_name_shape() {
        let mut system = System::new(PrivacyTable::default());
        let mut set = |name: &str, kind: DocKind, qname: &str| {
            let interned = system.interner_mut().intern(name);
            system.insert(Documentable::new(interned, kind, qname.to_string(), Payload::None))
        };
        let public_class = set("A", DocKind::Class, "A");
        let ctor = set("__init__", DocKind::Method, "A.__init__");
        let helper = set("_helper", DocKind::Method, "A._helper");
        let eq = set("__eq__", DocKind::Method, "A.__eq__");

        assign_privacy(&mut system);

        assert_eq!(system.get(public_class).privacy, Privacy::Public);
        assert_eq!(system.get(ctor).privacy, Privacy::Public);
        assert_eq!(system.get(helper).privacy, Privacy::Private);
        assert_eq!(system.get(eq).privacy, Privacy::Public);
    }
}
