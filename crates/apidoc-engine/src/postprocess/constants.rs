//! Constant classification (spec §4.2.1, reconciled with spec §8 scenario
//! 2).
//!
//! An Attribute is `Constant` when its name is all-upper-with-underscores,
//! its definition is unconditional, there is exactly one assignment to
//! that name in its scope, *and* the assigned value is a literal rather
//! than something computed (spec §8's worked example treats a
//! comprehension-valued SHOUTY_NAME as `Variable` even though it meets the
//! other three criteria, so literalness is included as a fourth gate). The
//! builder records the raw ingredients as it walks the AST; this pass
//! turns them into the final `AttributeKind`.

use crate::arena::DocId;
use crate::model::AttributeKind;
use crate::system::System;

pub fn classify_constants(system: &mut System) {
    let ids: Vec<DocId> = system
        .iter()
        .filter(|(_, doc)| doc.as_attribute().is_some())
        .map(|(id, _)| id)
        .collect();

    for id in ids {
        let name = system.interner().resolve(system.get(id).name).to_string();
        let doc = system.get_mut(id);
        let Some(attr) = doc.as_attribute_mut() else { continue };
        if attr.attribute_kind == AttributeKind::Constant {
            continue;
        }
        let looks_constant = is_shouty_case(&name);
        if looks_constant && !attr.is_conditional && attr.assignment_count == 1 && attr.is_literal_value {
            attr.attribute_kind = AttributeKind::Constant;
        }
    }
}

fn is_shouty_case(name: &str) -> bool {
    !name.is_empty()
        && name.chars().any(|c| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_uppercase() || c == '_' || c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::NameId;
    use crate::model::{AttributePayload, DocKind, Documentable, Payload, PrivacyTable};

    fn make_attr(system: &mut System, name: &str, qname: &str, count: u32, conditional: bool, literal: bool) -> DocId {
        let interned = system.interner_mut().intern(name);
        let payload = AttributePayload {
            assignment_count: count,
            is_conditional: conditional,
            is_literal_value: literal,
            ..Default::default()
        };
        system.insert(Documentable::new(interned, DocKind::Attribute, qname.to_string(), Payload::Attribute(payload)))
    }

    #[test]
    fn computed_list_stays_variable_even_if_shouty() {
        let mut system = System::new(PrivacyTable::default());
        let squares = make_attr(&mut system, "SQUARES", "m.SQUARES", 1, false, false);
        classify_constants(&mut system);
        assert_eq!(system.get(squares).as_attribute().unwrap().attribute_kind, AttributeKind::Variable);
    }

    #[test]
    fn literal_shouty_unconditional_single_assignment_is_constant() {
        let mut system = System::new(PrivacyTable::default());
        let x = make_attr(&mut system, "X", "m.X", 1, false, true);
        classify_constants(&mut system);
        assert_eq!(system.get(x).as_attribute().unwrap().attribute_kind, AttributeKind::Constant);
    }

    #[test]
    fn conditional_assignment_is_not_constant() {
        let mut system = System::new(PrivacyTable::default());
        let x = make_attr(&mut system, "X", "m.X", 1, true, true);
        classify_constants(&mut system);
        assert_eq!(system.get(x).as_attribute().unwrap().attribute_kind, AttributeKind::Variable);
    }

    #[test]
    fn multiple_assignments_is_not_constant() {
        let mut system = System::new(PrivacyTable::default());
        let x = make_attr(&mut system, "X", "m.X", 2, false, true);
        classify_constants(&mut system);
        assert_eq!(system.get(x).as_attribute().unwrap().attribute_kind, AttributeKind::Variable);
    }

    #[test]
    fn lowercase_name_is_not_constant() {
        let mut system = System::new(PrivacyTable::default());
        let x = make_attr(&mut system, "pi", "m.pi", 1, false, true);
        classify_constants(&mut system);
        assert_eq!(system.get(x).as_attribute().unwrap().attribute_kind, AttributeKind::Variable);
    }
}
