//! Serialized object model (spec §6 "Outputs": "a serialized object model,
//! e.g. as JSON").
//!
//! `System` itself holds `DocId`s as array indices plus an interner the
//! serialized form has no use for; `SerializedSystem` is a plain, names-only
//! tree that `serde_json` can round-trip without exposing either detail, the
//! same separation the teacher keeps between in-memory `Value`/heap state and
//! its `postcard`-serialized session snapshots in `session_manager.rs`.

use serde::{Deserialize, Serialize};

use crate::arena::DocId;
use crate::model::{AttributePayload, ClassPayload, FunctionPayload, ModulePayload, Payload, Privacy};
use crate::system::System;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedDocumentable {
    pub qname: String,
    pub name: String,
    pub kind: String,
    pub privacy: Privacy,
    pub docstring: Option<String>,
    pub docstring_format: Option<String>,
    pub is_introspected: bool,
    pub children: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<ModulePayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<SerializedClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<AttributePayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedClass {
    pub raw_bases: Vec<String>,
    pub mro: Vec<String>,
    pub mro_failed: bool,
    pub subclasses: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedSystem {
    pub roots: Vec<String>,
    pub documentables: Vec<SerializedDocumentable>,
}

/// Flatten a `System` into the plain, qname-addressed tree spec §6 calls
/// for. Every `DocId` cross-reference becomes the referent's qname; a
/// `BaseRef::External` keeps its dotted name as-is, unresolved entirely.
#[must_use]
pub fn serialize_system(system: &System) -> SerializedSystem {
    let qname_of = |id: DocId| system.get(id).fully_qualified_name.clone();

    let documentables = system
        .iter()
        .map(|(_, doc)| SerializedDocumentable {
            qname: doc.fully_qualified_name.clone(),
            name: system.interner().resolve(doc.name).to_string(),
            kind: doc.kind.to_string(),
            privacy: doc.privacy,
            docstring: doc.docstring.as_ref().map(|d| d.text.clone()),
            docstring_format: doc.docstring_format.clone(),
            is_introspected: doc.is_introspected,
            children: doc.children.iter().copied().map(qname_of).collect(),
            module: doc.as_module().cloned(),
            class: doc.as_class().map(|c| SerializedClass {
                raw_bases: c.raw_bases.clone(),
                mro: c.mro.iter().map(|base_ref| base_ref_text(base_ref, system)).collect(),
                mro_failed: c.mro_failed,
                subclasses: c.subclasses.iter().copied().map(qname_of).collect(),
            }),
            function: doc.as_function().cloned(),
            attribute: doc.as_attribute().cloned(),
        })
        .collect();

    SerializedSystem { roots: system.roots().iter().copied().map(qname_of).collect(), documentables }
}

fn base_ref_text(base_ref: &crate::model::BaseRef, system: &System) -> String {
    match base_ref {
        crate::model::BaseRef::Internal(id) => system.get(*id).fully_qualified_name.clone(),
        crate::model::BaseRef::External(name) => name.clone(),
    }
}

/// Dump a PUBLIC/PRIVATE inventory of `qname -> relative_url` tagged by
/// kind (spec §6's other output shape); HIDDEN Documentables are omitted
/// entirely, matching the inventory's purpose as a cross-reference map for
/// consumers outside the engine.
#[must_use]
pub fn dump_url_inventory(system: &System) -> Vec<(String, String, String)> {
    system
        .iter()
        .filter(|(_, doc)| doc.privacy != Privacy::Hidden)
        .map(|(_, doc)| {
            let url = format!("{}.html", doc.fully_qualified_name.replace('.', "/"));
            (doc.fully_qualified_name.clone(), doc.kind.to_string(), url)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::NameId;
    use crate::model::{DocKind, Documentable, PrivacyTable};

    #[test]
    fn serialized_system_round_trips_through_json() {
        let mut system = System::new(PrivacyTable::default());
        let name = system.interner_mut().intern("pkg");
        let module = Documentable::new(name, DocKind::Package, "pkg".to_string(), Payload::Module(ModulePayload::default()));
        let id = system.insert(module);
        system.register_root(id);

        let serialized = serialize_system(&system);
        let json = serde_json::to_string(&serialized).unwrap();
        let parsed: SerializedSystem = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.roots, vec!["pkg".to_string()]);
        assert_eq!(parsed.documentables.len(), 1);
    }

    #[test]
    fn hidden_documentables_are_excluded_from_the_url_inventory() {
        let mut system = System::new(PrivacyTable::default());
        let name = system.interner_mut().intern("_secret");
        let mut doc = Documentable::new(NameId::default(), DocKind::Module, "pkg._secret".to_string(), Payload::None);
        doc.privacy = Privacy::Hidden;
        doc.name = name;
        system.insert(doc);

        assert!(dump_url_inventory(&system).is_empty());
    }
}
