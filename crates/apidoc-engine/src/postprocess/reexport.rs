//! Re-export relocation (spec §4.5).
//!
//! For each Module whose `all_exports` is set, every listed name that
//! resolves (via import resolution) to an entity whose canonical parent is
//! a *different* module gets an alias at the new qname, and the entity's
//! canonical qname is updated to the innermost re-export site — the
//! shortest qname that still exposes it, ties broken lexicographically.

use crate::arena::DocId;
use crate::error::{Diagnostic, DiagnosticKind, DiagnosticSink, Severity};
use crate::intern::Interner;
use crate::model::{ImportedNames, Import};
use crate::system::System;

struct Candidate {
    target: DocId,
    new_qname: String,
}

pub fn relocate_reexports(system: &mut System, sink: &mut dyn DiagnosticSink) {
    let candidates = collect_candidates(system);

    // Group by target, pick the shortest (lexicographic tie-break), first
    // processing order wins on exact ties (spec §4.5's explicit rule).
    let mut best: std::collections::HashMap<DocId, (String, usize)> = std::collections::HashMap::new();
    for (order, candidate) in candidates.into_iter().enumerate() {
        let len = candidate.new_qname.matches('.').count();
        match best.get(&candidate.target) {
            None => {
                best.insert(candidate.target, (candidate.new_qname, order));
            }
            Some((existing_qname, existing_order)) => {
                let existing_len = existing_qname.matches('.').count();
                if len < existing_len || (len == existing_len && candidate.new_qname < *existing_qname) {
                    best.insert(candidate.target, (candidate.new_qname, order));
                } else if len == existing_len && candidate.new_qname == *existing_qname && order != *existing_order {
                    sink.report(Diagnostic::new(
                        DiagnosticKind::DuplicateReexport,
                        Severity::Warn,
                        format!("{} re-exported from equally short paths; first processed wins", candidate.new_qname),
                    ));
                }
            }
        }
    }

    for (target, (new_qname, _)) in best {
        let old_qname = system.get(target).fully_qualified_name.clone();
        if new_qname == old_qname {
            continue;
        }
        system.alias_qname(old_qname, target);
        // Innermost == shortest; relocate only if the new one is actually
        // shorter (more dots == deeper), matching "innermost re-export
        // site" rather than blindly taking the last candidate found.
        let current = system.get(target).fully_qualified_name.clone();
        let current_len = current.matches('.').count();
        let candidate_len = new_qname.matches('.').count();
        if candidate_len < current_len || (candidate_len == current_len && new_qname < current) {
            system.relocate(target, new_qname);
        } else {
            system.alias_qname(new_qname, target);
        }
    }
}

fn collect_candidates(system: &System) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    let module_ids: Vec<DocId> = system.iter().filter(|(_, d)| d.kind.is_namespace()).map(|(id, _)| id).collect();

    for module_id in module_ids {
        let module_doc = system.get(module_id);
        let Some(module_payload) = module_doc.as_module() else { continue };
        let Some(exports) = &module_payload.all_exports else { continue };
        let module_qname = module_doc.fully_qualified_name.clone();

        for &export_name in exports {
            let exported_name_str = system.interner().resolve(export_name);
            if let Some(target) = resolve_export_target(system, &module_payload.imports, exported_name_str, system.interner()) {
                let target_doc = system.get(target);
                if target_doc.parent != Some(module_id) {
                    let new_qname = format!("{module_qname}.{exported_name_str}");
                    candidates.push(Candidate { target, new_qname });
                }
            }
        }
    }
    candidates
}

fn resolve_export_target(system: &System, imports: &[Import], name: &str, interner: &Interner) -> Option<DocId> {
    for import in imports {
        match &import.names {
            ImportedNames::Named(names) => {
                for imported in names {
                    if interner.resolve(imported.alias) == name {
                        let qname = format!("{}.{}", import.source_module, interner.resolve(imported.original));
                        if let Some(id) = system.lookup(&qname) {
                            return Some(id);
                        }
                    }
                }
            }
            ImportedNames::Wildcard => {
                let qname = format!("{}.{name}", import.source_module);
                if let Some(id) = system.lookup(&qname) {
                    return Some(id);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectingSink;
    use crate::model::{ClassPayload, DocKind, Documentable, ImportedName, ModulePayload, Payload, PrivacyTable};

    #[test]
    fn reexported_class_relocates_to_innermost_qname() {
        let mut system = System::new(PrivacyTable::default());
        let my_class_name = system.interner_mut().intern("MyClass");

        let class_id = system.insert(Documentable::new(
            my_class_name,
            DocKind::Class,
            "pkg.core.session.MyClass".to_string(),
            Payload::Class(ClassPayload::default()),
        ));
        let session_name = system.interner_mut().intern("session");
        let session_module = system.insert(Documentable::new(
            session_name,
            DocKind::Module,
            "pkg.core.session".to_string(),
            Payload::Module(ModulePayload::default()),
        ));
        system.get_mut(class_id).parent = Some(session_module);

        let import = Import::new(
            "pkg.core.session",
            ImportedNames::Named(vec![ImportedName::new(my_class_name, my_class_name)]),
        );
        let pkg_name = system.interner_mut().intern("pkg");
        let pkg_init = system.insert(Documentable::new(
            pkg_name,
            DocKind::Package,
            "pkg".to_string(),
            Payload::Module(ModulePayload {
                all_exports: Some(vec![my_class_name]),
                imports: vec![import],
                is_package: true,
                ..Default::default()
            }),
        ));
        let _ = pkg_init;

        let mut sink = CollectingSink::new();
        relocate_reexports(&mut system, &mut sink);

        assert_eq!(system.lookup("pkg.MyClass"), Some(class_id));
        assert_eq!(system.lookup("pkg.core.session.MyClass"), Some(class_id));
        assert_eq!(system.get(class_id).fully_qualified_name, "pkg.MyClass");
    }
}
