//! The post-processing phase (spec §2, §4.4–§4.7): everything that can only
//! run once every module has been built. Order matters — base classes must
//! resolve before MRO can be computed at all, MRO must run before subclass
//! population, constants and property reclassification don't depend on
//! anything else, and re-export relocation should see the final
//! privacy-independent qnames before privacy is assigned against them.

pub mod constants;
pub mod mro;
pub mod overloads;
pub mod privacy_pass;
pub mod reexport;
pub mod resolve_bases;
pub mod subclasses;

use crate::arena::DocId;
use crate::error::DiagnosticSink;
use crate::model::BaseRef;
use crate::system::System;

/// Run the built-in post-processing pipeline, then any registered
/// extension post-processors (spec §4.2.6).
pub fn run(system: &mut System, sink: &mut dyn DiagnosticSink, root_type: Option<DocId>) {
    resolve_bases::resolve_bases(system);
    compute_all_mros(system, sink, root_type);
    subclasses::populate_subclasses(system);
    reexport::relocate_reexports(system, sink);
    privacy_pass::assign_privacy(system);
    constants::classify_constants(system);
    overloads::group_overloads(system);

    let mut extensions = std::mem::take(system_extensions_mut(system));
    extensions.run_post_processors(system, sink);
    *system_extensions_mut(system) = extensions;
}

fn system_extensions_mut(system: &mut System) -> &mut crate::extensions::ExtensionRegistry {
    system.extensions_mut()
}

/// Compute MRO for every class in dependency order (bases before
/// dependents), falling back to depth-first linearization on C3 failure
/// (spec §4.4). Classes are processed in an order derived from a simple
/// topological pass over `resolved_bases`; cycles are tolerated because
/// `compute_c3_mro` itself detects and reports them rather than looping.
fn compute_all_mros(system: &mut System, sink: &mut dyn DiagnosticSink, root_type: Option<DocId>) {
    let classes: Vec<DocId> = system.iter().filter(|(_, d)| d.kind.is_class_like()).map(|(id, _)| id).collect();

    for class_id in topo_order(&classes, system) {
        let bases = system.get(class_id).as_class().map(|c| c.resolved_bases.clone()).unwrap_or_default();
        match mro::compute_c3_mro(class_id, &bases, system, root_type) {
            Ok(linearization) => {
                if let Some(class) = system.get_mut(class_id).as_class_mut() {
                    class.mro = linearization;
                }
            }
            Err(reason) => {
                let class_name = system.get(class_id).fully_qualified_name.clone();
                mro::report_mro_failure(sink, &class_name, &reason);
                let fallback = mro::fallback_linearization(class_id, &bases, system);
                if let Some(class) = system.get_mut(class_id).as_class_mut() {
                    class.mro = fallback;
                    class.mro_failed = true;
                }
            }
        }
    }
}

/// Order classes so that every internal base is linearized before its
/// dependent. Falls back to input order for any class left unreached by
/// the topological walk (cycles, externally-based classes) since
/// `compute_c3_mro` already tolerates bases that haven't been linearized
/// yet by computing them inline.
fn topo_order(classes: &[DocId], system: &System) -> Vec<DocId> {
    let mut visited = std::collections::HashSet::new();
    let mut order = Vec::with_capacity(classes.len());
    for &class_id in classes {
        visit(class_id, system, &mut visited, &mut order);
    }
    order
}

fn visit(class_id: DocId, system: &System, visited: &mut std::collections::HashSet<DocId>, order: &mut Vec<DocId>) {
    if !visited.insert(class_id) {
        return;
    }
    if let Some(class) = system.get(class_id).as_class() {
        for base in &class.resolved_bases {
            if let BaseRef::Internal(base_id) = base {
                visit(*base_id, system, visited, order);
            }
        }
    }
    order.push(class_id);
}
