//! C3 linearization (spec §4.4), adapted from the teacher's
//! `compute_c3_mro` (which computes a runtime class's MRO over `HeapId`
//! bases) to operate over `DocId`/`BaseRef` pairs for a static class graph
//! with no implicit root-object allocation to dereference.

use crate::arena::DocId;
use crate::error::{Diagnostic, DiagnosticKind, DiagnosticSink, Severity};
use crate::model::BaseRef;
use crate::system::System;

/// Depth guard against pathological or cyclic base graphs; a legitimate
/// class hierarchy never approaches this.
const MAX_INHERITANCE_DEPTH: usize = 256;

/// Compute the C3 linearization of `class_id`'s `resolved_bases`.
///
/// On success, returns `Ok(mro)` with `mro[0] == class_id` as `BaseRef::Internal`
/// and the implicit root type appended last if none of the bases already
/// reach it (the root type is supplied by the caller as `root`, since the
/// model has no built-in "object" Documentable of its own).
///
/// On failure (inconsistent base ordering, or a cycle), returns `Err` with
/// a diagnostic-ready message; the caller is expected to fall back to the
/// depth-first order per spec §4.4.
pub fn compute_c3_mro(
    class_id: DocId,
    bases: &[BaseRef],
    system: &System,
    root: Option<DocId>,
) -> Result<Vec<BaseRef>, String> {
    if detect_cycle(class_id, bases, system, 0) {
        return Err(format!("circular inheritance detected while linearizing {:?}", class_id));
    }

    if bases.is_empty() {
        let mut mro = vec![BaseRef::Internal(class_id)];
        if let Some(root) = root {
            if root != class_id {
                mro.push(BaseRef::Internal(root));
            }
        }
        return Ok(mro);
    }

    let mut linearizations: Vec<Vec<BaseRef>> = Vec::with_capacity(bases.len() + 1);
    for base in bases {
        match base {
            BaseRef::Internal(base_id) => {
                let base_mro = existing_mro(*base_id, system, root)?;
                linearizations.push(base_mro);
            }
            BaseRef::External(name) => {
                // An unresolved base contributes a depth-one linearization
                // of itself only; it cannot be expanded further (spec §9's
                // resolution of the "unresolved base in MRO" open question).
                linearizations.push(vec![BaseRef::External(name.clone())]);
            }
        }
    }
    linearizations.push(bases.to_vec());

    let merged = c3_merge(linearizations).ok_or_else(|| {
        let names: Vec<String> = bases
            .iter()
            .map(|b| match b {
                BaseRef::Internal(id) => system.get(*id).fully_qualified_name.clone(),
                BaseRef::External(name) => name.clone(),
            })
            .collect();
        format!("Cannot create a consistent method resolution order (MRO) for bases {}", names.join(", "))
    })?;

    let mut mro = vec![BaseRef::Internal(class_id)];
    mro.extend(merged);
    Ok(mro)
}

fn existing_mro(base_id: DocId, system: &System, root: Option<DocId>) -> Result<Vec<BaseRef>, String> {
    let base = system.get(base_id);
    match base.as_class() {
        Some(class) if !class.mro.is_empty() => Ok(class.mro.clone()),
        Some(class) => {
            // Base hasn't been linearized yet (post-processors run bases
            // before dependents in a correctly ordered system); fall back
            // to computing it inline rather than failing the whole chain.
            compute_c3_mro(base_id, &class.resolved_bases, system, root)
        }
        None => Err(format!("base {:?} is not a class", base_id)),
    }
}

/// The classic C3 merge: repeatedly pick a "good head" — the head of some
/// list that does not appear in the tail of any list — move it to the
/// result, and strip it from every list's head. Fails when no list has a
/// usable head while lists remain.
fn c3_merge(mut lists: Vec<Vec<BaseRef>>) -> Option<Vec<BaseRef>> {
    let mut result = Vec::new();
    loop {
        lists.retain(|l| !l.is_empty());
        if lists.is_empty() {
            return Some(result);
        }
        let mut good_head = None;
        for candidate_list in &lists {
            let head = &candidate_list[0];
            let in_any_tail = lists.iter().any(|l| l[1..].contains(head));
            if !in_any_tail {
                good_head = Some(head.clone());
                break;
            }
        }
        let head = good_head?;
        result.push(head.clone());
        for list in &mut lists {
            if list[0] == head {
                list.remove(0);
            } else {
                list.retain(|item| item != &head);
            }
        }
    }
}

fn detect_cycle(class_id: DocId, bases: &[BaseRef], system: &System, depth: usize) -> bool {
    if depth > MAX_INHERITANCE_DEPTH {
        return true;
    }
    for base in bases {
        if let BaseRef::Internal(base_id) = base {
            if *base_id == class_id {
                return true;
            }
            if let Some(class) = system.get(*base_id).as_class() {
                if detect_cycle(class_id, &class.resolved_bases, system, depth + 1) {
                    return true;
                }
            }
        }
    }
    false
}

/// Depth-first left-to-right fallback with de-duplication, used when C3
/// fails (spec §4.4). The class itself always leads.
#[must_use]
pub fn fallback_linearization(class_id: DocId, bases: &[BaseRef], system: &System) -> Vec<BaseRef> {
    let mut seen = Vec::new();
    seen.push(BaseRef::Internal(class_id));
    for base in bases {
        collect_depth_first(base, system, &mut seen);
    }
    seen
}

fn collect_depth_first(base: &BaseRef, system: &System, seen: &mut Vec<BaseRef>) {
    if seen.contains(base) {
        return;
    }
    seen.push(base.clone());
    if let BaseRef::Internal(id) = base {
        if let Some(class) = system.get(*id).as_class() {
            for next in &class.resolved_bases {
                collect_depth_first(next, system, seen);
            }
        }
    }
}

pub fn report_mro_failure(sink: &mut dyn DiagnosticSink, class_name: &str, reason: &str) {
    sink.report(Diagnostic::new(
        DiagnosticKind::InconsistentMro,
        Severity::Warn,
        format!("{class_name}: {reason}"),
    ));
}
