//! Extension registrar (spec §4.2.6, §2's "Extension registrar" component).
//!
//! Rather than per-node-type method dispatch, the AST builder walks a
//! function-from-(node kind, node)-to-handler table (spec §9's "Dynamic
//! visitor dispatch" design note), and extensions register additional
//! handlers into the same table. Post-processors are ordered by an integer
//! priority, higher running first, ties broken by registration order —
//! mirroring the teacher's `session_manager.rs` orchestration-by-phases
//! style, generalized to a pluggable list instead of a hardcoded sequence.

use crate::error::{Diagnostic, DiagnosticSink};
use crate::system::System;

/// Per-AST-node hook invoked by the builder before/after its own handling
/// of a node. Node inspection is done through `ast_builder`'s own visitor
/// state; this trait only carries the hook identity and ordering needed by
/// the registry, since the node payload type depends on the builder's
/// internal representation and is passed by the builder itself at the call
/// site rather than boxed here.
pub trait PostProcessor {
    /// Stable identifier used in diagnostics when this extension fails
    /// (spec §7: "logs the offending extension's identifier").
    fn name(&self) -> &str;

    /// Higher runs first; ties broken by registration order.
    fn priority(&self) -> i32 {
        0
    }

    fn run(&mut self, system: &mut System, sink: &mut dyn DiagnosticSink);
}

/// Registry of post-processors, ordered by `(priority desc, insertion asc)`
/// once `finalize_order` is called. The system runs extensions only after
/// every module has been built, per spec §4.2.6.
#[derive(Default)]
pub struct ExtensionRegistry {
    post_processors: Vec<Box<dyn PostProcessor>>,
    strict: bool,
}

impl ExtensionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_strict_extensions(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn register_post_processor(&mut self, processor: Box<dyn PostProcessor>) {
        self.post_processors.push(processor);
    }

    /// Run every registered post-processor in priority order (higher
    /// first; insertion order on ties). A panic inside an extension is not
    /// caught here — Rust extensions are statically linked, not sandboxed
    /// subprocesses, so the only failure mode spec §5 asks us to contain is
    /// an extension returning diagnostics, which it does via `sink`.
    pub fn run_post_processors(&mut self, system: &mut System, sink: &mut dyn DiagnosticSink) {
        let mut order: Vec<usize> = (0..self.post_processors.len()).collect();
        order.sort_by(|&a, &b| {
            self.post_processors[b]
                .priority()
                .cmp(&self.post_processors[a].priority())
                .then(a.cmp(&b))
        });
        for index in order {
            self.post_processors[index].run(system, sink);
        }
    }

    #[must_use]
    pub fn strict_extensions(&self) -> bool {
        self.strict
    }
}

/// Helper for built-in post-processors (MRO, re-export relocation,
/// privacy, constants, overloads) to report a problem through the same
/// channel user extensions use, tagged with the built-in's own name.
pub fn report_extension_failure(sink: &mut dyn DiagnosticSink, name: &str, message: impl Into<String>) {
    use crate::error::{DiagnosticKind, Severity};
    sink.report(Diagnostic::new(
        DiagnosticKind::ExtensionFailure,
        Severity::Warn,
        format!("{name}: {}", message.into()),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectingSink;
    use crate::model::PrivacyTable;

    struct Recorder {
        name: &'static str,
        priority: i32,
        log: std::rc::Rc<std::cell::RefCell<Vec<&'static str>>>,
    }

    impl PostProcessor for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn run(&mut self, _system: &mut System, _sink: &mut dyn DiagnosticSink) {
            self.log.borrow_mut().push(self.name);
        }
    }

    #[test]
    fn higher_priority_runs_first_ties_by_insertion() {
        let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut registry = ExtensionRegistry::new();
        registry.register_post_processor(Box::new(Recorder { name: "low", priority: 0, log: log.clone() }));
        registry.register_post_processor(Box::new(Recorder { name: "high", priority: 10, log: log.clone() }));
        registry.register_post_processor(Box::new(Recorder { name: "low-second", priority: 0, log: log.clone() }));

        let mut system = System::new(PrivacyTable::default());
        let mut sink = CollectingSink::new();
        registry.run_post_processors(&mut system, &mut sink);

        assert_eq!(*log.borrow(), vec!["high", "low", "low-second"]);
    }
}
