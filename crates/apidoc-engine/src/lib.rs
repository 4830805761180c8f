//! A whole-program static analysis engine for generating API documentation
//! from a Python-like source tree: scans translation units, builds a
//! Documentable registry from their syntax trees, resolves cross-references
//! and inheritance, and hands the result to a markup/rendering layer this
//! crate does not itself provide.

pub mod arena;
pub mod ast_builder;
pub mod config;
pub mod error;
pub mod extensions;
pub mod intern;
pub mod introspect;
pub mod inventory;
pub mod linker;
pub mod model;
pub mod postprocess;
pub mod resolver;
pub mod scanner;
pub mod scope;
pub mod serialize;
pub mod system;

use std::fs;

use crate::config::EngineConfig;
use crate::error::DiagnosticSink;
use crate::introspect::{BinaryIntrospector, ProcessIntrospector};
use crate::scanner::UnitKind;
use crate::system::System;

pub use crate::arena::DocId;
pub use crate::error::{Diagnostic, DiagnosticKind, EngineError, EngineResult, Severity};
pub use crate::model::{DocKind, Documentable, Privacy};
pub use crate::system::System as DocumentationSystem;

/// Run the full pipeline (spec §2's data-flow: scan, build, post-process)
/// over `config`'s input paths and return the populated registry.
///
/// The implicit root object type every base-less class's MRO should
/// terminate with (spec §3.6) is synthesized from
/// `config.implicit_root_type_name` when set; a `None` there is itself the
/// driver's explicit declaration that the target language has no universal
/// base, rather than something this function assumes by default.
pub fn build_system(config: &EngineConfig, sink: &mut dyn DiagnosticSink) -> System {
    let mut system = System::new(config.privacy_table());
    for inventory_ref in &config.inventories {
        if let Some(inventory) = load_inventory_ref(inventory_ref) {
            system.load_inventory(inventory);
        }
    }

    let root_type_for_mro = config.implicit_root_type_name.as_deref().map(|name| {
        let interned = system.interner_mut().intern(name);
        system.insert(model::Documentable::new(interned, model::DocKind::Class, name.to_string(), model::Payload::Class(model::ClassPayload::default())))
    });

    let units = scanner::scan(&config.paths, &config.base_dir, sink);
    let mut introspector = config.binary_interpreter.clone().map(ProcessIntrospector::new);
    for unit in &units {
        if unit.kind == UnitKind::Binary {
            let module_id = ast_builder::build_binary_module(&mut system, &unit.dotted_name, false);
            if !unit.dotted_name.contains('.') {
                system.register_root(module_id);
            }
            let Some(introspector) = introspector.as_mut() else { continue };
            match introspector.introspect(&unit.path, system.interner_mut()) {
                Ok(attributes) => ast_builder::populate_introspected_attributes(&mut system, module_id, &attributes),
                Err(err) => sink.report(
                    error::Diagnostic::new(
                        error::DiagnosticKind::IntrospectionFailure,
                        error::Severity::Warn,
                        format!("introspection failed for {}: {err}", unit.path.display()),
                    )
                    .at(model::SourceLocation::new(unit.path.clone(), 0, 0)),
                ),
            }
            continue;
        }
        let Ok(source) = fs::read_to_string(&unit.path) else {
            sink.report(
                error::Diagnostic::new(
                    error::DiagnosticKind::PathUnreadable,
                    error::Severity::Warn,
                    format!("cannot read {}", unit.path.display()),
                )
                .at(model::SourceLocation::new(unit.path.clone(), 0, 0)),
            );
            continue;
        };
        let is_package = unit.kind == UnitKind::PackageInit;
        let module_id = ast_builder::build_module(&mut system, sink, config, &unit.path, &unit.dotted_name, is_package, &source);
        if !unit.dotted_name.contains('.') {
            system.register_root(module_id);
        }
    }

    postprocess::run(&mut system, sink, root_type_for_mro);
    system
}


fn load_inventory_ref(inventory_ref: &config::InventoryRef) -> Option<inventory::Inventory> {
    let bytes = match &inventory_ref.location {
        config::InventoryLocation::File(path) => fs::read(path).ok()?,
        config::InventoryLocation::Url(_) => return None,
    };
    let entries = inventory::Inventory::parse_wire_format(&bytes).ok()?;
    let name = inventory_ref.name.clone().unwrap_or_default();
    let mut inventory = inventory::Inventory::new(name, inventory_ref.base_url.clone());
    for entry in entries {
        inventory.push(entry);
    }
    Some(inventory)
}
