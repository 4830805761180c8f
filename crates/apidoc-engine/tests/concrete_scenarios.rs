//! End-to-end tests for the worked scenarios in the specification's
//! "Concrete scenarios" section: each builds one small module (or a tiny
//! package) through the same `ast_builder` + `postprocess` pipeline
//! `lib::build_system` uses, then asserts the documented outcome.

use std::path::Path;

use apidoc_engine::config::EngineConfig;
use apidoc_engine::error::CollectingSink;
use apidoc_engine::model::{AttributeKind, BaseRef, Privacy, PrivacyTable};
use apidoc_engine::system::System;
use apidoc_engine::{DocKind, ast_builder, postprocess};
use pretty_assertions::assert_eq;

fn build(source: &str, dotted_name: &str) -> (System, apidoc_engine::DocId, CollectingSink) {
    let mut system = System::new(PrivacyTable::default());
    let mut sink = CollectingSink::new();
    let config = EngineConfig::new(vec![], std::path::PathBuf::from("/"));
    let id = ast_builder::build_module(&mut system, &mut sink, &config, Path::new("m.py"), dotted_name, false, source);
    (system, id, sink)
}

#[test]
fn scenario_2_computed_shouty_name_is_variable_not_constant() {
    let (mut system, module, mut sink) = build(
        "SQUARES = [n**2 for n in range(10)]\n\"docstring for squares\"\n",
        "pkg",
    );
    postprocess::run(&mut system, &mut sink, None);

    let attr_id = system.get(module).children[0];
    let attr = system.get(attr_id);
    assert_eq!(attr.as_attribute().unwrap().attribute_kind, AttributeKind::Variable);
    assert_eq!(attr.docstring.as_ref().unwrap().text, "docstring for squares");
}

#[test]
fn scenario_3_final_annotated_literal_is_constant() {
    let (mut system, module, mut sink) = build("X: Final = 3.14\n", "pkg");
    postprocess::run(&mut system, &mut sink, None);

    let attr_id = system.get(module).children[0];
    let attr = system.get(attr_id).as_attribute().unwrap();
    assert_eq!(attr.attribute_kind, AttributeKind::Constant);
    assert_eq!(attr.value_source.as_deref(), Some("3.14"));
}

#[test]
fn scenario_4_default_privacy_matches_name_shape() {
    let source = "class A:\n    def __init__(self):\n        pass\n    def _helper(self):\n        pass\n    def __eq__(self, other):\n        pass\n";
    let (mut system, module, mut sink) = build(source, "pkg");
    postprocess::run(&mut system, &mut sink, None);

    let class_id = system.get(module).children[0];
    assert_eq!(system.get(class_id).privacy, Privacy::Public);

    for &child in &system.get(class_id).children {
        let doc = system.get(child);
        let name = system.interner().resolve(doc.name);
        let expected = match name {
            "__init__" | "__eq__" => Privacy::Public,
            "_helper" => Privacy::Private,
            other => panic!("unexpected method {other}"),
        };
        assert_eq!(doc.privacy, expected, "{name}");
    }
}

#[test]
fn scenario_5_diamond_inheritance_linearizes_by_c3() {
    let source = "class W:\n    pass\nclass X(W):\n    pass\nclass Y(W):\n    pass\nclass B(X, Y):\n    pass\n";
    let (mut system, module, mut sink) = build(source, "pkg");

    // `resolved_bases` is normally filled in during a dedicated resolution
    // pass driven by the name resolver; this test drives it directly since
    // it only needs to exercise MRO computation over an already-resolved
    // class graph.
    let children = system.get(module).children.clone();
    let by_name: std::collections::HashMap<&str, apidoc_engine::DocId> = children
        .iter()
        .map(|&id| (system.interner().resolve(system.get(id).name), id))
        .collect();
    let w = by_name["W"];
    let x = by_name["X"];
    let y = by_name["Y"];
    let b = by_name["B"];
    system.get_mut(x).as_class_mut().unwrap().resolved_bases = vec![BaseRef::Internal(w)];
    system.get_mut(y).as_class_mut().unwrap().resolved_bases = vec![BaseRef::Internal(w)];
    system.get_mut(b).as_class_mut().unwrap().resolved_bases = vec![BaseRef::Internal(x), BaseRef::Internal(y)];

    postprocess::run(&mut system, &mut sink, None);

    let mro = &system.get(b).as_class().unwrap().mro;
    assert_eq!(mro, &vec![BaseRef::Internal(b), BaseRef::Internal(x), BaseRef::Internal(y), BaseRef::Internal(w)]);
    assert!(!system.get(b).as_class().unwrap().mro_failed);
}

#[test]
fn scenario_6_type_checking_guard_hides_import_unless_configured() {
    let source = "if TYPE_CHECKING:\n    from pkg.types import T\n";
    let mut system = System::new(PrivacyTable::default());
    let mut sink = CollectingSink::new();
    let config = EngineConfig::new(vec![], std::path::PathBuf::from("/"));
    let module = ast_builder::build_module(&mut system, &mut sink, &config, Path::new("m.py"), "pkg", false, source);

    // With no configured override, both branches are taken (§4.2.3's
    // default), so the import is recorded like any other.
    assert_eq!(system.get(module).as_module().unwrap().imports.len(), 1);
}

#[test]
fn multi_name_and_wildcard_imports_are_both_recorded() {
    let source = "import sys, os\nfrom pkg.util import *\n";
    let (system, module, _sink) = build(source, "pkg");
    let imports = &system.get(module).as_module().unwrap().imports;
    assert_eq!(imports.len(), 3);
}

#[test]
fn scenario_1_reexport_relocates_to_innermost_qname() {
    let mut system = System::new(PrivacyTable::default());
    let mut sink = CollectingSink::new();
    let config = EngineConfig::new(vec![], std::path::PathBuf::from("/"));

    let inner = ast_builder::build_module(
        &mut system,
        &mut sink,
        &config,
        Path::new("session.py"),
        "pkg.core.session",
        false,
        "class MyClass:\n    pass\n",
    );
    let _package = ast_builder::build_module(
        &mut system,
        &mut sink,
        &config,
        Path::new("__init__.py"),
        "pkg",
        true,
        "from pkg.core.session import MyClass\n__all__ = [\"MyClass\"]\n",
    );

    let class_id = system.get(inner).children[0];
    postprocess::run(&mut system, &mut sink, None);

    assert_eq!(system.get(class_id).fully_qualified_name, "pkg.MyClass");
    assert_eq!(system.lookup("pkg.MyClass"), Some(class_id));
    assert_eq!(system.lookup("pkg.core.session.MyClass"), Some(class_id));
}

#[test]
fn serialized_registry_round_trips_through_json() {
    let (mut system, _module, mut sink) = build("class A:\n    pass\n", "pkg");
    postprocess::run(&mut system, &mut sink, None);

    let serialized = apidoc_engine::serialize::serialize_system(&system);
    let json = serde_json::to_string(&serialized).unwrap();
    let restored: apidoc_engine::serialize::SerializedSystem = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.documentables.len(), serialized.documentables.len());
}

#[test]
fn kind_of_every_module_child_matches_its_syntax_form() {
    let source = "class C:\n    pass\ndef f():\n    pass\nVALUE = 1\n";
    let (system, module, _sink) = build(source, "pkg");
    let kinds: Vec<DocKind> = system.get(module).children.iter().map(|&id| system.get(id).kind).collect();
    assert_eq!(kinds, vec![DocKind::Class, DocKind::Function, DocKind::Attribute]);
}
