//! Source-text scanner (spec §4.1).
//!
//! Enumerates translation units from a list of input paths and orders them
//! deterministically: submodules before their package's initializer,
//! packages in lexicographic path order, non-initializer modules
//! lexicographically within a directory, the initializer last.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Diagnostic, DiagnosticKind, DiagnosticSink, Severity};

const PACKAGE_INIT_FILE: &str = "__init__.py";
const BINARY_MODULE_EXTENSIONS: &[&str] = &["pyd", "so"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitKind {
    Module,
    PackageInit,
    Binary,
}

#[derive(Debug, Clone)]
pub struct ScanUnit {
    pub path: PathBuf,
    pub kind: UnitKind,
    /// Dotted module path relative to the scan root that contains it.
    pub dotted_name: String,
}

/// Scan `roots` (each a single file, a package directory, or a compiled
/// binary module) and return translation units in the deterministic order
/// spec §4.1 requires. Unreadable paths and paths outside `base_dir`
/// produce a warning via `sink` and are skipped rather than aborting.
pub fn scan(roots: &[PathBuf], base_dir: &Path, sink: &mut dyn DiagnosticSink) -> Vec<ScanUnit> {
    let mut units = Vec::new();
    let mut sorted_roots: Vec<&PathBuf> = roots.iter().collect();
    sorted_roots.sort();

    for root in sorted_roots {
        if !root.starts_with(base_dir) {
            sink.report(Diagnostic::new(
                DiagnosticKind::PathUnreadable,
                Severity::Warn,
                format!("{} is outside base directory {}; skipped", root.display(), base_dir.display()),
            ));
            continue;
        }
        match fs::metadata(root) {
            Err(e) => {
                sink.report(Diagnostic::new(
                    DiagnosticKind::PathUnreadable,
                    Severity::Warn,
                    format!("cannot read {}: {e}", root.display()),
                ));
            }
            Ok(meta) if meta.is_dir() => {
                let root_name = module_name(root);
                scan_package(root, &root_name, &mut units, sink);
            }
            Ok(_) => {
                let kind = unit_kind_for_file(root);
                units.push(ScanUnit { path: root.clone(), kind, dotted_name: module_name(root) });
            }
        }
    }
    units
}

fn scan_package(dir: &Path, dotted_prefix: &str, units: &mut Vec<ScanUnit>, sink: &mut dyn DiagnosticSink) {
    let Ok(read_dir) = fs::read_dir(dir) else {
        sink.report(Diagnostic::new(
            DiagnosticKind::PathUnreadable,
            Severity::Warn,
            format!("cannot read directory {}", dir.display()),
        ));
        return;
    };

    let mut entries: Vec<PathBuf> = read_dir.filter_map(|e| e.ok().map(|e| e.path())).collect();
    entries.sort();

    let mut init_file = None;
    for entry in entries {
        if entry.is_dir() {
            let child_name = format!("{dotted_prefix}.{}", module_name(&entry));
            scan_package(&entry, &child_name, units, sink);
        } else if entry.file_name().and_then(|n| n.to_str()) == Some(PACKAGE_INIT_FILE) {
            init_file = Some(entry);
        } else if is_source_or_binary(&entry) {
            let kind = unit_kind_for_file(&entry);
            let dotted_name = format!("{dotted_prefix}.{}", module_name(&entry));
            units.push(ScanUnit { path: entry, kind, dotted_name });
        }
    }

    if let Some(init) = init_file {
        units.push(ScanUnit { path: init, kind: UnitKind::PackageInit, dotted_name: dotted_prefix.to_string() });
    }
}

fn is_source_or_binary(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("py")) || is_binary_module(path)
}

fn is_binary_module(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| BINARY_MODULE_EXTENSIONS.contains(&ext))
}

fn unit_kind_for_file(path: &Path) -> UnitKind {
    if is_binary_module(path) {
        UnitKind::Binary
    } else {
        UnitKind::Module
    }
}

fn module_name(path: &Path) -> String {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectingSink;
    use std::fs;

    #[test]
    fn package_init_scanned_last() {
        let dir = std::env::temp_dir().join(format!("apidoc-scan-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("a.py"), "").unwrap();
        fs::write(dir.join("__init__.py"), "").unwrap();

        let mut sink = CollectingSink::new();
        let units = scan(&[dir.clone()], &std::env::temp_dir(), &mut sink);

        assert_eq!(units.last().unwrap().kind, UnitKind::PackageInit);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn path_outside_base_dir_is_skipped_with_warning() {
        let mut sink = CollectingSink::new();
        let outside = PathBuf::from("/definitely/not/under/base");
        let units = scan(&[outside], Path::new("/some/base"), &mut sink);
        assert!(units.is_empty());
        assert_eq!(sink.diagnostics().len(), 1);
    }
}
