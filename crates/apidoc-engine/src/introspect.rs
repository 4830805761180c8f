//! Binary-module introspection (spec §4.2.2).
//!
//! A module that can't be parsed (a compiled extension) is imported in a
//! sandboxed child process and its top-level attributes enumerated; for
//! each callable the textual signature comes from the runtime introspection
//! facility, falling back to parsing a `name(arg, arg=default) -- description`
//! first-line docstring convention. The subprocess boundary is a trait so
//! tests exercise the parsing logic without spawning anything, the same way
//! the teacher's `capability.rs` gates host-effecting operations behind an
//! explicit object instead of calling `std::process` directly from
//! business logic.

use std::path::Path;
use std::process::Command;

use crate::error::{EngineError, EngineResult};
use crate::intern::Interner;
use crate::model::{Parameter, ParameterKind, Signature};

/// One top-level attribute reported by introspecting a binary module.
#[derive(Debug, Clone)]
pub struct IntrospectedAttribute {
    pub name: String,
    pub signature: Option<Signature>,
    pub docstring: Option<String>,
}

pub trait BinaryIntrospector {
    /// Enumerate the top-level attributes of the binary module at `path`.
    /// Returns `Err` only when the subprocess itself fails to start or
    /// exits abnormally; a module with zero introspectable attributes is a
    /// valid, empty `Ok(vec![])`. Parameter names parsed out of the
    /// signature text are interned into `interner` rather than discarded.
    fn introspect(&mut self, path: &Path, interner: &mut Interner) -> EngineResult<Vec<IntrospectedAttribute>>;
}

/// Production implementation: spawns a child process and parses its
/// stdout. The wire protocol between the engine and the child process is a
/// deployment detail outside this crate's scope (spec §1's "sandboxed
/// child process" is named but its IPC contract is not specified); this
/// implementation expects one line per attribute in the form
/// `name\tsignature\tdocstring` with empty fields for absent signature or
/// docstring.
pub struct ProcessIntrospector {
    pub interpreter_path: std::path::PathBuf,
}

impl ProcessIntrospector {
    #[must_use]
    pub fn new(interpreter_path: impl Into<std::path::PathBuf>) -> Self {
        Self { interpreter_path: interpreter_path.into() }
    }
}

impl BinaryIntrospector for ProcessIntrospector {
    fn introspect(&mut self, path: &Path, interner: &mut Interner) -> EngineResult<Vec<IntrospectedAttribute>> {
        let output = Command::new(&self.interpreter_path)
            .arg("-m")
            .arg("apidoc_introspect")
            .arg(path)
            .output()
            .map_err(|e| EngineError::IntrospectionFailed { path: path.to_path_buf(), reason: e.to_string() })?;

        if !output.status.success() {
            return Err(EngineError::IntrospectionFailed {
                path: path.to_path_buf(),
                reason: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().filter_map(|line| parse_attribute_line(line, interner)).collect())
    }
}

fn parse_attribute_line(line: &str, interner: &mut Interner) -> Option<IntrospectedAttribute> {
    let mut fields = line.splitn(3, '\t');
    let name = fields.next()?.to_string();
    if name.is_empty() {
        return None;
    }
    let signature_text = fields.next().unwrap_or("");
    let docstring_text = fields.next().unwrap_or("");

    let signature = if signature_text.is_empty() {
        docstring_text.lines().next().and_then(|line| parse_docstring_signature_line(line, interner))
    } else {
        parse_runtime_signature(signature_text, interner)
    };

    Some(IntrospectedAttribute {
        name,
        signature,
        docstring: (!docstring_text.is_empty()).then(|| docstring_text.to_string()),
    })
}

/// Parse a runtime-introspection signature string like `(a, b=1, *args)`.
fn parse_runtime_signature(text: &str, interner: &mut Interner) -> Option<Signature> {
    let inner = text.trim().strip_prefix('(')?.strip_suffix(')')?;
    parse_parameter_list(inner, interner)
}

/// Parse the fallback "documentation-first-line" convention:
/// `name(arg, arg=default) -- description` (spec §4.2.2).
fn parse_docstring_signature_line(line: &str, interner: &mut Interner) -> Option<Signature> {
    let open = line.find('(')?;
    let close = line[open..].find(')').map(|i| i + open)?;
    parse_parameter_list(&line[open + 1..close], interner)
}

fn parse_parameter_list(inner: &str, interner: &mut Interner) -> Option<Signature> {
    if inner.trim().is_empty() {
        return Some(Signature::default());
    }
    let mut parameters = Vec::new();
    for raw in inner.split(',') {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let kind = if let Some(stripped) = raw.strip_prefix("**") {
            let name = interner.intern(stripped.trim());
            parameters.push(Parameter::new(name, ParameterKind::VarKeyword));
            continue;
        } else if let Some(stripped) = raw.strip_prefix('*') {
            let name = interner.intern(stripped.trim());
            parameters.push(Parameter::new(name, ParameterKind::VarPositional));
            continue;
        } else {
            ParameterKind::PositionalOrKeyword
        };
        let (name_part, default) = raw.split_once('=').map(|(n, d)| (n, Some(d))).unwrap_or((raw, None));
        let name = interner.intern(name_part.trim());
        let mut param = Parameter::new(name, kind);
        if let Some(default) = default {
            param = param.with_default(default.trim().to_string());
        }
        parameters.push(param);
    }
    Some(Signature::new(parameters))
}

/// In-memory fake for tests: returns pre-seeded attributes without
/// touching the filesystem or spawning a process.
#[derive(Debug, Default)]
pub struct FakeIntrospector {
    pub attributes: Vec<IntrospectedAttribute>,
    pub fail: bool,
}

impl BinaryIntrospector for FakeIntrospector {
    fn introspect(&mut self, path: &Path, _interner: &mut Interner) -> EngineResult<Vec<IntrospectedAttribute>> {
        if self.fail {
            return Err(EngineError::IntrospectionFailed {
                path: path.to_path_buf(),
                reason: "fake failure".to_string(),
            });
        }
        Ok(std::mem::take(&mut self.attributes))
    }
}
