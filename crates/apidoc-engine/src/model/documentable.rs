//! The Documentable tree (spec §3.1–§3.3).
//!
//! Spec §9 prescribes "a tagged-variant sum type with a shared header ...
//! and kind-specific payloads" with dispatch by exhaustive match on the tag
//! rather than a class hierarchy with runtime sub-kind checks. `Documentable`
//! is that header; `Payload` is the per-kind data.

use crate::arena::DocId;
use crate::intern::NameId;
use crate::model::imports::Import;
use crate::model::kind::{AttributeKind, DocKind};
use crate::model::location::SourceLocation;
use crate::model::privacy::Privacy;
use crate::model::signature::Signature;

/// A base-class reference as carried in `resolved_bases` (spec §3.3, §4.4).
/// Kept distinct from an unresolved name because MRO computation must
/// still be able to place an external base in the linearization (spec
/// §4.4: "carried through MRO").
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BaseRef {
    Internal(DocId),
    /// A base that resolved to an inventory entry or an unresolved import;
    /// kept by its dotted name since there is no Documentable to point to.
    External(String),
}

/// Raw decorator as written, before any semantic interpretation (spec
/// §4.2.1: "Decorators as raw dotted-name + argument-source records").
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Decorator {
    pub dotted_name: String,
    /// Raw source text of the call arguments, including parens, or absent
    /// for a bare decorator with no call.
    pub arguments_source: Option<String>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ModulePayload {
    pub all_exports: Option<Vec<NameId>>,
    pub declared_docformat: Option<String>,
    /// Submodules, present only for a `Package`; a plain `Module` leaves
    /// this empty.
    pub submodules: Vec<DocId>,
    pub imports: Vec<Import>,
    pub is_package: bool,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ClassPayload {
    pub raw_bases: Vec<String>,
    pub resolved_bases: Vec<BaseRef>,
    /// Computed by C3 linearization in post-processing; empty until then.
    pub mro: Vec<BaseRef>,
    /// Set when C3 failed and the depth-first fallback (spec §4.4) was used.
    pub mro_failed: bool,
    pub subclasses: Vec<DocId>,
    pub decorators: Vec<Decorator>,
    /// Methods of this class recognized as constructors (spec §4.2.5).
    pub constructor_methods: Vec<DocId>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct FunctionPayload {
    pub signature: Signature,
    pub return_type: Option<String>,
    pub decorators: Vec<Decorator>,
    pub is_async: bool,
    pub is_overload: bool,
    /// Sibling overload declarations once grouped (spec §4.7); empty for a
    /// declaration that isn't part of an overload set.
    pub overloads: Vec<DocId>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct AttributePayload {
    pub attribute_kind: AttributeKind,
    pub declared_type: Option<String>,
    pub value_source: Option<String>,
    /// Number of assignments the builder observed to this name within its
    /// owning scope; constant detection (spec §4.2.1) requires exactly one.
    pub assignment_count: u32,
    /// True if any assignment happened inside a control-flow block
    /// (`if`/`for`/`while`/`try`/...); constant detection requires none.
    pub is_conditional: bool,
    /// True when `value_source` is a literal or literal-of-literals
    /// expression (numbers, strings, simple containers of those) rather
    /// than something computed at runtime (a call, a comprehension, a
    /// binary op on names). Spec §8 scenario 2 classifies a
    /// comprehension-valued SHOUTY_NAME as `Variable`, so literalness gates
    /// `Constant` alongside the name-shape and unconditional-assignment
    /// rules named explicitly in §4.2.1.
    pub is_literal_value: bool,
}

impl Default for AttributeKind {
    fn default() -> Self {
        Self::Variable
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TypeAliasPayload {
    pub value_source: String,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TypeVariablePayload {
    pub constraints: Vec<String>,
}

/// Kind-specific data (spec §3.3). The tag here must always agree with the
/// owning `Documentable::kind`; `System` construction is the only place
/// that builds both together, so no caller can desynchronize them.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Payload {
    Module(ModulePayload),
    Class(ClassPayload),
    Function(FunctionPayload),
    Attribute(AttributePayload),
    TypeAlias(TypeAliasPayload),
    TypeVariable(TypeVariablePayload),
    /// Property, Method, ClassMethod, StaticMethod, TypeVariable without
    /// extra state beyond the shared header reuse `Function`'s payload
    /// shape (a Property after reclassification keeps its originating
    /// signature for documentation of the getter, per spec §4.7).
    None,
}

/// One entity in the in-memory model: a package, module, class, function,
/// method, attribute, type alias, or type variable.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Documentable {
    pub name: NameId,
    pub parent: Option<DocId>,
    pub children: Vec<DocId>,
    pub fully_qualified_name: String,
    pub kind: DocKind,
    pub source_location: Option<SourceLocation>,
    pub docstring: Option<Docstring>,
    pub docstring_format: Option<String>,
    pub privacy: Privacy,
    pub is_introspected: bool,
    pub payload: Payload,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Docstring {
    pub text: String,
    /// Line offset within the owning source file where the docstring text
    /// begins, for "jump to docstring" navigation independent of the
    /// Documentable's own `source_location`.
    pub line_offset: u32,
}

impl Documentable {
    #[must_use]
    pub fn new(name: NameId, kind: DocKind, fully_qualified_name: String, payload: Payload) -> Self {
        Self {
            name,
            parent: None,
            children: Vec::new(),
            fully_qualified_name,
            kind,
            source_location: None,
            docstring: None,
            docstring_format: None,
            privacy: Privacy::Public,
            is_introspected: false,
            payload,
        }
    }

    #[must_use]
    pub fn as_module(&self) -> Option<&ModulePayload> {
        match &self.payload {
            Payload::Module(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_module_mut(&mut self) -> Option<&mut ModulePayload> {
        match &mut self.payload {
            Payload::Module(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_class(&self) -> Option<&ClassPayload> {
        match &self.payload {
            Payload::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_class_mut(&mut self) -> Option<&mut ClassPayload> {
        match &mut self.payload {
            Payload::Class(c) => Some(c),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_function(&self) -> Option<&FunctionPayload> {
        match &self.payload {
            Payload::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_function_mut(&mut self) -> Option<&mut FunctionPayload> {
        match &mut self.payload {
            Payload::Function(f) => Some(f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_attribute(&self) -> Option<&AttributePayload> {
        match &self.payload {
            Payload::Attribute(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_attribute_mut(&mut self) -> Option<&mut AttributePayload> {
        match &mut self.payload {
            Payload::Attribute(a) => Some(a),
            _ => None,
        }
    }
}
