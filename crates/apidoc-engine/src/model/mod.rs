//! The in-memory object model (spec §3): Documentables, their kind-specific
//! payloads, import records, privacy classification, and source locations.

pub mod documentable;
pub mod imports;
pub mod kind;
pub mod location;
pub mod privacy;
pub mod signature;

pub use documentable::{
    AttributePayload, BaseRef, ClassPayload, Decorator, Docstring, Documentable, FunctionPayload,
    ModulePayload, Payload, TypeAliasPayload, TypeVariablePayload,
};
pub use imports::{Import, ImportedName, ImportedNames};
pub use kind::{AttributeKind, DocKind};
pub use location::SourceLocation;
pub use privacy::{Privacy, PrivacyRule, PrivacyTable, default_privacy};
pub use signature::{Parameter, ParameterKind, Signature};
