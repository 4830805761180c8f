//! The closed set of Documentable kinds (spec §3.1).

use strum::{Display, EnumString, IntoStaticStr};

/// Every named element in the registry carries exactly one of these tags.
/// `Exception` is a subvariant of `Class` (it is always a class whose
/// resolved bases eventually reach the language's base exception type, but
/// is tagged distinctly so renderers can group it separately without
/// re-deriving the distinction from the MRO).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr, serde::Serialize, serde::Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum DocKind {
    Package,
    Module,
    Class,
    Exception,
    Function,
    Method,
    ClassMethod,
    StaticMethod,
    Property,
    Attribute,
    TypeAlias,
    TypeVariable,
}

impl DocKind {
    #[must_use]
    pub fn is_callable(self) -> bool {
        matches!(self, Self::Function | Self::Method | Self::ClassMethod | Self::StaticMethod)
    }

    #[must_use]
    pub fn is_class_like(self) -> bool {
        matches!(self, Self::Class | Self::Exception)
    }

    #[must_use]
    pub fn is_namespace(self) -> bool {
        matches!(self, Self::Package | Self::Module)
    }
}

/// Sub-kind of an `Attribute` Documentable (spec §3.1's parenthetical).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr, serde::Serialize, serde::Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum AttributeKind {
    Variable,
    InstanceVariable,
    ClassVariable,
    Constant,
}
