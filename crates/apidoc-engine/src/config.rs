//! Engine configuration (spec §6 "Inputs").
//!
//! This is the typed surface a driver constructs and passes in; parsing CLI
//! flags or a config file into this struct is explicitly out of scope
//! (spec §1).

use std::path::PathBuf;

use strum::{Display, EnumString, IntoStaticStr};

use crate::model::{Privacy, PrivacyRule};

/// Closed set of docstring markup dialects (spec §6). Parsed
/// case-insensitively by `strum::EnumString`'s `ascii_case_insensitive`; a
/// trailing language code (`restructuredtext-en`) is stripped by the
/// caller before parsing, since the dialect tag itself carries no locale
/// information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr, serde::Serialize, serde::Deserialize)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DocFormat {
    Epytext,
    Restructuredtext,
    Google,
    Numpy,
    Plaintext,
}

impl DocFormat {
    /// Parse a docformat identifier, discarding a trailing `-<lang>` code
    /// (e.g. `restructuredtext-en`) per spec §6.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let base = raw.split('-').next().unwrap_or(raw);
        base.parse().ok()
    }
}

/// One external-inventory reference (spec §6): `[name:]url[:base_url]` for
/// a remote inventory, or `[name:]path:base_url` for a local file. Parsing
/// the reference string itself is the driver's job; the engine only needs
/// the resolved fields.
#[derive(Debug, Clone)]
pub struct InventoryRef {
    pub name: Option<String>,
    pub location: InventoryLocation,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub enum InventoryLocation {
    Url(String),
    File(PathBuf),
}

/// `qname-pattern → { guard-name → bool }` conditional-branch override
/// (spec §4.2.3).
#[derive(Debug, Clone)]
pub struct ConditionalOverride {
    pub qname_pattern: String,
    pub guard_name: String,
    pub taken: bool,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub paths: Vec<PathBuf>,
    pub base_dir: PathBuf,
    pub default_docformat: DocFormat,
    pub inventories: Vec<InventoryRef>,
    pub privacy_rules: Vec<PrivacyRule>,
    pub conditional_overrides: Vec<ConditionalOverride>,
    /// The designated public-names variable (spec §4.2.4); always
    /// `__all__` for the source language this engine targets, kept
    /// configurable so an extension-driven alternate dialect can override
    /// it without touching the builder.
    pub public_names_variable: String,
    /// Promote a parse failure from a warning to a hard error (spec §7's
    /// "fatal only if warnings-as-errors is configured by the driver").
    pub warnings_as_errors: bool,
    /// Re-raise an extension panic instead of downgrading to a diagnostic
    /// (spec §7).
    pub strict_extensions: bool,
    /// Dotted qname of the implicit root object type every base-less class
    /// should terminate its MRO with (spec §3.6). `None` is itself a choice
    /// the driver must make explicitly — "this source language has no
    /// universal base" — rather than something `build_system` decides
    /// silently on the caller's behalf.
    pub implicit_root_type_name: Option<String>,
    /// Interpreter to spawn for binary-module introspection (spec §4.2.2).
    /// `None` skips introspection entirely; binary units still get an empty
    /// placeholder Module per spec.
    pub binary_interpreter: Option<PathBuf>,
}

impl EngineConfig {
    #[must_use]
    pub fn new(paths: Vec<PathBuf>, base_dir: PathBuf) -> Self {
        Self {
            paths,
            base_dir,
            default_docformat: DocFormat::Plaintext,
            inventories: Vec::new(),
            privacy_rules: Vec::new(),
            conditional_overrides: Vec::new(),
            public_names_variable: "__all__".to_string(),
            warnings_as_errors: false,
            strict_extensions: false,
            implicit_root_type_name: None,
            binary_interpreter: None,
        }
    }

    #[must_use]
    pub fn with_default_docformat(mut self, docformat: DocFormat) -> Self {
        self.default_docformat = docformat;
        self
    }

    #[must_use]
    pub fn with_implicit_root_type_name(mut self, name: impl Into<String>) -> Self {
        self.implicit_root_type_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_binary_interpreter(mut self, interpreter_path: impl Into<PathBuf>) -> Self {
        self.binary_interpreter = Some(interpreter_path.into());
        self
    }

    #[must_use]
    pub fn with_privacy_rules(mut self, rules: Vec<PrivacyRule>) -> Self {
        self.privacy_rules = rules;
        self
    }

    /// Privacy resolution falls back to `Privacy::Public` defaults when no
    /// rule matches; `PrivacyTable` performs that logic, this is just the
    /// constructor bridge.
    #[must_use]
    pub fn privacy_table(&self) -> crate::model::PrivacyTable {
        crate::model::PrivacyTable::new(self.privacy_rules.clone())
    }

    /// Look up whether a name-equality guard (spec §4.2.3) is overridden
    /// for the given owning qname.
    #[must_use]
    pub fn guard_override(&self, qname: &str, guard_name: &str) -> Option<bool> {
        self.conditional_overrides
            .iter()
            .find(|o| o.qname_pattern == qname && o.guard_name == guard_name)
            .map(|o| o.taken)
    }
}

/// Default privacy used only where a Documentable hasn't had its privacy
/// computed yet; real resolution happens in `postprocess::privacy_pass`.
pub const DEFAULT_PRIVACY: Privacy = Privacy::Public;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lenient_strips_trailing_language_code() {
        assert_eq!(DocFormat::parse_lenient("restructuredtext-en"), Some(DocFormat::Restructuredtext));
        assert_eq!(DocFormat::parse_lenient("GOOGLE"), Some(DocFormat::Google));
        assert_eq!(DocFormat::parse_lenient("nonsense"), None);
    }
}
