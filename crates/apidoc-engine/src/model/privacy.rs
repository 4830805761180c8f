//! Privacy classification (spec §4.6).

use strum::{Display, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr, serde::Serialize, serde::Deserialize)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Privacy {
    Public,
    Private,
    Hidden,
}

/// Defaults: a single leading underscore is PRIVATE; dunder names
/// (`__x__`) are PUBLIC; everything else is PUBLIC.
#[must_use]
pub fn default_privacy(name: &str) -> Privacy {
    if is_dunder(name) {
        Privacy::Public
    } else if name.starts_with('_') {
        Privacy::Private
    } else {
        Privacy::Public
    }
}

fn is_dunder(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

/// One user-configured `(qname-glob, privacy)` override rule (spec §4.6,
/// §6's "privacy override rules" input). Rules are tried in the order
/// they were configured; the *last* match wins, except an exact-qname
/// match always outranks a glob match regardless of position.
#[derive(Debug, Clone)]
pub struct PrivacyRule {
    pub pattern: String,
    pub privacy: Privacy,
}

impl PrivacyRule {
    #[must_use]
    pub fn new(pattern: impl Into<String>, privacy: Privacy) -> Self {
        Self { pattern: pattern.into(), privacy }
    }

    fn is_exact(&self) -> bool {
        !self.pattern.contains('*') && !self.pattern.contains('?')
    }

    fn matches(&self, qname: &str) -> bool {
        glob_match(&self.pattern, qname)
    }
}

/// Ordered table of privacy override rules plus the resolution algorithm
/// from spec §4.6.
#[derive(Debug, Clone, Default)]
pub struct PrivacyTable {
    rules: Vec<PrivacyRule>,
}

impl PrivacyTable {
    #[must_use]
    pub fn new(rules: Vec<PrivacyRule>) -> Self {
        Self { rules }
    }

    /// Resolve the effective privacy for `qname` whose own unqualified
    /// `name` would otherwise get `default_privacy(name)`.
    #[must_use]
    pub fn resolve(&self, qname: &str, name: &str) -> Privacy {
        let mut result = default_privacy(name);
        let mut exact_match: Option<Privacy> = None;
        for rule in &self.rules {
            if !rule.matches(qname) {
                continue;
            }
            if rule.is_exact() {
                exact_match = Some(rule.privacy);
            } else {
                result = rule.privacy;
            }
        }
        exact_match.unwrap_or(result)
    }
}

/// A minimal glob matcher supporting `*` (any run of characters, including
/// none) and `?` (exactly one character) — the two wildcards spec §4.6's
/// "qname-glob" rules need. No full glob crate is pulled in since `.`-
/// delimited qname patterns never need character classes or brace
/// expansion.
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    glob_match_inner(&pattern, &text)
}

fn glob_match_inner(pattern: &[char], text: &[char]) -> bool {
    match pattern.first() {
        None => text.is_empty(),
        Some('*') => {
            glob_match_inner(&pattern[1..], text)
                || (!text.is_empty() && glob_match_inner(pattern, &text[1..]))
        }
        Some('?') => !text.is_empty() && glob_match_inner(&pattern[1..], &text[1..]),
        Some(c) => text.first() == Some(c) && glob_match_inner(&pattern[1..], &text[1..]),
    }
}
