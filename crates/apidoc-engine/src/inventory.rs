//! External inventory: load/query and the Sphinx-compatible
//! zlib-compressed wire format (spec §6).
//!
//! The format is a short plain-text header followed by a zlib-compressed
//! payload whose decompressed lines look like:
//! `name role:role domain project version url display-name`.
//! `flate2` already appears in the teacher's dependency stack for its own
//! `zlib` module reimplementation; this is the same crate used the
//! ordinary library way instead of reimplementing the codec.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

const HEADER_LINE_1: &str = "# Sphinx inventory version 2";

/// One entry in an external inventory: a fully-qualified name mapped to a
/// role tag and a URL, scoped to the project that published it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    pub name: String,
    pub domain: String,
    pub role: String,
    pub project: String,
    pub version: String,
    pub url: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub name: String,
    pub base_url: String,
    entries: Vec<InventoryEntry>,
}

impl Inventory {
    #[must_use]
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self { name: name.into(), base_url: base_url.into(), entries: Vec::new() }
    }

    pub fn push(&mut self, entry: InventoryEntry) {
        self.entries.push(entry);
    }

    #[must_use]
    pub fn entries(&self) -> &[InventoryEntry] {
        &self.entries
    }

    /// Look up a (possibly partially qualified) name, preferring the
    /// longest matching suffix among entries — the resolver's §4.3 step 3
    /// tie-break.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&InventoryEntry> {
        self.entries
            .iter()
            .filter(|e| e.name == name || e.name.ends_with(&format!(".{name}")))
            .max_by_key(|e| e.name.len())
    }

    #[must_use]
    pub fn resolve_url(&self, entry: &InventoryEntry) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), entry.url)
    }

    /// Parse the wire format: two header lines, a project/version comment
    /// line, an encoding-declaration line, then the zlib-compressed body.
    pub fn parse_wire_format(data: &[u8]) -> Result<Vec<InventoryEntry>, String> {
        let header_end = data
            .windows(1)
            .enumerate()
            .filter(|(_, w)| w[0] == b'\n')
            .nth(3)
            .map(|(i, _)| i + 1)
            .ok_or_else(|| "inventory header truncated".to_string())?;

        let header = std::str::from_utf8(&data[..header_end]).map_err(|e| e.to_string())?;
        if !header.starts_with(HEADER_LINE_1) {
            return Err("unrecognized inventory header".to_string());
        }

        let mut decoder = ZlibDecoder::new(&data[header_end..]);
        let mut decompressed = String::new();
        decoder.read_to_string(&mut decompressed).map_err(|e| e.to_string())?;

        decompressed.lines().filter(|l| !l.is_empty()).map(parse_entry_line).collect()
    }

    /// Emit the wire format bit-compatibly: the four-line text header
    /// followed by the zlib-compressed entry lines.
    #[must_use]
    pub fn to_wire_format(&self, project: &str, version: &str) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(HEADER_LINE_1.as_bytes());
        out.push(b'\n');
        out.extend_from_slice(format!("# Project: {project}").as_bytes());
        out.push(b'\n');
        out.extend_from_slice(format!("# Version: {version}").as_bytes());
        out.push(b'\n');
        out.extend_from_slice(b"# The remainder of this file is compressed using zlib.\n");

        let mut body = String::new();
        for entry in &self.entries {
            body.push_str(&format!(
                "{} {}:{} {} {} {} {}\n",
                entry.name, entry.domain, entry.role, entry.project, entry.version, entry.url, entry.display_name
            ));
        }

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(body.as_bytes()).expect("writing to an in-memory buffer cannot fail");
        let compressed = encoder.finish().expect("finishing an in-memory zlib stream cannot fail");
        out.extend_from_slice(&compressed);
        out
    }
}

fn parse_entry_line(line: &str) -> Result<InventoryEntry, String> {
    let mut parts = line.splitn(2, ' ');
    let name = parts.next().ok_or("missing name field")?.to_string();
    let rest = parts.next().ok_or("truncated inventory line")?;

    let mut fields = rest.splitn(5, ' ');
    let role_field = fields.next().ok_or("missing role field")?;
    let project = fields.next().ok_or("missing project field")?.to_string();
    let version = fields.next().ok_or("missing version field")?.to_string();
    let url = fields.next().ok_or("missing url field")?.to_string();
    let display_name = fields.next().unwrap_or("-").to_string();

    let (domain, role) = role_field.split_once(':').ok_or("malformed domain:role field")?;

    Ok(InventoryEntry {
        name,
        domain: domain.to_string(),
        role: role.to_string(),
        project,
        version,
        url,
        display_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_round_trips() {
        let mut inventory = Inventory::new("example", "https://example.invalid/docs");
        inventory.push(InventoryEntry {
            name: "pkg.core.Session".to_string(),
            domain: "py".to_string(),
            role: "class".to_string(),
            project: "example".to_string(),
            version: "1.0".to_string(),
            url: "pkg.core.html#Session".to_string(),
            display_name: "-".to_string(),
        });

        let wire = inventory.to_wire_format("example", "1.0");
        let entries = Inventory::parse_wire_format(&wire).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "pkg.core.Session");
        assert_eq!(entries[0].role, "class");
        assert_eq!(entries[0].domain, "py");
    }

    #[test]
    fn lookup_prefers_longest_suffix_match() {
        let mut inventory = Inventory::new("example", "https://example.invalid");
        inventory.push(InventoryEntry {
            name: "a.b.Widget".to_string(),
            domain: "py".to_string(),
            role: "class".to_string(),
            project: "p".to_string(),
            version: "1".to_string(),
            url: "a.html".to_string(),
            display_name: "-".to_string(),
        });
        inventory.push(InventoryEntry {
            name: "x.y.Widget".to_string(),
            domain: "py".to_string(),
            role: "class".to_string(),
            project: "p".to_string(),
            version: "1".to_string(),
            url: "x.html".to_string(),
            display_name: "-".to_string(),
        });

        let found = inventory.lookup("Widget");
        assert!(found.is_some());
    }
}
