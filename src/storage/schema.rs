//! Static schema tables for key-value stores.
//!
//! Every store kind declares the full set of `(section, key)` pairs it
//! accepts. A [`StoreKey`] can only be built against a schema, so an
//! undeclared key is rejected before it ever reaches the store.

use crate::{Error, Result};
use std::fmt;

/// One declared `(section, key)` pair with its default and validation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaEntry {
    pub section: &'static str,
    pub key: &'static str,
    /// Value written by the default file
    pub default: &'static str,
    /// Must be non-empty for the store to be valid
    pub mandatory: bool,
    /// Value is a directory that must exist (or be creatable) for validity
    pub directory: bool,
}

impl SchemaEntry {
    pub const fn new(section: &'static str, key: &'static str, default: &'static str) -> Self {
        Self {
            section,
            key,
            default,
            mandatory: false,
            directory: false,
        }
    }

    pub const fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub const fn directory(mut self) -> Self {
        self.directory = true;
        self
    }

    /// Dotted form, e.g. `project.title`.
    pub fn dotted(&self) -> String {
        format!("{}.{}", self.section, self.key)
    }
}

/// Schema of one store kind.
#[derive(Debug, PartialEq, Eq)]
pub struct Schema {
    /// Human name used in messages ("configuration", "metadata")
    pub name: &'static str,
    /// Current schema revision, stored under `metadata.version`
    pub version: &'static str,
    pub entries: &'static [SchemaEntry],
}

/// Section and key holding the schema revision in every store.
pub const VERSION_SECTION: &str = "metadata";
pub const VERSION_KEY: &str = "version";

impl Schema {
    pub fn entry(&self, section: &str, key: &str) -> Option<&SchemaEntry> {
        self.entries
            .iter()
            .find(|e| e.section == section && e.key == key)
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.entries.iter().any(|e| e.section == section)
    }

    /// All declared keys in dotted form, in declaration order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(SchemaEntry::dotted).collect()
    }

    /// Build a validated key from its dotted form.
    pub fn key(&'static self, dotted: &str) -> Result<StoreKey> {
        StoreKey::parse(dotted, self)
    }

    fn unknown(&self, dotted: &str) -> Error {
        Error::UnknownKey {
            key: dotted.to_string(),
            valid: self.keys().join(", "),
        }
    }
}

/// A `section.key` pair known to belong to a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreKey {
    entry: &'static SchemaEntry,
}

impl StoreKey {
    /// Parse `section.key` (case-insensitive) and check it against `schema`.
    pub fn parse(dotted: &str, schema: &'static Schema) -> Result<Self> {
        let normalized = dotted.trim().to_lowercase();
        let Some((section, key)) = normalized.split_once('.') else {
            return Err(schema.unknown(dotted));
        };
        if section.is_empty() || key.is_empty() || !schema.has_section(section) {
            return Err(schema.unknown(dotted));
        }
        schema
            .entry(section, key)
            .map(|entry| Self { entry })
            .ok_or_else(|| schema.unknown(dotted))
    }

    pub fn section(&self) -> &'static str {
        self.entry.section
    }

    pub fn key(&self) -> &'static str {
        self.entry.key
    }

    pub fn entry(&self) -> &'static SchemaEntry {
        self.entry
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entry.section, self.entry.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TEST_SCHEMA: Schema = Schema {
        name: "test",
        version: "3",
        entries: &[
            SchemaEntry::new("metadata", "version", "3"),
            SchemaEntry::new("main", "name", "").mandatory(),
            SchemaEntry::new("main", "home", "").mandatory().directory(),
        ],
    };

    #[test]
    fn test_parse_declared_key() {
        let key = StoreKey::parse("main.name", &TEST_SCHEMA).unwrap();
        assert_eq!(key.section(), "main");
        assert_eq!(key.key(), "name");
        assert_eq!(key.to_string(), "main.name");
        assert!(key.entry().mandatory);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let key = TEST_SCHEMA.key("Main.NAME").unwrap();
        assert_eq!(key.to_string(), "main.name");
    }

    #[test]
    fn test_unknown_section_and_key() {
        for bad in ["other.name", "main.other", "main", "main.", ".name", ""] {
            match StoreKey::parse(bad, &TEST_SCHEMA) {
                Err(Error::UnknownKey { key, valid }) => {
                    assert_eq!(key, bad);
                    assert!(valid.contains("main.home"));
                }
                other => panic!("expected UnknownKey for '{}', got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_keys_in_declaration_order() {
        assert_eq!(
            TEST_SCHEMA.keys(),
            vec!["metadata.version", "main.name", "main.home"]
        );
    }
}
