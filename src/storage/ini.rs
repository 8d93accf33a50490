//! Minimal INI codec compatible with files written by Python's `configparser`.
//!
//! ```text
//! [metadata]
//! version = 1
//!
//! [project]
//! title = My project
//! end_date =
//!
//! ```
//!
//! Only the subset that the project trees actually use is supported: no
//! interpolation, no `DEFAULT` section semantics, no inline comments.

use std::fmt::Write;

/// Parse failure with the offending (1-based) line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// One `[section]` with its entries in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

/// An ordered two-level document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<Section>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.iter().any(|s| s.name == section)
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.name == section)?
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a value, creating the section and key as needed.
    ///
    /// Returns the previous value, if any.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> Option<String> {
        let idx = match self.sections.iter().position(|s| s.name == section) {
            Some(idx) => idx,
            None => {
                self.sections.push(Section {
                    name: section.to_string(),
                    entries: Vec::new(),
                });
                self.sections.len() - 1
            }
        };
        let entries = &mut self.sections[idx].entries;
        match entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => Some(std::mem::replace(v, value.to_string())),
            None => {
                entries.push((key.to_string(), value.to_string()));
                None
            }
        }
    }

    /// Remove a key; used to roll back a failed write.
    pub fn remove(&mut self, section: &str, key: &str) {
        if let Some(s) = self.sections.iter_mut().find(|s| s.name == section) {
            s.entries.retain(|(k, _)| k != key);
        }
    }

    /// The form `value` takes once written and parsed back: every line
    /// trimmed, trailing blank lines dropped.
    pub fn normalize_value(value: &str) -> String {
        let lines: Vec<&str> = value.lines().map(str::trim).collect();
        lines.join("\n").trim_end().to_string()
    }

    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut doc = IniDocument::new();
        // (section index, entry index) of the last value, for continuations
        let mut last: Option<(usize, usize)> = None;

        for (n, raw) in text.lines().enumerate() {
            let line_no = n + 1;
            let trimmed = raw.trim();

            let is_indented = raw.starts_with(' ') || raw.starts_with('\t');
            if is_indented {
                if let Some((s, e)) = last {
                    let value = &mut doc.sections[s].entries[e].1;
                    value.push('\n');
                    value.push_str(trimmed);
                    continue;
                }
            }

            if trimmed.is_empty() {
                // A blank line ends a multi-line value
                last = None;
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            if let Some(rest) = trimmed.strip_prefix('[') {
                let name = rest.strip_suffix(']').ok_or_else(|| ParseError {
                    line: line_no,
                    message: format!("unterminated section header '{}'", trimmed),
                })?;
                let name = name.trim().to_lowercase();
                if name.is_empty() {
                    return Err(ParseError {
                        line: line_no,
                        message: "empty section name".to_string(),
                    });
                }
                if doc.has_section(&name) {
                    return Err(ParseError {
                        line: line_no,
                        message: format!("duplicate section '{}'", name),
                    });
                }
                doc.sections.push(Section {
                    name,
                    entries: Vec::new(),
                });
                last = None;
                continue;
            }

            let Some(section_idx) = doc.sections.len().checked_sub(1) else {
                return Err(ParseError {
                    line: line_no,
                    message: "key found before any section header".to_string(),
                });
            };

            let split_at = trimmed.find(['=', ':']).ok_or_else(|| ParseError {
                line: line_no,
                message: format!("expected 'key = value', got '{}'", trimmed),
            })?;
            let key = trimmed[..split_at].trim().to_lowercase();
            let value = trimmed[split_at + 1..].trim();
            if key.is_empty() {
                return Err(ParseError {
                    line: line_no,
                    message: "empty key".to_string(),
                });
            }

            let entries = &mut doc.sections[section_idx].entries;
            if entries.iter().any(|(k, _)| *k == key) {
                return Err(ParseError {
                    line: line_no,
                    message: format!("duplicate key '{}'", key),
                });
            }
            entries.push((key, value.to_string()));
            last = Some((section_idx, entries.len() - 1));
        }

        // Whitespace-only continuation lines must not leave trailing newlines
        for section in &mut doc.sections {
            for (_, value) in &mut section.entries {
                let end = value.trim_end().len();
                value.truncate(end);
            }
        }

        Ok(doc)
    }

    /// Serialize the way `configparser` writes files: `key = value`, with a
    /// blank line after every section and continuation lines tab-indented.
    pub fn to_string_pretty(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            let _ = writeln!(out, "[{}]", section.name);
            for (key, value) in &section.entries {
                let _ = writeln!(out, "{} = {}", key, value.replace('\n', "\n\t"));
            }
            out.push('\n');
        }
        out
    }
}
