//! Filesystem-safe names for objects and extracted scripts.

use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::kind::Kind;

/// Extension of extracted script files.
pub const SCRIPT_EXTENSION: &str = "flux";

// Common set of characters reserved in file names on at least one major
// platform. They are removed, not substituted.
const RESERVED: &[char] = &['|', '\\', '?', '*', '<', '>', '"', ':', '/'];

/// Strip characters that are not valid in a file name.
///
/// Reserved characters and control characters are dropped, then any run
/// of spaces left behind collapses into a single space. Escaping an
/// already escaped name changes nothing.
pub fn escape_name(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        if RESERVED.contains(&c) || c.is_control() {
            continue;
        }
        if c == ' ' && escaped.ends_with(' ') {
            continue;
        }
        escaped.push(c);
    }
    escaped
}

/// The directory name for an object: its escaped declared name.
///
/// Names that escape to nothing, or to `.`/`..`, cannot hold a template.
pub fn object_dir_name(kind: &Kind, name: &str) -> Result<String> {
    let escaped = escape_name(name);
    match escaped.as_str() {
        "" | "." | ".." => Err(Error::InvalidName {
            kind: kind.to_string(),
            name: name.to_string(),
        }),
        _ => Ok(escaped),
    }
}

/// Hands out unique script file names within one object.
///
/// The first script with a given base name gets it unchanged; later ones
/// get `_0`, `_1`, ... appended. A candidate that is already taken by some
/// other script of the same object is skipped.
#[derive(Debug, Default)]
pub struct ScriptNamer {
    counters: HashMap<String, usize>,
    taken: HashSet<String>,
}

impl ScriptNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next free file name for `base`, escaped and with extension.
    pub fn next_name(&mut self, base: &str) -> String {
        loop {
            let candidate = match self.counters.get(base) {
                None => base.to_string(),
                Some(n) => format!("{base}_{n}"),
            };
            let next = self.counters.get(base).map_or(0, |n| n + 1);
            self.counters.insert(base.to_string(), next);

            let file_name = format!("{}.{SCRIPT_EXTENSION}", escape_name(&candidate));
            if self.taken.insert(file_name.clone()) {
                return file_name;
            }
        }
    }
}
