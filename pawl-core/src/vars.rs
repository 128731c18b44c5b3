//! Case-insensitive variable maps
//!
//! Variable names compare ASCII-case-insensitively everywhere in the
//! protocol. Both maps preserve insertion order so that wire encoding is
//! deterministic for a given construction sequence.

use std::fmt;

fn names_equal(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Pre-execution variable bindings injected into a script session.
///
/// Keys are unique case-insensitively; inserting an existing name replaces
/// the value and retains the spelling already stored. Names are not
/// validated here; legality filtering happens upstream in the extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableMap {
    entries: Vec<(String, String)>,
}

impl VariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a binding
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| names_equal(k, &name)) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| names_equal(k, name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate bindings in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for VariableMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = VariableMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl fmt::Display for VariableMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, value)?;
            first = false;
        }
        Ok(())
    }
}

/// Values captured for requested output variables after a run.
///
/// One entry per requested name; `None` means the variable was never set
/// during execution. Setting a value for an existing name adopts the latest
/// spelling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutVariableMap {
    entries: Vec<(String, Option<String>)>,
}

impl OutVariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the map with one absent entry per requested name
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut map = OutVariableMap::new();
        for name in names {
            map.set(name, None);
        }
        map
    }

    /// Set (or clear) a captured value; the latest spelling of the name wins
    pub fn set(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(k, _)| names_equal(k, &name)) {
            Some(entry) => *entry = (name, value),
            None => self.entries.push((name, value)),
        }
    }

    /// Look up an entry: `None` if the name was never requested,
    /// `Some(None)` if requested but never set during execution.
    pub fn get(&self, name: &str) -> Option<&Option<String>> {
        self.entries
            .iter()
            .find(|(k, _)| names_equal(k, name))
            .map(|(_, v)| v)
    }

    /// The captured value, flattened: `None` if missing or never set
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.as_deref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}
