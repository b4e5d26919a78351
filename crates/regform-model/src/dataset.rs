//! Loaded reference-data trees and navigation helpers.

use serde_json::Value;

use crate::choice::Choice;

/// A named reference dataset, immutable once loaded.
///
/// Datasets are deployment-specific JSON trees keyed by hierarchy-node
/// values (for example `programs[level][faculty]` holding a program
/// list). The wrapper only navigates; it never mutates, so lookups are
/// synchronous and side-effect-free for the whole session.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceDataset {
    root: Value,
}

impl ReferenceDataset {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// An empty dataset, used when every source for a resource failed
    /// and the dependent form section degrades to "unavailable".
    pub fn empty() -> Self {
        Self {
            root: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Walk object keys from the root; `None` as soon as a step is missing.
    pub fn at(&self, path: &[&str]) -> Option<&Value> {
        let mut current = &self.root;
        for step in path {
            current = current.get(step)?;
        }
        Some(current)
    }

    /// Object keys at `path`, in the order the parsed document yields them.
    pub fn keys_at(&self, path: &[&str]) -> Vec<String> {
        match self.at(path) {
            Some(Value::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Parse the array at `path` into choices, skipping malformed entries.
    pub fn choices_at(&self, path: &[&str]) -> Vec<Choice> {
        self.at(path).map(array_choices).unwrap_or_default()
    }
}

/// Parse a JSON array into choices, preserving array order.
pub fn array_choices(value: &Value) -> Vec<Choice> {
    match value {
        Value::Array(entries) => entries.iter().filter_map(Choice::from_json).collect(),
        _ => Vec::new(),
    }
}

/// Build one choice per key of a JSON object.
///
/// When the keyed entry is itself an object carrying a display name
/// (`Nombre`/`name`/`label`), that name becomes the label; otherwise the
/// key doubles as the label. Key order follows the parsed document.
pub fn keyed_choices(value: &Value) -> Vec<Choice> {
    let Value::Object(map) = value else {
        return Vec::new();
    };
    map.iter()
        .map(|(key, entry)| {
            let label = ["Nombre", "name", "label"]
                .iter()
                .find_map(|field| entry.get(field).and_then(Value::as_str))
                .unwrap_or(key);
            Choice::new(key.clone(), label)
        })
        .collect()
}

/// Resolve the first present sub-object among `names`, falling back to
/// `value` itself when none is present.
///
/// Feeds disagree on whether children live under a wrapper key
/// (`{"Departamentos": {...}}`) or directly on the node; accessors use
/// this to accept both shapes.
pub fn section<'a>(value: &'a Value, names: &[&str]) -> &'a Value {
    names
        .iter()
        .find_map(|name| value.get(name))
        .unwrap_or(value)
}
