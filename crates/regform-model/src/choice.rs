//! Selectable options within one hierarchy level.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One selectable option offered by a form field.
///
/// `value` is the stable code used for lookups, cascade decisions, and
/// submission payloads; it must be unique within a field's option set.
/// `label` is display text only and is never used as a lookup key.
///
/// Upstream reference feeds spell the two fields either `value`/`label`
/// or `Codigo`/`Nombre`; both spellings deserialize into the same type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Stable option code.
    #[serde(alias = "Codigo", alias = "code")]
    pub value: String,
    /// Display text. Falls back to the code when the feed omits it.
    #[serde(alias = "Nombre", alias = "name", default)]
    pub label: String,
    /// Feed-specific extras (phone prefixes, period dates, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Choice {
    /// Create a choice with an explicit label.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Create a choice whose label is its code.
    pub fn from_code(value: impl Into<String>) -> Self {
        let value = value.into();
        let label = value.clone();
        Self {
            value,
            label,
            metadata: BTreeMap::new(),
        }
    }

    /// Parse a choice from one JSON entry of an option list.
    ///
    /// Accepts bare strings (`"P1"`) and objects in either field
    /// spelling. Entries without a usable code yield `None` and are
    /// skipped by the dataset helpers.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(code) if !code.is_empty() => {
                Some(Self::from_code(code.clone()))
            }
            serde_json::Value::Object(_) => {
                let mut choice: Self = serde_json::from_value(value.clone()).ok()?;
                if choice.value.is_empty() {
                    return None;
                }
                if choice.label.is_empty() {
                    choice.label = choice.value.clone();
                }
                Some(choice)
            }
            _ => None,
        }
    }
}
