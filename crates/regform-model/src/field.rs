//! Per-field reactive state.

use serde::{Deserialize, Serialize};

use crate::choice::Choice;

/// The full state of one form field, keyed by field name in the store.
///
/// Invariant: `visible == false` implies the value was set by
/// auto-resolution or is empty. A hidden field is never left holding an
/// ambiguous multi-candidate selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldState {
    /// Current selection; `""` means unset.
    pub value: String,
    /// Whether the field should render to the user.
    pub visible: bool,
    /// Whether the field accepts input. Cascaded fields stay disabled
    /// until their hierarchy node has resolved.
    pub enabled: bool,
    /// Current candidate set; empty for non-select fields.
    pub options: Vec<Choice>,
    /// The user has interacted with this field.
    pub touched: bool,
    /// Current validation message, if any.
    pub validation_error: Option<String>,
}

impl FieldState {
    /// Initial state for a plain input field: visible, enabled, unset.
    pub fn input() -> Self {
        Self {
            value: String::new(),
            visible: true,
            enabled: true,
            options: Vec::new(),
            touched: false,
            validation_error: None,
        }
    }

    /// Initial state for a cascaded select: hidden and disabled until
    /// its hierarchy node resolves.
    pub fn cascaded() -> Self {
        Self {
            visible: false,
            enabled: false,
            ..Self::input()
        }
    }

    /// Whether `value` is one of the current options.
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|choice| choice.value == value)
    }

    /// Whether this field should contribute to a submission payload:
    /// it is visible, or it was auto-resolved while hidden.
    pub fn contributes_to_submission(&self) -> bool {
        self.visible || !self.value.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_states() {
        let input = FieldState::input();
        assert!(input.visible && input.enabled);
        assert!(input.value.is_empty() && !input.touched);

        let cascaded = FieldState::cascaded();
        assert!(!cascaded.visible && !cascaded.enabled);
    }

    #[test]
    fn option_membership_uses_codes_not_labels() {
        let mut state = FieldState::input();
        state.options = vec![Choice::new("P1", "CS")];
        assert!(state.has_option("P1"));
        assert!(!state.has_option("CS"));
    }

    #[test]
    fn hidden_resolved_fields_contribute_to_submission() {
        let mut state = FieldState::cascaded();
        assert!(!state.contributes_to_submission());
        state.value = "PREG".to_string();
        assert!(state.contributes_to_submission());
    }
}
