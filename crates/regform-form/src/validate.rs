//! Required-field validation over the store.

use regform_engine::FieldStateStore;

use crate::schema::FormSchema;

/// One failed check, mirrored into the field's `validation_error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

/// Check every required, visible field for a non-blank value.
///
/// Invisible fields never participate: a level the cascade hid (or
/// auto-resolved) cannot block submission. Errors are written through
/// the store so rendering adapters pick them up on the same channel as
/// any other state change.
pub fn validate_required(schema: &FormSchema, store: &FieldStateStore) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for decl in schema.fields() {
        if !decl.is_required() {
            continue;
        }
        let state = store.get(decl.name());
        if !state.visible {
            store.set_validation_error(decl.name(), None);
            continue;
        }
        if state.value.trim().is_empty() {
            let message = "This field is required".to_string();
            store.set_validation_error(decl.name(), Some(message.clone()));
            issues.push(ValidationIssue {
                field: decl.name().to_string(),
                message,
            });
        } else {
            store.set_validation_error(decl.name(), None);
        }
    }
    issues
}
