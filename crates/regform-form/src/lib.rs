//! Form-level facade over the cascading selection engine.
//!
//! A [`FormInstance`] owns one field-state store, declares every field
//! of the registration form up front, and wires a cascade resolver for
//! each built-in dependency chain the schema covers (academic level →
//! faculty → program → admission period, and country → department →
//! city). Rendering and submission layers talk to the instance only:
//! they subscribe to the store, push genuine user input through
//! [`FormInstance::set_field_value`], and read the submission snapshot
//! when the user completes the form.

pub mod chains;
mod form;
pub mod logging;
mod schema;
pub mod sources;
mod validate;

pub use form::FormInstance;
pub use schema::{FieldDecl, FormSchema};
pub use validate::{ValidationIssue, validate_required};
