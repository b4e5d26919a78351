//! Shared data model for the cascading registration-form engine.
//!
//! This crate defines the types every other layer agrees on: selectable
//! [`Choice`]s, per-field [`FieldState`], and the [`ReferenceDataset`]
//! wrapper around loaded reference-data trees. It carries no I/O and no
//! engine logic.

pub mod choice;
pub mod dataset;
pub mod field;

pub use choice::Choice;
pub use dataset::{ReferenceDataset, array_choices, keyed_choices, section};
pub use field::FieldState;
