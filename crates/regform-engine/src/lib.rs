//! The cascading selection engine.
//!
//! Three pieces cooperate here, all driven through one reactive store:
//!
//! - [`FieldStateStore`] holds `{value, visibility, enabled, options,
//!   touched, validation error}` per field and notifies subscribers
//!   synchronously after every effective write. It is the single source
//!   of truth the rendering and validation layers read from.
//! - [`ConfigFilter`] narrows a level's raw candidates to what the
//!   deployment actually offers, either directly or by back-projecting
//!   an allow-list declared on a deeper level.
//! - [`CascadeResolver`] walks a [`ChainSpec`] node by node: it shows a
//!   level when several candidates remain, auto-selects and hides it
//!   when exactly one remains, and collapses it (with all descendants)
//!   when none remain or its ancestor is unset.
//!
//! A store is per-form-instance; the reference-data store the resolver
//! reads through is shared process-wide.

mod chain;
mod filter;
mod resolver;
mod store;

pub use chain::{ChainSpec, DatasetView, NodeSpec};
pub use filter::ConfigFilter;
pub use resolver::CascadeResolver;
pub use store::{FieldEvent, FieldPatch, FieldStateStore, SubscriptionId};
