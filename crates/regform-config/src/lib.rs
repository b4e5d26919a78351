//! Deployment configuration for the registration-form engine.
//!
//! A hosting page narrows what a deployment actually offers by handing
//! the engine allow-lists of academic levels, faculties, programs, or
//! locations. This crate parses that object tolerantly (pages send both
//! `["P1"]` and `[{"code": "P1"}]` shapes) and exposes the lists to the
//! cascade filter. Configuration is passed explicitly into the engine at
//! construction time; there is no process-wide config singleton.

mod config;
mod error;

pub use config::{CodeList, DeploymentConfig};
pub use error::{ConfigError, Result};
