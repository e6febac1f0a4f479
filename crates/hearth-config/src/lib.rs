//! Configuration models and loading for Hearth.
//!
//! This crate owns the config schema, environment-variable overrides, and
//! startup validation used by the CLI binary.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Configuration schema models.
pub use model::*;
