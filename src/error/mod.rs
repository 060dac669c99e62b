//! Error types.
//!
//! Two tiers are kept apart. [`AnalysisError`] and friends are Rust errors:
//! wiring defects in the host application or failures of a collaborator.
//! Data-quality findings about the configuration are never errors; they are
//! recorded as severity-levelled entries in the results tree.
//! [`ConfigError`] covers documents too malformed to load.

mod analysis_error;
mod config_error;

pub use analysis_error::{AnalysisError, ComparerError, RegistryError, ServiceError};
pub use config_error::{ConfigError, ConfigErrors};
