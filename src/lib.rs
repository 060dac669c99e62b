//! # Preflight
//!
//! Static analysis for declarative form-validation configuration.
//!
//! ## Overview
//!
//! A configuration is a tree of value hosts, their validators, and the
//! conditions those validators evaluate. Much of it refers to pluggable
//! services through *lookup keys*: a value host's `dataType`, a condition's
//! `conversionLookupKey`, a `{Value:Currency}` token in an error message.
//! Preflight walks the tree without running any validation, canonicalizes
//! every lookup key, checks whether each service it selects can actually be
//! found with the current registrations, and reports everything it learns
//! as severity-levelled findings.
//!
//! Like a validator that accumulates every error instead of stopping at the
//! first, one call always produces a complete report: a broken node yields a
//! node-level finding and its siblings are still analyzed.
//!
//! ## Core Types
//!
//! - [`ValueHostConfig`], [`ValidatorConfig`], [`ConditionConfig`]: the configuration tree
//! - [`AnalysisServices`]: the collaborator services the analysis consults
//! - [`ConfigAnalysis`]: entry point that runs an analysis
//! - [`AnalysisResults`]: lookup key results plus one result per visited node
//! - [`ResultsExplorer`]: queries over the results
//!
//! ## Example
//!
//! ```rust
//! use preflight::services::memory::InMemoryConditionFactory;
//! use preflight::services::{AnalysisServices, ConditionCategory};
//! use preflight::{ConditionConfig, ConfigAnalysis, ValidatorConfig, ValueHostConfig};
//!
//! let services = AnalysisServices::new().with_condition_factory(
//!     InMemoryConditionFactory::new().with("RequireText", ConditionCategory::Require),
//! );
//!
//! let mut configs = vec![ValueHostConfig::new("Email")
//!     .with("dataType", "String")
//!     .with_validator(ValidatorConfig::new(
//!         ConditionConfig::new("RequireText").with("valueHostName", "Emial"),
//!     ))];
//!
//! let results = ConfigAnalysis::with_services(services).analyze(&mut configs);
//! assert!(results.explorer().has_errors());
//! ```

pub mod analysis;
pub mod analyzers;
pub mod args;
pub mod config;
pub mod error;
pub mod helper;
pub mod lookup_key;
pub mod lookup_keys;
pub mod path;
pub mod registry;
pub mod results;
pub mod sample_values;
pub mod services;

pub use analysis::ConfigAnalysis;
pub use args::{AnalysisArgs, AnalysisOptions};
pub use config::{
    load_value_host_configs, ConditionConfig, ConfigObject, ValidatorConfig, ValueHostConfig,
};
pub use error::{AnalysisError, ConfigError, ConfigErrors, RegistryError};
pub use helper::AnalysisResultsHelper;
pub use lookup_key::{LookupKey, ServiceName};
pub use path::{ConfigPath, PathSegment};
pub use registry::LookupKeyAnalyzerRegistry;
pub use results::{AnalysisResults, ResultFilter, ResultsExplorer, Severity};
pub use services::AnalysisServices;

/// Result of loading a configuration document.
pub type LoadResult<T> = stillwater::Validation<T, ConfigErrors>;
