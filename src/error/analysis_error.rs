//! Errors raised while wiring or running an analysis.

use crate::lookup_key::ServiceName;

/// Failures that escape a single analysis step.
///
/// Only [`AnalysisError::MissingLookupKeyAnalyzer`] can be produced by the
/// results helper itself. The node analyzers catch every variant at the
/// property-analyzer boundary and turn it into an error finding, so a whole
/// analysis never aborts because of one.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// A lookup key was registered against a service that has no
    /// `LookupKeyAnalyzer`. This is a host-application setup defect.
    #[error("no lookup key analyzer is registered for the {0} service")]
    MissingLookupKeyAnalyzer(ServiceName),

    /// The node analyzers were used before being attached to the analysis args.
    #[error("config analyzers were not attached to the analysis args")]
    AnalyzersNotWired,

    /// A lookup key fallback chain revisits a key.
    #[error("lookup key fallback cycle: {}", .0.join(" -> "))]
    FallbackCycle(Vec<String>),

    /// A property analyzer reported a failure of its own.
    #[error("{analyzer} failed: {message}")]
    PropertyAnalyzer { analyzer: String, message: String },
}

/// Registration errors for the lookup key analyzer registry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("a lookup key analyzer for the {0} service is already registered")]
    DuplicateService(ServiceName),
}

/// A collaborator service could not fulfil a request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error("condition type '{0}' is not registered")]
    UnknownConditionType(String),

    #[error("conditionType is missing")]
    MissingConditionType,

    #[error("{0}")]
    Other(String),
}

/// Failures from a comparer asked to compare two sample values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComparerError {
    /// The comparer does not handle this kind of value. Treated as "no comparer".
    #[error("unsupported value type: {0}")]
    UnsupportedValueType(String),

    /// Any other failure. Reported as an error finding.
    #[error("{0}")]
    Failed(String),
}
