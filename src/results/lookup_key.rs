//! Per-lookup-key and per-service resolution outcomes.

use serde::Serialize;

use crate::lookup_key::ServiceName;

use super::Severity;

/// What one service concluded about one lookup key.
///
/// Either an `implementation` was found, or `try_fallback` is set (nothing for
/// this exact key, so the fallback key was tried), or `not_found` is set.
/// A fallback chain that never finds an implementation leaves both
/// `try_fallback` and `not_found` set. `severity`/`message` add detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResult {
    pub service_name: ServiceName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation: Option<String>,
    pub try_fallback: bool,
    /// The key tried next when `try_fallback` is set and one is registered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_lookup_key: Option<String>,
    pub not_found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServiceResult {
    fn empty(service_name: ServiceName) -> Self {
        Self {
            service_name,
            implementation: None,
            try_fallback: false,
            fallback_lookup_key: None,
            not_found: false,
            severity: None,
            message: None,
        }
    }

    pub fn found(service_name: ServiceName, implementation: impl Into<String>) -> Self {
        Self {
            implementation: Some(implementation.into()),
            ..Self::empty(service_name)
        }
    }

    pub fn try_fallback(service_name: ServiceName) -> Self {
        Self {
            try_fallback: true,
            ..Self::empty(service_name)
        }
    }

    pub fn not_found(service_name: ServiceName) -> Self {
        Self {
            not_found: true,
            ..Self::empty(service_name)
        }
    }

    pub fn with_message(mut self, severity: Severity, message: impl Into<String>) -> Self {
        self.severity = Some(severity);
        self.message = Some(message.into());
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.implementation.is_some()
    }
}

/// Everything learned about one canonical lookup key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupKeyResult {
    pub lookup_key: String,
    /// Set once a value host declares this key as its data type, or an
    /// identifier is registered for it.
    pub used_as_data_type: bool,
    pub service_results: Vec<ServiceResult>,
    /// Resolver-level finding, such as "not already known".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LookupKeyResult {
    pub fn new(lookup_key: impl Into<String>) -> Self {
        Self {
            lookup_key: lookup_key.into(),
            used_as_data_type: false,
            service_results: Vec::new(),
            severity: None,
            message: None,
        }
    }

    pub fn service_result(&self, service_name: ServiceName) -> Option<&ServiceResult> {
        self.service_results
            .iter()
            .find(|r| r.service_name == service_name)
    }
}
