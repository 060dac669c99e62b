//! The shared mediator used by every analyzer during one call.
//!
//! [`AnalysisResultsHelper`] owns the [`AnalysisArgs`] and is the only writer
//! of `lookup_key_results`. It canonicalizes lookup keys, memoizes one
//! [`ServiceResult`] per (key, service) pair, walks fallback chains, and
//! offers the property-level checks in [`localization`], [`tokens`] and
//! [`assertions`].

pub mod assertions;
pub mod localization;
pub mod tokens;

use std::collections::HashMap;

use tracing::debug;

use crate::args::AnalysisArgs;
use crate::config::ValueHostConfig;
use crate::error::AnalysisError;
use crate::lookup_key::{eq_ignore_case, fold_case, LookupKey, ServiceName};
use crate::results::{AnalysisResults, LookupKeyResult, PropertyResult, ServiceResult, Severity};
use crate::services::AnalysisServices;

/// Which source recognized a lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKeySource {
    /// One of the reserved [`LookupKey`] spellings.
    BuiltIn,
    /// Registered with the fallback service.
    Fallback,
    /// Named by a registered identifier.
    Identifier,
    Unknown,
}

/// Outcome of canonicalizing a raw lookup key.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLookupKey {
    pub lookup_key: String,
    pub source: LookupKeySource,
    pub severity: Option<Severity>,
    pub message: Option<String>,
}

/// What [`AnalysisResultsHelper::register_service_lookup_key`] produced.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupKeyRegistration {
    /// The canonical key of the `LookupKeyResult`.
    pub lookup_key: String,
    /// The memoized result for the requested service, if one was requested.
    pub service_result: Option<ServiceResult>,
}

/// How [`AnalysisResultsHelper::check_lookup_key_property`] reports on one
/// property.
#[derive(Debug, Clone, Copy)]
pub struct LookupKeyCheck<'a> {
    property_name: &'a str,
    service: Option<ServiceName>,
    class_name: Option<&'a str>,
    service_property_name: Option<&'a str>,
}

impl<'a> LookupKeyCheck<'a> {
    /// A bare data type check with no service behind it.
    pub fn data_type(property_name: &'a str) -> Self {
        Self {
            property_name,
            service: None,
            class_name: None,
            service_property_name: None,
        }
    }

    pub fn service(property_name: &'a str, service: ServiceName) -> Self {
        Self {
            service: Some(service),
            ..Self::data_type(property_name)
        }
    }

    /// Class named in "register a ..." guidance. Defaults to the service's
    /// implementation class.
    pub fn with_class_name(mut self, class_name: &'a str) -> Self {
        self.class_name = Some(class_name);
        self
    }

    /// Property that service findings are reported against.
    pub fn with_service_property_name(mut self, property_name: &'a str) -> Self {
        self.service_property_name = Some(property_name);
        self
    }
}

pub struct AnalysisResultsHelper {
    args: AnalysisArgs,
    /// Lower-cased canonical key to position in `lookup_key_results`.
    lookup_key_index: HashMap<String, usize>,
}

impl AnalysisResultsHelper {
    pub fn new(args: AnalysisArgs) -> Self {
        let lookup_key_index = args
            .results()
            .lookup_key_results
            .iter()
            .enumerate()
            .map(|(index, result)| (fold_case(&result.lookup_key), index))
            .collect();
        Self {
            args,
            lookup_key_index,
        }
    }

    pub fn args(&self) -> &AnalysisArgs {
        &self.args
    }

    pub fn args_mut(&mut self) -> &mut AnalysisArgs {
        &mut self.args
    }

    pub fn services(&self) -> &AnalysisServices {
        self.args.services()
    }

    pub fn results(&self) -> &AnalysisResults {
        self.args.results()
    }

    pub fn into_results(self) -> AnalysisResults {
        self.args.into_results()
    }

    /// Maps a raw lookup key to its canonical spelling.
    ///
    /// Sources are tried in order: the built-in keys (ignoring case), the
    /// fallback service (exact after trimming), the identifier service. An
    /// unrecognized key is kept as typed, trimmed, with a warning.
    pub fn check_for_real_lookup_key_name(&self, raw_key: &str) -> ResolvedLookupKey {
        let trimmed = raw_key.trim();
        if let Some(key) = LookupKey::parse_ignore_case(trimmed) {
            return ResolvedLookupKey {
                lookup_key: key.as_str().to_string(),
                source: LookupKeySource::BuiltIn,
                severity: None,
                message: None,
            };
        }
        if self.services().fallbacks().contains(trimmed) {
            return ResolvedLookupKey {
                lookup_key: trimmed.to_string(),
                source: LookupKeySource::Fallback,
                severity: None,
                message: None,
            };
        }
        if let Some(info) = self.services().identifiers().find_by_lookup_key(trimmed) {
            return ResolvedLookupKey {
                lookup_key: info.lookup_key,
                source: LookupKeySource::Identifier,
                severity: None,
                message: None,
            };
        }
        ResolvedLookupKey {
            lookup_key: trimmed.to_string(),
            source: LookupKeySource::Unknown,
            severity: Some(Severity::Warning),
            message: Some(format!(
                "Lookup key \"{trimmed}\" is not already known. It may be a typo. If it is \
                 valid, register it with the lookup key fallback service or a {}.",
                ServiceName::Identifier.implementation_class()
            )),
        }
    }

    /// Finds or creates the `LookupKeyResult` for `raw_key` and, when
    /// `service` is given, the memoized `ServiceResult` for that service.
    ///
    /// Returns `Ok(None)` when there is no key to check.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MissingLookupKeyAnalyzer`] when no analyzer is
    /// registered for `service`.
    pub fn register_service_lookup_key(
        &mut self,
        raw_key: Option<&str>,
        service: Option<ServiceName>,
        value_host: Option<&ValueHostConfig>,
    ) -> Result<Option<LookupKeyRegistration>, AnalysisError> {
        let Some(index) = raw_key.and_then(|raw| self.find_or_create(raw)) else {
            return Ok(None);
        };
        let lookup_key = self.args.results().lookup_key_results[index]
            .lookup_key
            .clone();
        let service_result = match service {
            Some(service) => {
                Some(self.resolve_service(index, service, value_host, &mut Vec::new())?)
            }
            None => None,
        };
        Ok(Some(LookupKeyRegistration {
            lookup_key,
            service_result,
        }))
    }

    /// The property-level lookup key gate.
    ///
    /// Blank keys are ignored. A key that is not spelled exactly like its
    /// canonical form gets an error and nothing else. Otherwise the service
    /// result (or, for a bare data type, whether the key is known at all)
    /// decides what is reported.
    pub fn check_lookup_key_property(
        &mut self,
        check: &LookupKeyCheck<'_>,
        raw_key: Option<&str>,
        value_host: Option<&ValueHostConfig>,
        properties: &mut Vec<PropertyResult>,
    ) -> Result<(), AnalysisError> {
        let Some(raw_key) = raw_key.filter(|key| !key.trim().is_empty()) else {
            return Ok(());
        };
        let Some(registration) =
            self.register_service_lookup_key(Some(raw_key), check.service, value_host)?
        else {
            return Ok(());
        };
        let canonical = registration.lookup_key.as_str();

        if canonical != raw_key {
            properties.push(PropertyResult::issue(
                check.property_name,
                Severity::Error,
                format!(
                    "Lookup key \"{raw_key}\" is not an exact match to \"{canonical}\". \
                     Change it to \"{canonical}\"."
                ),
            ));
            return Ok(());
        }

        match (check.service, registration.service_result) {
            (Some(service), Some(service_result)) => {
                let property_name = check.service_property_name.unwrap_or(check.property_name);
                let class_name = check
                    .class_name
                    .unwrap_or_else(|| service.implementation_class());
                let unresolved_fallback =
                    service_result.try_fallback && service_result.fallback_lookup_key.is_none();
                if service_result.not_found || unresolved_fallback {
                    let mut message = format!(
                        "Lookup key \"{canonical}\" not found for the {service} service. \
                         Register a {class_name} that supports it."
                    );
                    if let Some(detail) = &service_result.message {
                        message.push(' ');
                        message.push_str(detail);
                    }
                    properties.push(PropertyResult::issue(property_name, Severity::Error, message));
                } else if let (true, Some(fallback)) =
                    (service_result.try_fallback, &service_result.fallback_lookup_key)
                {
                    properties.push(PropertyResult::issue(
                        property_name,
                        Severity::Warning,
                        format!(
                            "No {class_name} supports lookup key \"{canonical}\". The one for \
                             fallback lookup key \"{fallback}\" will be used."
                        ),
                    ));
                } else if let (Some(severity), Some(message)) =
                    (service_result.severity, service_result.message)
                {
                    properties.push(PropertyResult::issue(property_name, severity, message));
                }
            }
            (None, _) => {
                let known = LookupKey::parse_ignore_case(canonical).is_some()
                    || self
                        .services()
                        .identifiers()
                        .find_by_lookup_key(canonical)
                        .is_some();
                if !known {
                    properties.push(PropertyResult::issue(
                        check.property_name,
                        Severity::Info,
                        format!(
                            "Lookup key \"{canonical}\" is unknown. This may be fine when \
                             services are registered for it under that name."
                        ),
                    ));
                }
            }
            (Some(_), None) => {}
        }
        Ok(())
    }

    /// Case-insensitive lookup of an existing `LookupKeyResult`.
    pub fn lookup_key_result(&self, lookup_key: &str) -> Option<&LookupKeyResult> {
        let index = *self.lookup_key_index.get(&fold_case(lookup_key))?;
        self.args.results().lookup_key_results.get(index)
    }

    pub fn service_result(&self, lookup_key: &str, service: ServiceName) -> Option<&ServiceResult> {
        self.lookup_key_result(lookup_key)?.service_result(service)
    }

    /// Stores a `ServiceResult` computed outside the lookup key analyzer
    /// registry. Returns `false`, leaving the memo untouched, when the key is
    /// unknown or already has a result for that service.
    pub fn seed_service_result(&mut self, lookup_key: &str, result: ServiceResult) -> bool {
        let Some(&index) = self.lookup_key_index.get(&fold_case(lookup_key)) else {
            return false;
        };
        let entry = &mut self.args.results_mut().lookup_key_results[index];
        if entry.service_result(result.service_name).is_some() {
            return false;
        }
        entry.service_results.push(result);
        true
    }

    /// Flags the key as a declared data type, creating its result if needed.
    pub fn mark_used_as_data_type(&mut self, raw_key: &str) {
        if let Some(index) = self.find_or_create(raw_key) {
            self.args.results_mut().lookup_key_results[index].used_as_data_type = true;
        }
    }

    /// Whether a value host with this name was configured, ignoring case.
    pub fn value_host_name_exists(&self, name: &str) -> bool {
        let name = name.trim();
        self.args
            .results()
            .value_host_names
            .iter()
            .any(|known| eq_ignore_case(known.trim(), name))
    }

    fn find_or_create(&mut self, raw_key: &str) -> Option<usize> {
        if raw_key.trim().is_empty() {
            return None;
        }
        let resolved = self.check_for_real_lookup_key_name(raw_key);
        let index_key = fold_case(&resolved.lookup_key);
        if let Some(&index) = self.lookup_key_index.get(&index_key) {
            return Some(index);
        }

        debug!(
            raw_key,
            lookup_key = %resolved.lookup_key,
            source = ?resolved.source,
            "registering lookup key"
        );
        let mut result = LookupKeyResult::new(resolved.lookup_key);
        result.severity = resolved.severity;
        result.message = resolved.message;
        let results = &mut self.args.results_mut().lookup_key_results;
        results.push(result);
        let index = results.len() - 1;
        self.lookup_key_index.insert(index_key, index);
        Some(index)
    }

    /// Memoized service analysis with a guarded walk down the fallback chain.
    ///
    /// `chain` holds the canonical keys already visited for this request.
    fn resolve_service(
        &mut self,
        index: usize,
        service: ServiceName,
        value_host: Option<&ValueHostConfig>,
        chain: &mut Vec<String>,
    ) -> Result<ServiceResult, AnalysisError> {
        let entry = &self.args.results().lookup_key_results[index];
        if let Some(existing) = entry.service_result(service) {
            return Ok(existing.clone());
        }
        let analyzer = self
            .args
            .lookup_key_analyzers()
            .get(service)
            .ok_or(AnalysisError::MissingLookupKeyAnalyzer(service))?;
        let lookup_key = self.args.results().lookup_key_results[index]
            .lookup_key
            .clone();
        chain.push(lookup_key.clone());

        debug!(%lookup_key, %service, "analyzing service for lookup key");
        let mut result = analyzer.analyze(&lookup_key, value_host, &mut self.args);
        result.service_name = service;

        if result.try_fallback && !result.is_resolved() {
            let fallback = self.services().fallbacks().find(&lookup_key);
            let fallback_index = fallback.and_then(|fallback| self.find_or_create(&fallback));
            match fallback_index {
                None => result.not_found = true,
                Some(fallback_index) => {
                    let fallback = self.args.results().lookup_key_results[fallback_index]
                        .lookup_key
                        .clone();
                    result.fallback_lookup_key = Some(fallback.clone());
                    if chain.iter().any(|seen| eq_ignore_case(seen, &fallback)) {
                        let mut cycle = chain.clone();
                        cycle.push(fallback);
                        result.not_found = true;
                        let message = AnalysisError::FallbackCycle(cycle).to_string();
                        result = result.with_message(Severity::Error, message);
                    } else {
                        debug!(%lookup_key, %fallback, %service, "following lookup key fallback");
                        let fallback_result =
                            self.resolve_service(fallback_index, service, value_host, chain)?;
                        if fallback_result.not_found {
                            result.not_found = true;
                        }
                    }
                }
            }
        }

        self.args.results_mut().lookup_key_results[index]
            .service_results
            .push(result.clone());
        Ok(result)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::args::AnalysisOptions;
    use crate::registry::LookupKeyAnalyzerRegistry;
    use crate::services::memory::{InMemoryFallbacks, InMemoryFormatters, InMemoryIdentifiers};
    use std::sync::Arc;

    pub(crate) fn helper_with(services: AnalysisServices) -> AnalysisResultsHelper {
        AnalysisResultsHelper::new(AnalysisArgs::new(
            Arc::new(services),
            Arc::new(LookupKeyAnalyzerRegistry::standard()),
            AnalysisOptions::new(),
        ))
    }

    #[test]
    fn test_builtin_key_ignores_case() {
        let helper = helper_with(AnalysisServices::new());
        let resolved = helper.check_for_real_lookup_key_name("number");
        assert_eq!(resolved.lookup_key, "Number");
        assert_eq!(resolved.source, LookupKeySource::BuiltIn);
        assert_eq!(resolved.message, None);
    }

    #[test]
    fn test_fallback_registered_key_is_case_sensitive() {
        let fallbacks = InMemoryFallbacks::new().with("Money", "Number");
        let helper = helper_with(AnalysisServices::new().with_fallbacks(fallbacks));
        assert_eq!(
            helper.check_for_real_lookup_key_name(" Money ").source,
            LookupKeySource::Fallback
        );
        assert_eq!(
            helper.check_for_real_lookup_key_name("money").source,
            LookupKeySource::Unknown
        );
    }

    #[test]
    fn test_identifier_supplies_canonical_spelling() {
        let identifiers = InMemoryIdentifiers::new().with(
            "PhoneNumber",
            "PhoneIdentifier",
            None,
            serde_json::Value::is_string,
        );
        let helper = helper_with(AnalysisServices::new().with_identifiers(identifiers));
        let resolved = helper.check_for_real_lookup_key_name("phonenumber");
        assert_eq!(resolved.lookup_key, "PhoneNumber");
        assert_eq!(resolved.source, LookupKeySource::Identifier);
    }

    #[test]
    fn test_unknown_key_warns() {
        let helper = helper_with(AnalysisServices::new());
        let resolved = helper.check_for_real_lookup_key_name(" Nubmer ");
        assert_eq!(resolved.lookup_key, "Nubmer");
        assert_eq!(resolved.severity, Some(Severity::Warning));
        assert!(resolved.message.unwrap().contains("not already known"));
    }

    #[test]
    fn test_blank_key_is_not_registered() {
        let mut helper = helper_with(AnalysisServices::new());
        assert_eq!(helper.register_service_lookup_key(Some("   "), None, None).unwrap(), None);
        assert_eq!(helper.register_service_lookup_key(None, None, None).unwrap(), None);
        assert!(helper.results().lookup_key_results.is_empty());
    }

    #[test]
    fn test_missing_analyzer_is_an_error() {
        let mut helper = helper_with(AnalysisServices::new());
        let err = helper
            .register_service_lookup_key(Some("Number"), Some(ServiceName::Comparer), None)
            .unwrap_err();
        assert_eq!(err, AnalysisError::MissingLookupKeyAnalyzer(ServiceName::Comparer));
    }

    #[test]
    fn test_fallback_warning_names_fallback() {
        let services = AnalysisServices::new()
            .with_formatters(InMemoryFormatters::new().with("Number", "NumberFormatter"))
            .with_fallbacks(InMemoryFallbacks::new().with("Money", "Number"));
        let mut helper = helper_with(services);
        let mut properties = Vec::new();
        helper
            .check_lookup_key_property(
                &LookupKeyCheck::service("errorMessage", ServiceName::Formatter),
                Some("Money"),
                None,
                &mut properties,
            )
            .unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].severity(), Some(Severity::Warning));
        assert!(properties[0].message().unwrap().contains("\"Number\""));
    }

    #[test]
    fn test_seed_service_result_only_once() {
        let mut helper = helper_with(AnalysisServices::new());
        let missing = ServiceResult::not_found(ServiceName::Comparer);
        assert!(!helper.seed_service_result("Number", missing.clone()));
        helper.mark_used_as_data_type("Number");
        assert!(helper.seed_service_result("number", missing));
        let found = ServiceResult::found(ServiceName::Comparer, "X");
        assert!(!helper.seed_service_result("Number", found));
        assert!(helper.service_result("Number", ServiceName::Comparer).unwrap().not_found);
        assert!(helper.lookup_key_result("NUMBER").unwrap().used_as_data_type);
    }
}
