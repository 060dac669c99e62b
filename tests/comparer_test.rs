use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use preflight::error::ComparerError;
use preflight::results::ServiceResult;
use preflight::services::memory::{InMemoryComparers, InMemoryConditionFactory, InMemoryFallbacks};
use preflight::services::{AnalysisServices, ComparerService, ComparisonResult, ConditionCategory};
use preflight::{
    AnalysisOptions, AnalysisResults, ConditionConfig, ConfigAnalysis, ServiceName, Severity,
    ValidatorConfig, ValueHostConfig,
};
use serde_json::{json, Value};

fn factory() -> InMemoryConditionFactory {
    InMemoryConditionFactory::new()
        .with("EqualTo", ConditionCategory::Comparison)
        .with("RequireText", ConditionCategory::Require)
}

fn compared_host(name: &str, data_type: &str) -> ValueHostConfig {
    ValueHostConfig::new(name)
        .with("dataType", data_type)
        .with_validator(ValidatorConfig::new(
            ConditionConfig::new("EqualTo").with("valueHostName", name),
        ))
}

fn run(
    services: AnalysisServices,
    options: AnalysisOptions,
    mut configs: Vec<ValueHostConfig>,
) -> AnalysisResults {
    ConfigAnalysis::with_services(services.with_condition_factory(factory()))
        .with_options(options)
        .analyze(&mut configs)
}

fn comparer(results: &AnalysisResults, lookup_key: &str) -> ServiceResult {
    results
        .explorer()
        .service_result(lookup_key, ServiceName::Comparer)
        .cloned()
        .unwrap()
}

#[test]
fn test_registered_comparer_is_found() {
    let comparers = InMemoryComparers::new().with("Number", "NumberComparer");
    let services = AnalysisServices::new().with_comparers(comparers);
    let options = AnalysisOptions::new().with_lookup_key_sample("Number", 5);

    let results = run(services, options, vec![compared_host("Age", "Number")]);

    let result = comparer(&results, "Number");
    assert_eq!(result.implementation.as_deref(), Some("NumberComparer"));
    assert!(!result.not_found);
    assert_eq!(result.severity, None);
}

#[test]
fn test_comparer_for_deepest_fallback() {
    let services = AnalysisServices::new()
        .with_comparers(InMemoryComparers::new().with("Number", "NumberComparer"))
        .with_fallbacks(InMemoryFallbacks::new().with("Money", "Amount").with("Amount", "Number"));
    let options = AnalysisOptions::new().with_lookup_key_sample("Number", 5);

    let results = run(services, options, vec![compared_host("Price", "Money")]);

    let result = comparer(&results, "Money");
    assert_eq!(result.implementation.as_deref(), Some("NumberComparer"));
    assert_eq!(result.fallback_lookup_key.as_deref(), Some("Number"));
}

#[test]
fn test_default_comparer_handles_plain_values() {
    let options = AnalysisOptions::new().with_lookup_key_sample("String", "text");

    let results = run(AnalysisServices::new(), options, vec![compared_host("Name", "String")]);

    let result = comparer(&results, "String");
    assert_eq!(result.implementation.as_deref(), Some("DefaultComparer"));
    assert_eq!(result.severity, Some(Severity::Info));
}

#[test]
fn test_uncomparable_sample_warns() {
    let options =
        AnalysisOptions::new().with_lookup_key_sample("Address", json!({"street": "Main"}));

    let results = run(AnalysisServices::new(), options, vec![compared_host("Home", "Address")]);

    let result = comparer(&results, "Address");
    assert!(result.not_found);
    assert_eq!(result.severity, Some(Severity::Warning));
    assert!(result.message.unwrap().contains("Register a DataTypeComparer"));
}

#[test]
fn test_missing_sample_warns() {
    let results = run(
        AnalysisServices::new(),
        AnalysisOptions::new(),
        vec![compared_host("Age", "Number")],
    );

    let result = comparer(&results, "Number");
    assert!(result.not_found);
    assert_eq!(result.severity, Some(Severity::Warning));
    assert!(result.message.unwrap().contains("lookupKeysSampleValues"));
}

struct BrokenComparers;

impl ComparerService for BrokenComparers {
    fn find(&self, _first: &Value, _second: &Value, _lookup_key: &str) -> Option<String> {
        None
    }

    fn default_compare(
        &self,
        _first: &Value,
        _second: &Value,
    ) -> Result<ComparisonResult, ComparerError> {
        Err(ComparerError::Failed("comparer exploded".into()))
    }
}

#[test]
fn test_failing_default_comparer_is_an_error() {
    let services = AnalysisServices::new().with_comparers(BrokenComparers);
    let options = AnalysisOptions::new().with_lookup_key_sample("Number", 5);

    let results = run(services, options, vec![compared_host("Age", "Number")]);

    let result = comparer(&results, "Number");
    assert!(result.not_found);
    assert_eq!(result.severity, Some(Severity::Error));
    assert!(result.message.unwrap().contains("comparer exploded"));
}

struct CountingComparers {
    calls: Arc<AtomicUsize>,
}

impl ComparerService for CountingComparers {
    fn find(&self, _first: &Value, _second: &Value, lookup_key: &str) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (lookup_key == "Number").then(|| "NumberComparer".to_string())
    }
}

#[test]
fn test_comparer_resolved_once_per_lookup_key() {
    let calls = Arc::new(AtomicUsize::new(0));
    let services = AnalysisServices::new().with_comparers(CountingComparers {
        calls: Arc::clone(&calls),
    });
    let options = AnalysisOptions::new().with_lookup_key_sample("Number", 5);

    let results = run(
        services,
        options,
        vec![
            compared_host("Age", "Number"),
            compared_host("Height", "number"),
            compared_host("Weight", "Number"),
        ],
    );

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let number = results.lookup_key_result("Number").unwrap();
    let comparers = number
        .service_results
        .iter()
        .filter(|r| r.service_name == ServiceName::Comparer)
        .count();
    assert_eq!(comparers, 1);
}

#[test]
fn test_conversion_lookup_key_takes_precedence() {
    let comparers = InMemoryComparers::new().with("Number", "NumberComparer");
    let services = AnalysisServices::new().with_comparers(comparers);
    let options = AnalysisOptions::new().with_lookup_key_sample("Number", 5);
    let host = ValueHostConfig::new("Start")
        .with("dataType", "Date")
        .with_validator(ValidatorConfig::new(
            ConditionConfig::new("EqualTo")
                .with("valueHostName", "Start")
                .with("conversionLookupKey", "Number"),
        ));

    let results = run(services, options, vec![host]);

    assert!(results.explorer().service_result("Date", ServiceName::Comparer).is_none());
    assert_eq!(
        comparer(&results, "Number").implementation.as_deref(),
        Some("NumberComparer")
    );
}

#[test]
fn test_non_comparison_conditions_are_skipped() {
    let host = ValueHostConfig::new("Name")
        .with("dataType", "String")
        .with_validator(ValidatorConfig::new(
            ConditionConfig::new("RequireText").with("valueHostName", "Name"),
        ));

    let results = run(AnalysisServices::new(), AnalysisOptions::new(), vec![host]);

    assert!(results.explorer().service_result("String", ServiceName::Comparer).is_none());
}
