//! Property analyzers: built-in rules and host-supplied ones.

use preflight::analyzers::{ConfigPropertyAnalyzer, NodeScope};
use preflight::results::{ConfigResult, PropertyResult, ValueHostConfigResult};
use preflight::services::memory::{
    InMemoryConditionFactory, InMemoryConverters, InMemoryCultures, InMemoryParsers,
};
use preflight::services::{AnalysisServices, ConditionCategory};
use preflight::{
    AnalysisError, AnalysisResultsHelper, ConditionConfig, ConfigAnalysis, ServiceName, Severity,
    ValidatorConfig, ValueHostConfig,
};
use serde_json::json;
use test_case::test_case;

struct Note(&'static str);

impl ConfigPropertyAnalyzer<ValueHostConfig, ValueHostConfigResult> for Note {
    fn name(&self) -> &str {
        self.0
    }

    fn analyze(
        &self,
        _config: &ValueHostConfig,
        result: &mut ValueHostConfigResult,
        _scope: &NodeScope<'_>,
        _helper: &mut AnalysisResultsHelper,
    ) -> Result<(), AnalysisError> {
        result
            .properties_mut()
            .push(PropertyResult::issue("custom", Severity::Info, format!("{} ran", self.0)));
        Ok(())
    }
}

struct Broken;

impl ConfigPropertyAnalyzer<ValueHostConfig, ValueHostConfigResult> for Broken {
    fn name(&self) -> &str {
        "Broken"
    }

    fn analyze(
        &self,
        _config: &ValueHostConfig,
        _result: &mut ValueHostConfigResult,
        _scope: &NodeScope<'_>,
        _helper: &mut AnalysisResultsHelper,
    ) -> Result<(), AnalysisError> {
        Err(AnalysisError::PropertyAnalyzer {
            analyzer: "Broken".into(),
            message: "cannot read the config".into(),
        })
    }
}

struct Panicking;

impl ConfigPropertyAnalyzer<ValueHostConfig, ValueHostConfigResult> for Panicking {
    fn name(&self) -> &str {
        "Panicking"
    }

    fn analyze(
        &self,
        _config: &ValueHostConfig,
        _result: &mut ValueHostConfigResult,
        _scope: &NodeScope<'_>,
        _helper: &mut AnalysisResultsHelper,
    ) -> Result<(), AnalysisError> {
        panic!("index out of range");
    }
}

fn factory() -> InMemoryConditionFactory {
    InMemoryConditionFactory::new()
        .with("RequireText", ConditionCategory::Require)
        .with("EqualTo", ConditionCategory::Comparison)
}

#[test]
fn test_failing_property_analyzer_is_isolated() {
    let mut configs = vec![ValueHostConfig::new("Age"), ValueHostConfig::new("Name")];

    let results = ConfigAnalysis::new()
        .with_value_host_analyzer(Note("First"))
        .with_value_host_analyzer(Broken)
        .with_value_host_analyzer(Note("Third"))
        .analyze(&mut configs);

    for value_host in &results.value_host_results {
        let findings: Vec<_> = value_host
            .node
            .properties
            .iter()
            .map(|p| (p.property_name(), p.severity(), p.message().unwrap()))
            .collect();
        assert_eq!(
            findings,
            vec![
                ("custom", Some(Severity::Info), "First ran"),
                ("Broken", Some(Severity::Error), "Broken failed: cannot read the config"),
                ("custom", Some(Severity::Info), "Third ran"),
            ]
        );
    }
}

#[test]
fn test_panicking_property_analyzer_is_isolated() {
    let mut configs = vec![ValueHostConfig::new("Age"), ValueHostConfig::new("Name")];

    let results = ConfigAnalysis::new()
        .with_value_host_analyzer(Panicking)
        .with_value_host_analyzer(Note("After"))
        .analyze(&mut configs);

    assert_eq!(results.value_host_results.len(), 2);
    for value_host in &results.value_host_results {
        let findings: Vec<_> = value_host
            .node
            .properties
            .iter()
            .map(|p| (p.property_name(), p.severity(), p.message().unwrap()))
            .collect();
        assert_eq!(
            findings,
            vec![
                (
                    "Panicking",
                    Some(Severity::Error),
                    "Panicking failed: panicked: index out of range"
                ),
                ("custom", Some(Severity::Info), "After ran"),
            ]
        );
    }
}

#[test]
fn test_parser_missing_in_one_culture_warns() {
    let services = AnalysisServices::new()
        .with_cultures(InMemoryCultures::new().with_culture("en").with_culture("fr"))
        .with_parsers(InMemoryParsers::new().with_culture("Number", "en", "EnNumberParser"));
    let mut configs = vec![ValueHostConfig::new("Age")
        .with("dataType", "Number")
        .with("parserLookupKey", "Number")];

    let results = ConfigAnalysis::with_services(services).analyze(&mut configs);

    let parser = results
        .explorer()
        .service_result("Number", ServiceName::Parser)
        .unwrap();
    assert_eq!(parser.implementation.as_deref(), Some("EnNumberParser"));
    let findings: Vec<_> = results.value_host_results[0]
        .node
        .properties_named("parserLookupKey")
        .collect();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity(), Some(Severity::Warning));
    assert!(findings[0].message().unwrap().contains("fr"));
}

#[test]
fn test_parser_not_found_is_an_error() {
    let mut configs = vec![ValueHostConfig::new("Age").with("parserLookupKey", "Number")];

    let results = ConfigAnalysis::new().analyze(&mut configs);

    let findings: Vec<_> = results.value_host_results[0]
        .node
        .properties_named("parserLookupKey")
        .collect();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity(), Some(Severity::Error));
    assert!(findings[0].message().unwrap().contains("Register a DataTypeParser"));
}

#[test_case(json!(null), 1; "null")]
#[test_case(json!(12), 1; "not a string")]
#[test_case(json!("  "), 1; "blank")]
#[test_case(json!("Emial"), 1; "unknown name")]
#[test_case(json!(" email "), 0; "matches ignoring case and whitespace")]
fn test_value_host_name_checks(value_host_name: serde_json::Value, expected: usize) {
    let mut configs = vec![ValueHostConfig::new("Email").with_validator(ValidatorConfig::new(
        ConditionConfig::new("RequireText").with("valueHostName", value_host_name),
    ))];

    let services = AnalysisServices::new().with_condition_factory(factory());
    let results = ConfigAnalysis::with_services(services).analyze(&mut configs);

    let condition = results.value_host_results[0].validator_results[0]
        .condition_result
        .as_ref()
        .unwrap();
    let findings: Vec<_> = condition.node.properties_named("valueHostName").collect();
    assert_eq!(findings.len(), expected);
    assert!(findings.iter().all(|p| p.severity() == Some(Severity::Error)));
}

fn conversion_findings(data_type: &str) -> Vec<Severity> {
    let services = AnalysisServices::new()
        .with_condition_factory(factory())
        .with_converters(InMemoryConverters::new().with_source(
            "Date",
            "TotalDays",
            "DateToTotalDays",
        ));
    let mut configs = vec![ValueHostConfig::new("Start").with("dataType", data_type).with_validator(
        ValidatorConfig::new(
            ConditionConfig::new("RequireText")
                .with("valueHostName", "Start")
                .with("conversionLookupKey", "TotalDays"),
        ),
    )];

    let results = ConfigAnalysis::with_services(services).analyze(&mut configs);

    results.value_host_results[0].validator_results[0]
        .condition_result
        .as_ref()
        .unwrap()
        .node
        .properties_named("conversionLookupKey")
        .filter_map(PropertyResult::severity)
        .collect()
}

#[test]
fn test_conversion_lookup_key_needs_converter() {
    assert_eq!(conversion_findings("Date"), Vec::<Severity>::new());
    assert_eq!(conversion_findings("String"), vec![Severity::Error]);
}

#[test]
fn test_validator_without_error_code_uses_condition_type() {
    let mut configs = vec![ValueHostConfig::new("Email").with_validator(ValidatorConfig::new(
        ConditionConfig::new("RequireText").with("valueHostName", "Email"),
    ))];

    let services = AnalysisServices::new().with_condition_factory(factory());
    let results = ConfigAnalysis::with_services(services).analyze(&mut configs);

    let validator = &results.value_host_results[0].validator_results[0].node;
    assert_eq!(validator.identity, "RequireText");
    let notes: Vec<_> = validator.properties_named("errorCode").collect();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity(), Some(Severity::Info));
}

#[test]
fn test_condition_without_type_is_not_viable() {
    let mut configs = vec![ValueHostConfig::new("Email").with_enabler(ConditionConfig::default())];

    let services = AnalysisServices::new().with_condition_factory(factory());
    let results = ConfigAnalysis::with_services(services).analyze(&mut configs);

    let enabler = results.value_host_results[0].enabler_condition_result.as_ref().unwrap();
    assert_eq!(enabler.node.identity, "[Missing]");
    assert_eq!(enabler.node.severity, Some(Severity::Error));
    assert_eq!(enabler.node.message.as_deref(), Some("conditionType is required."));
}
