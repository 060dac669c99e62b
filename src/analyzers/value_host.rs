use std::sync::Arc;

use serde_json::Value;

use crate::config::child_properties::{ENABLER_CONFIG, VALIDATOR_CONFIGS};
use crate::config::{ConfigObject, ValueHostConfig};
use crate::error::AnalysisError;
use crate::helper::AnalysisResultsHelper;
use crate::results::{ConfigResult, Severity, ValueHostConfigResult, MISSING_IDENTITY};

use super::{ConfigAnalyzer, ConfigPropertyAnalyzer, NodeScope, PropertyAnalyzers};

/// Analyzes one value host, then its validators and enabler condition.
pub struct ValueHostConfigAnalyzer {
    property_analyzers: PropertyAnalyzers<ValueHostConfig, ValueHostConfigResult>,
}

impl ValueHostConfigAnalyzer {
    pub fn new(
        property_analyzers: PropertyAnalyzers<ValueHostConfig, ValueHostConfigResult>,
    ) -> Self {
        Self { property_analyzers }
    }
}

impl ConfigAnalyzer for ValueHostConfigAnalyzer {
    type Config = ValueHostConfig;
    type Result = ValueHostConfigResult;

    fn initialize_result(
        &self,
        config: &ValueHostConfig,
        scope: &NodeScope<'_>,
    ) -> ValueHostConfigResult {
        let identity = config
            .name()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(MISSING_IDENTITY);
        ValueHostConfigResult::new(identity, scope.path.clone())
    }

    fn check_viability(
        &self,
        config: &ValueHostConfig,
        _scope: &NodeScope<'_>,
        result: &mut ValueHostConfigResult,
        _helper: &AnalysisResultsHelper,
    ) -> bool {
        match config.get("name") {
            Some(Value::String(name)) if !name.trim().is_empty() => true,
            Some(Value::String(_)) | Some(Value::Null) | None => {
                result.set_node_issue(
                    Severity::Error,
                    "Value host requires a name. Assign a unique, non-empty name.",
                );
                false
            }
            Some(_) => {
                result.set_node_issue(Severity::Error, "Value host name must be a string.");
                false
            }
        }
    }

    fn identity_property(&self) -> Option<&'static str> {
        Some("valueHostName")
    }

    fn property_analyzers(
        &self,
    ) -> &[Arc<dyn ConfigPropertyAnalyzer<ValueHostConfig, ValueHostConfigResult>>] {
        &self.property_analyzers
    }

    fn analyze_children(
        &self,
        config: &ValueHostConfig,
        scope: &NodeScope<'_>,
        result: &mut ValueHostConfigResult,
        helper: &mut AnalysisResultsHelper,
    ) -> Result<(), AnalysisError> {
        let analyzers = helper.args().analyzers()?;

        for (index, validator) in config.validator_configs().iter().enumerate() {
            let path = scope.path.push_property(VALIDATOR_CONFIGS).push_index(index);
            let child_scope = scope.descend(path);
            let validator_result = analyzers
                .validator
                .analyze(validator, &child_scope, &result.validator_results, helper);
            result.validator_results.push(validator_result);
        }

        if let Some(enabler) = config.enabler_config() {
            let child_scope = scope.descend_condition(scope.path.push_property(ENABLER_CONFIG));
            let enabler_result = analyzers
                .condition
                .analyze(enabler, &child_scope, &[], helper);
            result.enabler_condition_result = Some(enabler_result);
        }
        Ok(())
    }
}
