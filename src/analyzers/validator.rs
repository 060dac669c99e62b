use std::sync::Arc;

use crate::config::child_properties::CONDITION_CONFIG;
use crate::config::ValidatorConfig;
use crate::error::AnalysisError;
use crate::helper::AnalysisResultsHelper;
use crate::results::{
    ConfigResult, PropertyResult, Severity, ValidatorConfigResult, UNKNOWN_IDENTITY,
};

use super::{ConfigAnalyzer, ConfigPropertyAnalyzer, NodeScope, PropertyAnalyzers};

/// Analyzes one validator and its condition.
///
/// Identity is the `errorCode`, or the condition type the runtime will use
/// in its place.
pub struct ValidatorConfigAnalyzer {
    property_analyzers: PropertyAnalyzers<ValidatorConfig, ValidatorConfigResult>,
}

impl ValidatorConfigAnalyzer {
    pub fn new(
        property_analyzers: PropertyAnalyzers<ValidatorConfig, ValidatorConfigResult>,
    ) -> Self {
        Self { property_analyzers }
    }
}

impl ConfigAnalyzer for ValidatorConfigAnalyzer {
    type Config = ValidatorConfig;
    type Result = ValidatorConfigResult;

    fn initialize_result(
        &self,
        config: &ValidatorConfig,
        scope: &NodeScope<'_>,
    ) -> ValidatorConfigResult {
        let error_code = config
            .error_code()
            .map(str::trim)
            .filter(|code| !code.is_empty());
        if let Some(error_code) = error_code {
            return ValidatorConfigResult::new(error_code, scope.path.clone());
        }

        let condition_type = config
            .condition_config()
            .and_then(|condition| condition.condition_type())
            .map(str::trim)
            .filter(|condition_type| !condition_type.is_empty());
        match condition_type {
            Some(condition_type) => {
                let mut result = ValidatorConfigResult::new(condition_type, scope.path.clone());
                result.properties_mut().push(PropertyResult::issue(
                    "errorCode",
                    Severity::Info,
                    format!(
                        "errorCode is not assigned. Using conditionType \"{condition_type}\" \
                         as the error code."
                    ),
                ));
                result
            }
            None => ValidatorConfigResult::new(UNKNOWN_IDENTITY, scope.path.clone()),
        }
    }

    fn check_viability(
        &self,
        config: &ValidatorConfig,
        _scope: &NodeScope<'_>,
        result: &mut ValidatorConfigResult,
        _helper: &AnalysisResultsHelper,
    ) -> bool {
        if config.condition_config().is_some() {
            return true;
        }
        result.set_node_issue(Severity::Error, "Validator requires a conditionConfig.");
        false
    }

    fn identity_property(&self) -> Option<&'static str> {
        Some("errorCode")
    }

    fn property_analyzers(
        &self,
    ) -> &[Arc<dyn ConfigPropertyAnalyzer<ValidatorConfig, ValidatorConfigResult>>] {
        &self.property_analyzers
    }

    fn analyze_children(
        &self,
        config: &ValidatorConfig,
        scope: &NodeScope<'_>,
        result: &mut ValidatorConfigResult,
        helper: &mut AnalysisResultsHelper,
    ) -> Result<(), AnalysisError> {
        let Some(condition) = config.condition_config() else {
            return Ok(());
        };
        let analyzers = helper.args().analyzers()?;
        let child_scope = scope.descend_condition(scope.path.push_property(CONDITION_CONFIG));
        let condition_result = analyzers
            .condition
            .analyze(condition, &child_scope, &[], helper);
        result.condition_result = Some(condition_result);
        Ok(())
    }
}
