use std::sync::Arc;

use crate::config::child_properties::{CONDITION_CONFIG, CONDITION_CONFIGS};
use crate::config::ConditionConfig;
use crate::error::AnalysisError;
use crate::helper::AnalysisResultsHelper;
use crate::results::{ConditionConfigResult, ConfigResult, Severity, MISSING_IDENTITY};

use super::{ConfigAnalyzer, ConfigPropertyAnalyzer, NodeScope, PropertyAnalyzers};

/// Analyzes one condition and any conditions nested in it.
///
/// Conditions are not checked for duplicates; the same condition type often
/// appears many times under one parent.
pub struct ConditionConfigAnalyzer {
    property_analyzers: PropertyAnalyzers<ConditionConfig, ConditionConfigResult>,
}

impl ConditionConfigAnalyzer {
    pub fn new(
        property_analyzers: PropertyAnalyzers<ConditionConfig, ConditionConfigResult>,
    ) -> Self {
        Self { property_analyzers }
    }
}

impl ConfigAnalyzer for ConditionConfigAnalyzer {
    type Config = ConditionConfig;
    type Result = ConditionConfigResult;

    fn initialize_result(
        &self,
        config: &ConditionConfig,
        scope: &NodeScope<'_>,
    ) -> ConditionConfigResult {
        let identity = config
            .condition_type()
            .map(str::trim)
            .filter(|condition_type| !condition_type.is_empty())
            .unwrap_or(MISSING_IDENTITY);
        ConditionConfigResult::new(identity, scope.path.clone())
    }

    fn check_viability(
        &self,
        config: &ConditionConfig,
        scope: &NodeScope<'_>,
        result: &mut ConditionConfigResult,
        helper: &AnalysisResultsHelper,
    ) -> bool {
        let max_depth = helper.args().options().max_condition_depth;
        if scope.condition_depth > max_depth {
            result.set_node_issue(
                Severity::Error,
                format!(
                    "Condition is nested {} levels deep, beyond the limit of {max_depth}.",
                    scope.condition_depth
                ),
            );
            return false;
        }

        let Some(condition_type) = config
            .condition_type()
            .map(str::trim)
            .filter(|condition_type| !condition_type.is_empty())
        else {
            result.set_node_issue(Severity::Error, "conditionType is required.");
            return false;
        };

        if !helper.services().condition_factory().can_create(condition_type) {
            result.set_node_issue(
                Severity::Error,
                format!(
                    "Condition type \"{condition_type}\" is not registered with the condition \
                     factory."
                ),
            );
            return false;
        }
        true
    }

    fn property_analyzers(
        &self,
    ) -> &[Arc<dyn ConfigPropertyAnalyzer<ConditionConfig, ConditionConfigResult>>] {
        &self.property_analyzers
    }

    fn analyze_children(
        &self,
        config: &ConditionConfig,
        scope: &NodeScope<'_>,
        result: &mut ConditionConfigResult,
        helper: &mut AnalysisResultsHelper,
    ) -> Result<(), AnalysisError> {
        if config.condition_configs().is_empty() && config.condition_config().is_none() {
            return Ok(());
        }
        let analyzers = helper.args().analyzers()?;

        for (index, child) in config.condition_configs().iter().enumerate() {
            let path = scope.path.push_property(CONDITION_CONFIGS).push_index(index);
            let child_scope = scope.descend_condition(path);
            let child_result = analyzers.condition.analyze(child, &child_scope, &[], helper);
            result.child_condition_results.push(child_result);
        }
        if let Some(child) = config.condition_config() {
            let child_scope = scope.descend_condition(scope.path.push_property(CONDITION_CONFIG));
            let child_result = analyzers.condition.analyze(child, &child_scope, &[], helper);
            result.child_condition_results.push(child_result);
        }
        Ok(())
    }
}
