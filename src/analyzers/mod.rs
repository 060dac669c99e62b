//! Tree-walking analyzers for configuration nodes.
//!
//! Every node goes through the same steps, implemented once in
//! [`ConfigAnalyzer::analyze`]:
//!
//! ```text
//! initialize -> viability --(not viable)--> done
//!                   |
//!                   +-> duplicate check -> property analyzers -> children -> done
//! ```
//!
//! A node that fails viability gets a node-level finding and nothing else,
//! so one broken node does not produce a cascade of follow-on findings.

mod comparer;
mod condition;
pub mod properties;
mod validator;
mod value_host;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{ConditionConfig, ValidatorConfig, ValueHostConfig};
use crate::error::AnalysisError;
use crate::helper::AnalysisResultsHelper;
use crate::lookup_key::eq_ignore_case;
use crate::path::ConfigPath;
use crate::results::{
    ConditionConfigResult, ConfigResult, PropertyResult, Severity, ValidatorConfigResult,
    ValueHostConfigResult, MISSING_IDENTITY, UNKNOWN_IDENTITY,
};

pub use comparer::DataTypeComparerAnalyzer;
pub use condition::ConditionConfigAnalyzer;
pub use validator::ValidatorConfigAnalyzer;
pub use value_host::ValueHostConfigAnalyzer;

/// Where a node sits in the tree.
#[derive(Debug, Clone)]
pub struct NodeScope<'a> {
    /// The value host that owns this node, or the node itself for value hosts.
    pub value_host: Option<&'a ValueHostConfig>,
    pub path: ConfigPath,
    /// 0 outside conditions, 1 for a top-level condition.
    pub condition_depth: usize,
}

impl<'a> NodeScope<'a> {
    pub fn value_host(index: usize, config: &'a ValueHostConfig) -> Self {
        Self {
            value_host: Some(config),
            path: ConfigPath::value_host(index),
            condition_depth: 0,
        }
    }

    /// Scope for a non-condition child at `path`.
    pub fn descend(&self, path: ConfigPath) -> Self {
        Self {
            value_host: self.value_host,
            path,
            condition_depth: self.condition_depth,
        }
    }

    /// Scope for a condition at `path`, one level deeper.
    pub fn descend_condition(&self, path: ConfigPath) -> Self {
        Self {
            value_host: self.value_host,
            path,
            condition_depth: self.condition_depth + 1,
        }
    }
}

/// One independent rule run against every viable node of a kind.
///
/// An `Err` or a panic is recorded as an error finding naming the analyzer;
/// the remaining analyzers still run.
pub trait ConfigPropertyAnalyzer<C, R>: Send + Sync {
    fn name(&self) -> &str;

    fn analyze(
        &self,
        config: &C,
        result: &mut R,
        scope: &NodeScope<'_>,
        helper: &mut AnalysisResultsHelper,
    ) -> Result<(), AnalysisError>;
}

pub type PropertyAnalyzers<C, R> = Vec<Arc<dyn ConfigPropertyAnalyzer<C, R>>>;

pub trait ConfigAnalyzer: Send + Sync {
    type Config;
    type Result: ConfigResult;

    /// Builds the result shell, deriving the node's identity.
    fn initialize_result(&self, config: &Self::Config, scope: &NodeScope<'_>) -> Self::Result;

    /// Returns `false`, after setting a node-level finding, when the node
    /// cannot be analyzed further.
    fn check_viability(
        &self,
        config: &Self::Config,
        scope: &NodeScope<'_>,
        result: &mut Self::Result,
        helper: &AnalysisResultsHelper,
    ) -> bool;

    /// Property that duplicate identities are reported on. `None` skips the
    /// duplicate check.
    fn identity_property(&self) -> Option<&'static str> {
        None
    }

    fn property_analyzers(&self) -> &[Arc<dyn ConfigPropertyAnalyzer<Self::Config, Self::Result>>];

    fn analyze_children(
        &self,
        _config: &Self::Config,
        _scope: &NodeScope<'_>,
        _result: &mut Self::Result,
        _helper: &mut AnalysisResultsHelper,
    ) -> Result<(), AnalysisError> {
        Ok(())
    }

    /// Runs the full sequence for one node. `siblings` are the results of
    /// earlier nodes in the same collection.
    fn analyze(
        &self,
        config: &Self::Config,
        scope: &NodeScope<'_>,
        siblings: &[Self::Result],
        helper: &mut AnalysisResultsHelper,
    ) -> Self::Result {
        let mut result = self.initialize_result(config, scope);
        if !self.check_viability(config, scope, &mut result, helper) {
            debug!(path = %scope.path, identity = result.identity(), "node is not viable");
            return result;
        }

        if let Some(property) = self.identity_property() {
            check_duplicate_identity(&mut result, siblings, property);
        }

        for analyzer in self.property_analyzers() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                analyzer.analyze(config, &mut result, scope, helper)
            }));
            let error = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(error)) => error,
                Err(payload) => AnalysisError::PropertyAnalyzer {
                    analyzer: analyzer.name().to_string(),
                    message: format!("panicked: {}", panic_message(payload.as_ref())),
                },
            };
            warn!(
                analyzer = analyzer.name(),
                path = %scope.path,
                %error,
                "property analyzer failed"
            );
            let message = match error {
                AnalysisError::PropertyAnalyzer { .. } => error.to_string(),
                other => format!("{} failed: {}", analyzer.name(), other),
            };
            result.properties_mut().push(PropertyResult::issue(
                analyzer.name(),
                Severity::Error,
                message,
            ));
        }

        if let Err(error) = self.analyze_children(config, scope, &mut result, helper) {
            warn!(path = %scope.path, %error, "child analysis failed");
            result.set_node_issue(Severity::Error, error.to_string());
        }
        result
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

fn check_duplicate_identity<R: ConfigResult>(result: &mut R, siblings: &[R], property: &str) {
    let identity = result.identity().to_string();
    if identity == MISSING_IDENTITY || identity == UNKNOWN_IDENTITY {
        return;
    }
    if siblings
        .iter()
        .any(|sibling| eq_ignore_case(sibling.identity(), &identity))
    {
        let message = format!(
            "Duplicate {property} \"{identity}\". Another {} already uses it.",
            result.feature()
        );
        result
            .properties_mut()
            .push(PropertyResult::issue(property, Severity::Error, message));
    }
}

/// The node analyzers for one analysis, attached to the args after
/// construction so they can reach one another.
pub struct ConfigAnalyzers {
    pub value_host: ValueHostConfigAnalyzer,
    pub validator: ValidatorConfigAnalyzer,
    pub condition: ConditionConfigAnalyzer,
    pub comparer: Arc<DataTypeComparerAnalyzer>,
}

impl ConfigAnalyzers {
    /// Built-in property analyzers only.
    pub fn standard() -> Self {
        Self::with_additional(Vec::new(), Vec::new(), Vec::new())
    }

    /// Built-in property analyzers followed by the given ones.
    pub fn with_additional(
        value_host: PropertyAnalyzers<ValueHostConfig, ValueHostConfigResult>,
        validator: PropertyAnalyzers<ValidatorConfig, ValidatorConfigResult>,
        condition: PropertyAnalyzers<ConditionConfig, ConditionConfigResult>,
    ) -> Self {
        let comparer = Arc::new(DataTypeComparerAnalyzer);

        let mut value_host_analyzers = properties::value_host_analyzers();
        value_host_analyzers.extend(value_host);

        let mut validator_analyzers = properties::validator_analyzers();
        validator_analyzers.extend(validator);

        let mut condition_analyzers = properties::condition_analyzers();
        let comparer_analyzer: Arc<
            dyn ConfigPropertyAnalyzer<ConditionConfig, ConditionConfigResult>,
        > = comparer.clone();
        condition_analyzers.push(comparer_analyzer);
        condition_analyzers.extend(condition);

        Self {
            value_host: ValueHostConfigAnalyzer::new(value_host_analyzers),
            validator: ValidatorConfigAnalyzer::new(validator_analyzers),
            condition: ConditionConfigAnalyzer::new(condition_analyzers),
            comparer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::ConfigFeature;

    #[test]
    fn test_scope_depth_tracking() {
        let host = ValueHostConfig::new("Age");
        let scope = NodeScope::value_host(2, &host);
        let validator = scope.descend(scope.path.push_property("validatorConfigs").push_index(0));
        let condition =
            validator.descend_condition(validator.path.push_property("conditionConfig"));
        let nested = condition
            .descend_condition(condition.path.push_property("conditionConfigs").push_index(1));

        assert_eq!(validator.condition_depth, 0);
        assert_eq!(condition.condition_depth, 1);
        assert_eq!(nested.condition_depth, 2);
        assert_eq!(
            nested.path.to_string(),
            "valueHostConfigs[2].validatorConfigs[0].conditionConfig.conditionConfigs[1]"
        );
    }

    #[test]
    fn test_duplicate_identity_ignores_case_and_sentinels() {
        let earlier = vec![ValueHostConfigResult::new("Age", ConfigPath::value_host(0))];

        let mut duplicate = ValueHostConfigResult::new("AGE", ConfigPath::value_host(1));
        check_duplicate_identity(&mut duplicate, &earlier, "valueHostName");
        assert_eq!(duplicate.properties().len(), 1);
        assert_eq!(duplicate.properties()[0].property_name(), "valueHostName");
        assert!(duplicate.properties()[0].message().unwrap().contains("AGE"));
        assert_eq!(duplicate.feature(), ConfigFeature::ValueHost);

        let missing = vec![ValueHostConfigResult::new(MISSING_IDENTITY, ConfigPath::value_host(0))];
        let mut also_missing =
            ValueHostConfigResult::new(MISSING_IDENTITY, ConfigPath::value_host(1));
        check_duplicate_identity(&mut also_missing, &missing, "valueHostName");
        assert!(also_missing.properties().is_empty());
    }
}
