//! Checks that comparison conditions have a way to compare their values.

use serde_json::Value;
use tracing::debug;

use crate::config::ConditionConfig;
use crate::error::{AnalysisError, ComparerError};
use crate::helper::AnalysisResultsHelper;
use crate::lookup_key::ServiceName;
use crate::results::{ConditionConfigResult, ServiceResult, Severity};
use crate::services::{ComparisonResult, ConditionCategory};

use super::{ConfigPropertyAnalyzer, NodeScope};

/// Name recorded when the built-in comparison handles a lookup key.
pub const DEFAULT_COMPARER: &str = "DefaultComparer";

/// Resolves a comparer for comparison conditions.
///
/// The outcome is stored once per canonical lookup key as that key's
/// comparer [`ServiceResult`]; the condition itself gets no findings.
/// Resolution order:
///
/// 1. a registered comparer for the key, using the key's sample value
/// 2. a registered comparer for the deepest key in the fallback chain
/// 3. the built-in comparison, when it gives a determinate answer
/// 4. otherwise a warning with `not_found`
#[derive(Debug, Clone, Copy, Default)]
pub struct DataTypeComparerAnalyzer;

impl DataTypeComparerAnalyzer {
    /// True when the condition's category is `Comparison`, from its
    /// `category` property or from the factory's default for its type.
    pub fn needs_comparer(&self, config: &ConditionConfig, helper: &AnalysisResultsHelper) -> bool {
        if let Some(category) = config.category() {
            return ConditionCategory::parse(category) == ConditionCategory::Comparison;
        }
        match helper.services().condition_factory().create(&config.type_only()) {
            Ok(condition) => condition.category() == ConditionCategory::Comparison,
            Err(error) => {
                debug!(%error, "condition could not be created to read its category");
                false
            }
        }
    }

    /// `conversionLookupKey`, then `secondConversionLookupKey`, then the
    /// value host's `dataType`.
    pub fn comparison_lookup_key<'c>(
        &self,
        config: &'c ConditionConfig,
        scope: &NodeScope<'c>,
    ) -> Option<&'c str> {
        [
            config.conversion_lookup_key(),
            config.second_conversion_lookup_key(),
            scope.value_host.and_then(|host| host.data_type()),
        ]
        .into_iter()
        .flatten()
        .find(|key| !key.trim().is_empty())
    }

    fn resolve(
        &self,
        lookup_key: &str,
        scope: &NodeScope<'_>,
        helper: &mut AnalysisResultsHelper,
    ) -> ServiceResult {
        let value_host_name = scope.value_host.and_then(|host| host.name());
        let sample = match helper.args_mut().sample_value(lookup_key, value_host_name) {
            Ok(Some(sample)) => sample,
            Ok(None) => {
                return ServiceResult::not_found(ServiceName::Comparer).with_message(
                    Severity::Warning,
                    format!(
                        "No sample value for lookup key \"{lookup_key}\", so its comparer \
                         cannot be checked. Add an entry to lookupKeysSampleValues."
                    ),
                )
            }
            Err(error) => {
                return ServiceResult::not_found(ServiceName::Comparer)
                    .with_message(Severity::Error, error.to_string())
            }
        };

        let services = helper.args().shared_services();
        let comparers = services.comparers();

        if let Some(implementation) = comparers.find(&sample, &sample, lookup_key) {
            return ServiceResult::found(ServiceName::Comparer, implementation);
        }

        match services.fallbacks().fallback_to_deepest_match(lookup_key) {
            Ok(deepest) if deepest != lookup_key => {
                debug!(lookup_key, %deepest, "trying comparer for deepest fallback");
                if let Some(implementation) = comparers.find(&sample, &sample, &deepest) {
                    let mut result = ServiceResult::found(ServiceName::Comparer, implementation);
                    result.fallback_lookup_key = Some(deepest);
                    return result;
                }
            }
            Ok(_) => {}
            Err(error) => {
                return ServiceResult::not_found(ServiceName::Comparer)
                    .with_message(Severity::Error, error.to_string())
            }
        }

        match comparers.default_compare(&sample, &sample) {
            Ok(ComparisonResult::Undetermined) | Err(ComparerError::UnsupportedValueType(_)) => {}
            Ok(_) => {
                return ServiceResult::found(ServiceName::Comparer, DEFAULT_COMPARER).with_message(
                    Severity::Info,
                    format!(
                        "Values of lookup key \"{lookup_key}\" will be compared by the \
                         default comparer."
                    ),
                )
            }
            Err(ComparerError::Failed(message)) => {
                return ServiceResult::not_found(ServiceName::Comparer).with_message(
                    Severity::Error,
                    format!(
                        "The default comparer failed on the sample value for lookup key \
                         \"{lookup_key}\": {message}"
                    ),
                )
            }
        }

        ServiceResult::not_found(ServiceName::Comparer).with_message(
            Severity::Warning,
            format!(
                "No {} handles lookup key \"{lookup_key}\" and the default comparer cannot \
                 compare {}. Register a {} or set conversionLookupKey to a type that can be \
                 compared.",
                ServiceName::Comparer.implementation_class(),
                describe(&sample),
                ServiceName::Comparer.implementation_class(),
            ),
        )
    }
}

fn describe(sample: &Value) -> String {
    match sample {
        Value::Null => "null".to_string(),
        other => format!("{} values", crate::config::value_type_name(other)),
    }
}

impl ConfigPropertyAnalyzer<ConditionConfig, ConditionConfigResult> for DataTypeComparerAnalyzer {
    fn name(&self) -> &str {
        "DataTypeComparerAnalyzer"
    }

    fn analyze(
        &self,
        config: &ConditionConfig,
        _result: &mut ConditionConfigResult,
        scope: &NodeScope<'_>,
        helper: &mut AnalysisResultsHelper,
    ) -> Result<(), AnalysisError> {
        if !self.needs_comparer(config, helper) {
            return Ok(());
        }
        let Some(raw_key) = self.comparison_lookup_key(config, scope) else {
            return Ok(());
        };
        let Some(registration) =
            helper.register_service_lookup_key(Some(raw_key), None, scope.value_host)?
        else {
            return Ok(());
        };
        let lookup_key = registration.lookup_key;
        if helper.service_result(&lookup_key, ServiceName::Comparer).is_some() {
            return Ok(());
        }

        let result = self.resolve(&lookup_key, scope, helper);
        debug!(
            %lookup_key,
            implementation = ?result.implementation,
            not_found = result.not_found,
            "comparer resolved"
        );
        helper.seed_service_result(&lookup_key, result);
        Ok(())
    }
}
