//! Built-in property analyzers.
//!
//! Each one is a small independent rule. Hosts add their own by passing them
//! to [`ConfigAnalyzers::with_additional`](super::ConfigAnalyzers::with_additional)
//! or the analysis builder.

use std::sync::Arc;

use crate::config::{ConditionConfig, ConfigObject, ValidatorConfig, ValueHostConfig};
use crate::error::AnalysisError;
use crate::helper::{AnalysisResultsHelper, LookupKeyCheck};
use crate::lookup_key::ServiceName;
use crate::results::{
    ConditionConfigResult, ConfigResult, Severity, ValidatorConfigResult, ValueHostConfigResult,
};

use super::{ConfigPropertyAnalyzer, NodeScope, PropertyAnalyzers};

pub fn value_host_analyzers() -> PropertyAnalyzers<ValueHostConfig, ValueHostConfigResult> {
    vec![
        Arc::new(DataTypePropertyAnalyzer),
        Arc::new(LabelPropertyAnalyzer),
        Arc::new(ParserLookupKeyPropertyAnalyzer),
    ]
}

pub fn validator_analyzers() -> PropertyAnalyzers<ValidatorConfig, ValidatorConfigResult> {
    vec![Arc::new(ValidatorMessagesPropertyAnalyzer)]
}

/// The comparer analyzer is added separately by
/// [`ConfigAnalyzers`](super::ConfigAnalyzers).
pub fn condition_analyzers() -> PropertyAnalyzers<ConditionConfig, ConditionConfigResult> {
    vec![
        Arc::new(ValueHostNamePropertyAnalyzer),
        Arc::new(ConversionLookupKeyPropertyAnalyzer),
    ]
}

/// `dataType` must name a known lookup key, spelled exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataTypePropertyAnalyzer;

impl ConfigPropertyAnalyzer<ValueHostConfig, ValueHostConfigResult> for DataTypePropertyAnalyzer {
    fn name(&self) -> &str {
        "DataTypePropertyAnalyzer"
    }

    fn analyze(
        &self,
        config: &ValueHostConfig,
        result: &mut ValueHostConfigResult,
        _scope: &NodeScope<'_>,
        helper: &mut AnalysisResultsHelper,
    ) -> Result<(), AnalysisError> {
        let properties = result.properties_mut();
        let value = config.get("dataType");
        if !helper.check_is_string(value, "dataType", properties, Severity::Error) {
            return Ok(());
        }
        let Some(data_type) = config.data_type() else {
            return Ok(());
        };
        helper.check_lookup_key_property(
            &LookupKeyCheck::data_type("dataType"),
            Some(data_type),
            Some(config),
            properties,
        )?;
        helper.mark_used_as_data_type(data_type);
        Ok(())
    }
}

/// `labell10n` must resolve in every culture.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelPropertyAnalyzer;

impl ConfigPropertyAnalyzer<ValueHostConfig, ValueHostConfigResult> for LabelPropertyAnalyzer {
    fn name(&self) -> &str {
        "LabelPropertyAnalyzer"
    }

    fn analyze(
        &self,
        config: &ValueHostConfig,
        result: &mut ValueHostConfigResult,
        _scope: &NodeScope<'_>,
        helper: &mut AnalysisResultsHelper,
    ) -> Result<(), AnalysisError> {
        helper.check_localization(
            "label",
            config.label_l10n(),
            config.label(),
            result.properties_mut(),
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParserLookupKeyPropertyAnalyzer;

impl ConfigPropertyAnalyzer<ValueHostConfig, ValueHostConfigResult>
    for ParserLookupKeyPropertyAnalyzer
{
    fn name(&self) -> &str {
        "ParserLookupKeyPropertyAnalyzer"
    }

    fn analyze(
        &self,
        config: &ValueHostConfig,
        result: &mut ValueHostConfigResult,
        _scope: &NodeScope<'_>,
        helper: &mut AnalysisResultsHelper,
    ) -> Result<(), AnalysisError> {
        helper.check_lookup_key_property(
            &LookupKeyCheck::service("parserLookupKey", ServiceName::Parser),
            config.parser_lookup_key(),
            Some(config),
            result.properties_mut(),
        )
    }
}

/// Error and summary messages: localization plus token syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatorMessagesPropertyAnalyzer;

impl ConfigPropertyAnalyzer<ValidatorConfig, ValidatorConfigResult>
    for ValidatorMessagesPropertyAnalyzer
{
    fn name(&self) -> &str {
        "ValidatorMessagesPropertyAnalyzer"
    }

    fn analyze(
        &self,
        config: &ValidatorConfig,
        result: &mut ValidatorConfigResult,
        scope: &NodeScope<'_>,
        helper: &mut AnalysisResultsHelper,
    ) -> Result<(), AnalysisError> {
        let messages = [
            ("errorMessage", config.error_message(), config.error_message_l10n()),
            ("summaryMessage", config.summary_message(), config.summary_message_l10n()),
        ];
        let properties = result.properties_mut();
        for (property, text, l10n_key) in messages {
            let value = config.get(property);
            if value.is_some()
                && !helper.check_is_string(value, property, properties, Severity::Error)
            {
                continue;
            }
            helper.check_localization(property, l10n_key, text, properties);
            helper.check_message_tokens(text, property, scope.value_host, properties)?;
        }
        Ok(())
    }
}

/// `valueHostName` and `secondValueHostName` must name configured value hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueHostNamePropertyAnalyzer;

impl ConfigPropertyAnalyzer<ConditionConfig, ConditionConfigResult>
    for ValueHostNamePropertyAnalyzer
{
    fn name(&self) -> &str {
        "ValueHostNamePropertyAnalyzer"
    }

    fn analyze(
        &self,
        config: &ConditionConfig,
        result: &mut ConditionConfigResult,
        _scope: &NodeScope<'_>,
        helper: &mut AnalysisResultsHelper,
    ) -> Result<(), AnalysisError> {
        let properties = result.properties_mut();
        for property in ["valueHostName", "secondValueHostName"] {
            let value = config.get(property);
            if value.is_none()
                || !helper.check_is_not_null(value, property, properties, Severity::Error)
                || !helper.check_is_string(value, property, properties, Severity::Error)
                || !helper.check_is_not_empty_string(value, property, properties, Severity::Error)
            {
                continue;
            }
            helper.check_value_host_name_exists(value, property, properties, Severity::Error);
        }
        Ok(())
    }
}

/// Conversion lookup keys must have a registered converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversionLookupKeyPropertyAnalyzer;

impl ConfigPropertyAnalyzer<ConditionConfig, ConditionConfigResult>
    for ConversionLookupKeyPropertyAnalyzer
{
    fn name(&self) -> &str {
        "ConversionLookupKeyPropertyAnalyzer"
    }

    fn analyze(
        &self,
        config: &ConditionConfig,
        result: &mut ConditionConfigResult,
        scope: &NodeScope<'_>,
        helper: &mut AnalysisResultsHelper,
    ) -> Result<(), AnalysisError> {
        let keys = [
            ("conversionLookupKey", config.conversion_lookup_key()),
            ("secondConversionLookupKey", config.second_conversion_lookup_key()),
        ];
        for (property, raw_key) in keys {
            helper.check_lookup_key_property(
                &LookupKeyCheck::service(property, ServiceName::Converter),
                raw_key,
                scope.value_host,
                result.properties_mut(),
            )?;
        }
        Ok(())
    }
}
