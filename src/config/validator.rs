use serde_json::{Map, Value};

use super::child_properties::CONDITION_CONFIG;
use super::{ConditionConfig, ConfigObject};

/// A validator: one condition plus the messages shown when it fails.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidatorConfig {
    properties: Map<String, Value>,
    condition_config: Option<ConditionConfig>,
}

impl ValidatorConfig {
    pub fn new(condition: ConditionConfig) -> Self {
        Self {
            properties: Map::new(),
            condition_config: Some(condition),
        }
    }

    pub(crate) fn from_parts(
        properties: Map<String, Value>,
        condition_config: Option<ConditionConfig>,
    ) -> Self {
        Self {
            properties,
            condition_config,
        }
    }

    pub fn with(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(property, value);
        self
    }

    pub fn condition_config(&self) -> Option<&ConditionConfig> {
        self.condition_config.as_ref()
    }

    pub fn error_code(&self) -> Option<&str> {
        self.get_str("errorCode")
    }

    pub fn error_message(&self) -> Option<&str> {
        self.get_str("errorMessage")
    }

    pub fn error_message_l10n(&self) -> Option<&str> {
        self.get_str("errorMessagel10n")
    }

    pub fn summary_message(&self) -> Option<&str> {
        self.get_str("summaryMessage")
    }

    pub fn summary_message_l10n(&self) -> Option<&str> {
        self.get_str("summaryMessagel10n")
    }

    pub fn to_json(&self) -> Value {
        let mut map = self.properties.clone();
        if let Some(condition) = &self.condition_config {
            map.insert(CONDITION_CONFIG.to_string(), condition.to_json());
        }
        Value::Object(map)
    }
}

impl ConfigObject for ValidatorConfig {
    fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.properties
    }
}
