use serde_json::{Map, Value};

use super::child_properties::{CONDITION_CONFIG, CONDITION_CONFIGS};
use super::ConfigObject;

/// A condition. `conditionType` selects the implementation in the condition
/// factory; the remaining properties depend on that type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConditionConfig {
    properties: Map<String, Value>,
    condition_configs: Option<Vec<ConditionConfig>>,
    condition_config: Option<Box<ConditionConfig>>,
}

impl ConditionConfig {
    pub fn new(condition_type: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.set("conditionType", condition_type.into());
        config
    }

    pub(crate) fn from_parts(
        properties: Map<String, Value>,
        condition_configs: Option<Vec<ConditionConfig>>,
        condition_config: Option<ConditionConfig>,
    ) -> Self {
        Self {
            properties,
            condition_configs,
            condition_config: condition_config.map(Box::new),
        }
    }

    pub fn with(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(property, value);
        self
    }

    /// Adds a child to `conditionConfigs` (All / Any style conditions).
    pub fn with_child(mut self, child: ConditionConfig) -> Self {
        self.condition_configs.get_or_insert_with(Vec::new).push(child);
        self
    }

    /// Sets the single wrapped `conditionConfig` (Not / When style conditions).
    pub fn with_wrapped(mut self, child: ConditionConfig) -> Self {
        self.condition_config = Some(Box::new(child));
        self
    }

    pub fn condition_type(&self) -> Option<&str> {
        self.get_str("conditionType")
    }

    pub fn category(&self) -> Option<&str> {
        self.get_str("category")
    }

    pub fn value_host_name(&self) -> Option<&str> {
        self.get_str("valueHostName")
    }

    pub fn second_value_host_name(&self) -> Option<&str> {
        self.get_str("secondValueHostName")
    }

    pub fn conversion_lookup_key(&self) -> Option<&str> {
        self.get_str("conversionLookupKey")
    }

    pub fn second_conversion_lookup_key(&self) -> Option<&str> {
        self.get_str("secondConversionLookupKey")
    }

    pub fn condition_configs(&self) -> &[ConditionConfig] {
        self.condition_configs.as_deref().unwrap_or_default()
    }

    pub fn condition_config(&self) -> Option<&ConditionConfig> {
        self.condition_config.as_deref()
    }

    /// A copy holding only `conditionType`, used to ask the factory for a
    /// condition's defaults without triggering validation of other properties.
    pub fn type_only(&self) -> ConditionConfig {
        let mut config = ConditionConfig::default();
        if let Some(condition_type) = self.get("conditionType") {
            config.set("conditionType", condition_type.clone());
        }
        config
    }

    pub fn to_json(&self) -> Value {
        let mut map = self.properties.clone();
        if let Some(children) = &self.condition_configs {
            map.insert(
                CONDITION_CONFIGS.to_string(),
                Value::Array(children.iter().map(ConditionConfig::to_json).collect()),
            );
        }
        if let Some(child) = &self.condition_config {
            map.insert(CONDITION_CONFIG.to_string(), child.to_json());
        }
        Value::Object(map)
    }
}

impl ConfigObject for ConditionConfig {
    fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.properties
    }
}
