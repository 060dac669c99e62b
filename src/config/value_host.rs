use serde_json::{Map, Value};

use super::child_properties::{ENABLER_CONFIG, VALIDATOR_CONFIGS};
use super::{ConditionConfig, ConfigObject, ValidatorConfig};

/// One value host: a named input or calculated value, its data type, and the
/// validators that apply to it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueHostConfig {
    properties: Map<String, Value>,
    validator_configs: Option<Vec<ValidatorConfig>>,
    enabler_config: Option<ConditionConfig>,
}

impl ValueHostConfig {
    /// A value host with only a `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.set("name", name.into());
        config
    }

    pub(crate) fn from_parts(
        properties: Map<String, Value>,
        validator_configs: Option<Vec<ValidatorConfig>>,
        enabler_config: Option<ConditionConfig>,
    ) -> Self {
        Self {
            properties,
            validator_configs,
            enabler_config,
        }
    }

    /// Builder form of [`ConfigObject::set`].
    pub fn with(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(property, value);
        self
    }

    pub fn with_validator(mut self, validator: ValidatorConfig) -> Self {
        self.validator_configs
            .get_or_insert_with(Vec::new)
            .push(validator);
        self
    }

    pub fn with_enabler(mut self, condition: ConditionConfig) -> Self {
        self.enabler_config = Some(condition);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn value_host_type(&self) -> Option<&str> {
        self.get_str("valueHostType")
    }

    pub fn data_type(&self) -> Option<&str> {
        self.get_str("dataType")
    }

    pub fn label(&self) -> Option<&str> {
        self.get_str("label")
    }

    pub fn label_l10n(&self) -> Option<&str> {
        self.get_str("labell10n")
    }

    pub fn parser_lookup_key(&self) -> Option<&str> {
        self.get_str("parserLookupKey")
    }

    pub fn validator_configs(&self) -> &[ValidatorConfig] {
        self.validator_configs.as_deref().unwrap_or_default()
    }

    pub fn enabler_config(&self) -> Option<&ConditionConfig> {
        self.enabler_config.as_ref()
    }

    /// Converts back to the JSON shape it was loaded from.
    pub fn to_json(&self) -> Value {
        let mut map = self.properties.clone();
        if let Some(validators) = &self.validator_configs {
            map.insert(
                VALIDATOR_CONFIGS.to_string(),
                Value::Array(validators.iter().map(ValidatorConfig::to_json).collect()),
            );
        }
        if let Some(enabler) = &self.enabler_config {
            map.insert(ENABLER_CONFIG.to_string(), enabler.to_json());
        }
        Value::Object(map)
    }
}

impl ConfigObject for ValueHostConfig {
    fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.properties
    }
}
