//! The configuration tree being analyzed.
//!
//! A configuration is a list of [`ValueHostConfig`]s. Each may own
//! [`ValidatorConfig`]s and an enabler [`ConditionConfig`]; validators own a
//! condition, and conditions may own nested conditions.
//!
//! Scalar properties are kept as raw JSON because condition types define their
//! own properties and the analyzers must be able to inspect values of the
//! wrong type. Child slots are typed so the tree walk never has to re-parse.
//!
//! # Example
//!
//! ```rust
//! use preflight::config::load_value_host_configs;
//! use serde_json::json;
//!
//! let loaded = load_value_host_configs(&json!([
//!     { "name": "Age", "dataType": "Number" },
//!     { "name": "Email", "validatorConfigs": [
//!         { "conditionConfig": { "conditionType": "RequireText", "valueHostName": "Email" } }
//!     ]}
//! ]));
//! assert!(loaded.is_success());
//! ```

mod condition;
mod load;
mod validator;
mod value_host;

use serde_json::{Map, Value};

pub use condition::ConditionConfig;
pub use load::load_value_host_configs;
pub use validator::ValidatorConfig;
pub use value_host::ValueHostConfig;

/// Raw property access shared by every configuration node.
pub trait ConfigObject {
    fn properties(&self) -> &Map<String, Value>;

    fn properties_mut(&mut self) -> &mut Map<String, Value>;

    /// Raw value of a scalar property. Child slots are not visible here.
    fn get(&self, property: &str) -> Option<&Value> {
        self.properties().get(property)
    }

    /// The property as a string, or `None` when absent or not a string.
    fn get_str(&self, property: &str) -> Option<&str> {
        self.get(property).and_then(Value::as_str)
    }

    fn set(&mut self, property: impl Into<String>, value: impl Into<Value>)
    where
        Self: Sized,
    {
        self.properties_mut().insert(property.into(), value.into());
    }
}

/// Names of the properties that hold child configuration objects.
pub(crate) mod child_properties {
    pub const VALIDATOR_CONFIGS: &str = "validatorConfigs";
    pub const ENABLER_CONFIG: &str = "enablerConfig";
    pub const CONDITION_CONFIG: &str = "conditionConfig";
    pub const CONDITION_CONFIGS: &str = "conditionConfigs";
}

/// Returns the JSON type name for a value.
pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
