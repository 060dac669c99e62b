//! Turning a JSON document into configuration objects.

use serde_json::{Map, Value};
use stillwater::Validation;

use crate::error::{ConfigError, ConfigErrors};
use crate::path::ConfigPath;
use crate::LoadResult;

use super::child_properties::{
    CONDITION_CONFIG, CONDITION_CONFIGS, ENABLER_CONFIG, VALIDATOR_CONFIGS,
};
use super::{value_type_name, ConditionConfig, ValidatorConfig, ValueHostConfig};

/// Loads the root list of value host configs.
///
/// Every structural problem in the document is reported, not just the first.
/// `null` child slots are treated as absent.
///
/// # Example
///
/// ```rust
/// use preflight::config::load_value_host_configs;
/// use serde_json::json;
///
/// let loaded = load_value_host_configs(&json!([
///     "not an object",
///     { "name": "Age", "validatorConfigs": {} }
/// ]));
/// let errors = loaded.into_result().unwrap_err();
/// assert_eq!(errors.len(), 2);
/// ```
pub fn load_value_host_configs(document: &Value) -> LoadResult<Vec<ValueHostConfig>> {
    let root = ConfigPath::root();
    let Some(items) = document.as_array() else {
        return Validation::Failure(ConfigErrors::single(
            ConfigError::new(root, "expected an array of value host configs")
                .with_code("not_an_array")
                .with_got(value_type_name(document)),
        ));
    };

    let mut errors = Vec::new();
    let mut configs = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        collect(
            load_value_host(item, &ConfigPath::value_host(index)),
            &mut configs,
            &mut errors,
        );
    }
    finish(configs, errors)
}

impl ValueHostConfig {
    /// Loads a single value host config from JSON.
    pub fn from_json(value: &Value) -> Result<Self, ConfigErrors> {
        load_value_host(value, &ConfigPath::root()).into_result()
    }
}

impl ValidatorConfig {
    pub fn from_json(value: &Value) -> Result<Self, ConfigErrors> {
        load_validator(value, &ConfigPath::root()).into_result()
    }
}

impl ConditionConfig {
    pub fn from_json(value: &Value) -> Result<Self, ConfigErrors> {
        load_condition(value, &ConfigPath::root()).into_result()
    }
}

fn load_value_host(value: &Value, path: &ConfigPath) -> Validation<ValueHostConfig, ConfigErrors> {
    let mut properties = match expect_object(value, path) {
        Ok(map) => map.clone(),
        Err(error) => return Validation::Failure(ConfigErrors::single(error)),
    };
    let mut errors = Vec::new();

    let validators = take_array(&mut properties, VALIDATOR_CONFIGS, path, &mut errors).map(|items| {
        let mut validators = Vec::with_capacity(items.len());
        let validators_path = path.push_property(VALIDATOR_CONFIGS);
        for (index, item) in items.iter().enumerate() {
            collect(
                load_validator(item, &validators_path.push_index(index)),
                &mut validators,
                &mut errors,
            );
        }
        validators
    });

    let enabler = take_object(&mut properties, ENABLER_CONFIG, path, &mut errors)
        .and_then(|item| {
            collect_one(
                load_condition(&item, &path.push_property(ENABLER_CONFIG)),
                &mut errors,
            )
        });

    finish(
        ValueHostConfig::from_parts(properties, validators, enabler),
        errors,
    )
}

fn load_validator(value: &Value, path: &ConfigPath) -> Validation<ValidatorConfig, ConfigErrors> {
    let mut properties = match expect_object(value, path) {
        Ok(map) => map.clone(),
        Err(error) => return Validation::Failure(ConfigErrors::single(error)),
    };
    let mut errors = Vec::new();

    let condition =
        take_object(&mut properties, CONDITION_CONFIG, path, &mut errors).and_then(|item| {
            collect_one(
                load_condition(&item, &path.push_property(CONDITION_CONFIG)),
                &mut errors,
            )
        });

    finish(ValidatorConfig::from_parts(properties, condition), errors)
}

fn load_condition(value: &Value, path: &ConfigPath) -> Validation<ConditionConfig, ConfigErrors> {
    let mut properties = match expect_object(value, path) {
        Ok(map) => map.clone(),
        Err(error) => return Validation::Failure(ConfigErrors::single(error)),
    };
    let mut errors = Vec::new();

    let children = take_array(&mut properties, CONDITION_CONFIGS, path, &mut errors).map(|items| {
        let mut children = Vec::with_capacity(items.len());
        let children_path = path.push_property(CONDITION_CONFIGS);
        for (index, item) in items.iter().enumerate() {
            collect(
                load_condition(item, &children_path.push_index(index)),
                &mut children,
                &mut errors,
            );
        }
        children
    });

    let wrapped =
        take_object(&mut properties, CONDITION_CONFIG, path, &mut errors).and_then(|item| {
            collect_one(
                load_condition(&item, &path.push_property(CONDITION_CONFIG)),
                &mut errors,
            )
        });

    finish(
        ConditionConfig::from_parts(properties, children, wrapped),
        errors,
    )
}

fn expect_object<'v>(
    value: &'v Value,
    path: &ConfigPath,
) -> Result<&'v Map<String, Value>, ConfigError> {
    value.as_object().ok_or_else(|| {
        ConfigError::new(path.clone(), "expected an object")
            .with_code("not_an_object")
            .with_got(value_type_name(value))
    })
}

/// Removes an array-valued child slot from `properties`.
fn take_array(
    properties: &mut Map<String, Value>,
    property: &str,
    path: &ConfigPath,
    errors: &mut Vec<ConfigError>,
) -> Option<Vec<Value>> {
    match properties.remove(property)? {
        Value::Null => None,
        Value::Array(items) => Some(items),
        other => {
            errors.push(
                ConfigError::new(
                    path.push_property(property),
                    format!("'{}' must be an array", property),
                )
                .with_code("not_an_array")
                .with_got(value_type_name(&other)),
            );
            None
        }
    }
}

/// Removes an object-valued child slot from `properties`.
fn take_object(
    properties: &mut Map<String, Value>,
    property: &str,
    path: &ConfigPath,
    errors: &mut Vec<ConfigError>,
) -> Option<Value> {
    match properties.remove(property)? {
        Value::Null => None,
        object @ Value::Object(_) => Some(object),
        other => {
            errors.push(
                ConfigError::new(
                    path.push_property(property),
                    format!("'{}' must be an object", property),
                )
                .with_code("not_an_object")
                .with_got(value_type_name(&other)),
            );
            None
        }
    }
}

fn collect<T>(
    result: Validation<T, ConfigErrors>,
    items: &mut Vec<T>,
    errors: &mut Vec<ConfigError>,
) {
    if let Some(item) = collect_one(result, errors) {
        items.push(item);
    }
}

fn collect_one<T>(result: Validation<T, ConfigErrors>, errors: &mut Vec<ConfigError>) -> Option<T> {
    match result {
        Validation::Success(item) => Some(item),
        Validation::Failure(e) => {
            errors.extend(e);
            None
        }
    }
}

fn finish<T>(value: T, errors: Vec<ConfigError>) -> Validation<T, ConfigErrors> {
    match ConfigErrors::from_vec(errors) {
        None => Validation::Success(value),
        Some(errors) => Validation::Failure(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigObject;
    use serde_json::json;

    #[test]
    fn test_loads_nested_tree() {
        let configs = load_value_host_configs(&json!([{
            "name": "Start",
            "dataType": "Date",
            "validatorConfigs": [{
                "errorCode": "Range",
                "conditionConfig": {
                    "conditionType": "All",
                    "conditionConfigs": [
                        { "conditionType": "RequireText", "valueHostName": "Start" },
                        {
                            "conditionType": "Not",
                            "conditionConfig": { "conditionType": "EqualTo" }
                        }
                    ]
                }
            }],
            "enablerConfig": { "conditionType": "RequireText", "valueHostName": "End" }
        }]))
        .into_result()
        .unwrap();

        let start = &configs[0];
        assert_eq!(start.name(), Some("Start"));
        assert!(start.get(VALIDATOR_CONFIGS).is_none());
        let condition = start.validator_configs()[0].condition_config().unwrap();
        assert_eq!(condition.condition_configs().len(), 2);
        assert_eq!(
            condition.condition_configs()[1]
                .condition_config()
                .and_then(ConditionConfig::condition_type),
            Some("EqualTo")
        );
        assert_eq!(
            start.enabler_config().and_then(ConditionConfig::value_host_name),
            Some("End")
        );
    }

    #[test]
    fn test_null_child_slots_are_absent() {
        let config = ValueHostConfig::from_json(&json!({
            "name": "Age",
            "validatorConfigs": null,
            "enablerConfig": null
        }))
        .unwrap();
        assert!(config.validator_configs().is_empty());
        assert!(config.enabler_config().is_none());
    }

    #[test]
    fn test_root_must_be_array() {
        let errors = load_value_host_configs(&json!({"name": "Age"}))
            .into_result()
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().code, "not_an_array");
        assert_eq!(errors.first().got.as_deref(), Some("object"));
    }

    #[test]
    fn test_accumulates_errors_across_the_tree() {
        let errors = load_value_host_configs(&json!([
            42,
            { "name": "A", "validatorConfigs": [ "x", { "conditionConfig": [] } ] },
            { "name": "B", "enablerConfig": { "conditionType": "All", "conditionConfigs": {} } }
        ]))
        .into_result()
        .unwrap_err();

        let paths: Vec<_> = errors.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "valueHostConfigs[0]",
                "valueHostConfigs[1].validatorConfigs[0]",
                "valueHostConfigs[1].validatorConfigs[1].conditionConfig",
                "valueHostConfigs[2].enablerConfig.conditionConfigs",
            ]
        );
    }

    #[test]
    fn test_round_trips_to_json() {
        let source = json!({
            "name": "Age",
            "validatorConfigs": [{ "conditionConfig": { "conditionType": "RequireText" } }]
        });
        let config = ValueHostConfig::from_json(&source).unwrap();
        assert_eq!(config.to_json(), source);
    }
}
