//! Results for the configuration nodes that were visited.

use std::fmt::{self, Display};

use serde::Serialize;

use crate::path::ConfigPath;

use super::{PropertyResult, Severity};

/// Identity used when a node's identifying property is absent.
pub const MISSING_IDENTITY: &str = "[Missing]";
/// Identity used when a node's identity can only be known at runtime.
pub const UNKNOWN_IDENTITY: &str = "[Unknown at this time]";

/// Which kind of configuration node a result describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConfigFeature {
    ValueHost,
    Validator,
    Condition,
}

impl Display for ConfigFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFeature::ValueHost => write!(f, "ValueHost"),
            ConfigFeature::Validator => write!(f, "Validator"),
            ConfigFeature::Condition => write!(f, "Condition"),
        }
    }
}

/// The part of a node result shared by every feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigNodeResult {
    pub feature: ConfigFeature,
    /// Name, error code or condition type, or one of the sentinel identities.
    pub identity: String,
    pub path: ConfigPath,
    pub properties: Vec<PropertyResult>,
    /// Set only when the node itself is not viable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ConfigNodeResult {
    pub fn new(feature: ConfigFeature, identity: impl Into<String>, path: ConfigPath) -> Self {
        Self {
            feature,
            identity: identity.into(),
            path,
            properties: Vec::new(),
            severity: None,
            message: None,
        }
    }

    pub fn properties_named<'a>(
        &'a self,
        property_name: &'a str,
    ) -> impl Iterator<Item = &'a PropertyResult> + 'a {
        self.properties
            .iter()
            .filter(move |p| p.property_name() == property_name)
    }

    /// Worst severity on the node or any of its properties.
    pub fn worst_severity(&self) -> Option<Severity> {
        self.properties
            .iter()
            .filter_map(PropertyResult::severity)
            .chain(self.severity)
            .max()
    }
}

/// Common access to the three node result types.
pub trait ConfigResult {
    fn node(&self) -> &ConfigNodeResult;

    fn node_mut(&mut self) -> &mut ConfigNodeResult;

    fn feature(&self) -> ConfigFeature {
        self.node().feature
    }

    fn identity(&self) -> &str {
        &self.node().identity
    }

    fn properties(&self) -> &[PropertyResult] {
        &self.node().properties
    }

    fn properties_mut(&mut self) -> &mut Vec<PropertyResult> {
        &mut self.node_mut().properties
    }

    /// Marks the node itself as having a problem.
    fn set_node_issue(&mut self, severity: Severity, message: impl Into<String>)
    where
        Self: Sized,
    {
        let node = self.node_mut();
        node.severity = Some(severity);
        node.message = Some(message.into());
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueHostConfigResult {
    #[serde(flatten)]
    pub node: ConfigNodeResult,
    pub validator_results: Vec<ValidatorConfigResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabler_condition_result: Option<ConditionConfigResult>,
}

impl ValueHostConfigResult {
    pub fn new(value_host_name: impl Into<String>, path: ConfigPath) -> Self {
        Self {
            node: ConfigNodeResult::new(ConfigFeature::ValueHost, value_host_name, path),
            validator_results: Vec::new(),
            enabler_condition_result: None,
        }
    }
}

impl ConfigResult for ValueHostConfigResult {
    fn node(&self) -> &ConfigNodeResult {
        &self.node
    }

    fn node_mut(&mut self) -> &mut ConfigNodeResult {
        &mut self.node
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorConfigResult {
    #[serde(flatten)]
    pub node: ConfigNodeResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_result: Option<ConditionConfigResult>,
}

impl ValidatorConfigResult {
    pub fn new(error_code: impl Into<String>, path: ConfigPath) -> Self {
        Self {
            node: ConfigNodeResult::new(ConfigFeature::Validator, error_code, path),
            condition_result: None,
        }
    }
}

impl ConfigResult for ValidatorConfigResult {
    fn node(&self) -> &ConfigNodeResult {
        &self.node
    }

    fn node_mut(&mut self) -> &mut ConfigNodeResult {
        &mut self.node
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionConfigResult {
    #[serde(flatten)]
    pub node: ConfigNodeResult,
    /// Results for `conditionConfigs` followed by the wrapped `conditionConfig`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub child_condition_results: Vec<ConditionConfigResult>,
}

impl ConditionConfigResult {
    pub fn new(condition_type: impl Into<String>, path: ConfigPath) -> Self {
        Self {
            node: ConfigNodeResult::new(ConfigFeature::Condition, condition_type, path),
            child_condition_results: Vec::new(),
        }
    }
}

impl ConfigResult for ConditionConfigResult {
    fn node(&self) -> &ConfigNodeResult {
        &self.node
    }

    fn node_mut(&mut self) -> &mut ConfigNodeResult {
        &mut self.node
    }
}
