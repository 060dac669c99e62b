//! Single-value checks used by property analyzers.
//!
//! Each check inspects one value, pushes at most one [`PropertyResult`] at the
//! severity the caller chose, and returns whether the caller can keep using
//! the value. None of them fail.

use serde_json::Value;

use crate::config::value_type_name;
use crate::results::{PropertyResult, Severity};

use super::AnalysisResultsHelper;

impl AnalysisResultsHelper {
    pub fn check_is_not_undefined(
        &self,
        value: Option<&Value>,
        property_name: &str,
        properties: &mut Vec<PropertyResult>,
        severity: Severity,
    ) -> bool {
        if value.is_some() {
            return true;
        }
        properties.push(PropertyResult::issue(property_name, severity, "Value must be assigned."));
        false
    }

    pub fn check_is_not_null(
        &self,
        value: Option<&Value>,
        property_name: &str,
        properties: &mut Vec<PropertyResult>,
        severity: Severity,
    ) -> bool {
        if !matches!(value, Some(Value::Null)) {
            return true;
        }
        properties.push(PropertyResult::issue(property_name, severity, "Value must not be null."));
        false
    }

    /// An absent or null value is not reported, but cannot be used either.
    pub fn check_is_string(
        &self,
        value: Option<&Value>,
        property_name: &str,
        properties: &mut Vec<PropertyResult>,
        severity: Severity,
    ) -> bool {
        match value {
            None | Some(Value::Null) => false,
            Some(Value::String(_)) => true,
            Some(other) => {
                properties.push(PropertyResult::issue(
                    property_name,
                    severity,
                    format!("Value must be a string, not {}.", value_type_name(other)),
                ));
                false
            }
        }
    }

    pub fn check_is_not_empty_string(
        &self,
        value: Option<&Value>,
        property_name: &str,
        properties: &mut Vec<PropertyResult>,
        severity: Severity,
    ) -> bool {
        match value.and_then(Value::as_str) {
            Some(text) if text.trim().is_empty() => {
                let message = "Value must not be empty.";
                properties.push(PropertyResult::issue(property_name, severity, message));
                false
            }
            _ => true,
        }
    }

    /// Returns `false` when the string has leading or trailing whitespace.
    pub fn check_needs_trimming(
        &self,
        value: Option<&Value>,
        property_name: &str,
        properties: &mut Vec<PropertyResult>,
        severity: Severity,
    ) -> bool {
        match value.and_then(Value::as_str) {
            Some(text) if text.trim() != text => {
                properties.push(PropertyResult::issue(
                    property_name,
                    severity,
                    format!("Value \"{text}\" has leading or trailing whitespace."),
                ));
                false
            }
            _ => true,
        }
    }

    pub fn check_value_host_name_exists(
        &self,
        value: Option<&Value>,
        property_name: &str,
        properties: &mut Vec<PropertyResult>,
        severity: Severity,
    ) -> bool {
        let Some(name) = value.and_then(Value::as_str) else {
            return false;
        };
        if self.value_host_name_exists(name) {
            return true;
        }
        properties.push(PropertyResult::issue(
            property_name,
            severity,
            format!("ValueHostName does not exist: \"{name}\"."),
        ));
        false
    }

    /// Runs `inspect` on a present value; a returned message becomes the
    /// finding.
    pub fn check_value_property_contents<F>(
        &self,
        value: Option<&Value>,
        property_name: &str,
        properties: &mut Vec<PropertyResult>,
        severity: Severity,
        inspect: F,
    ) -> bool
    where
        F: FnOnce(&Value) -> Option<String>,
    {
        let Some(value) = value else {
            return false;
        };
        match inspect(value) {
            Some(message) => {
                properties.push(PropertyResult::issue(property_name, severity, message));
                false
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::tests::helper_with;
    use crate::services::AnalysisServices;
    use serde_json::json;

    #[test]
    fn test_undefined_and_null() {
        let helper = helper_with(AnalysisServices::new());
        let mut properties = Vec::new();

        let null = json!(null);

        assert!(!helper.check_is_not_undefined(None, "name", &mut properties, Severity::Error));
        assert!(helper.check_is_not_undefined(
            Some(&null),
            "name",
            &mut properties,
            Severity::Error
        ));
        assert!(!helper.check_is_not_null(Some(&null), "name", &mut properties, Severity::Warning));
        assert!(helper.check_is_not_null(None, "name", &mut properties, Severity::Warning));

        assert_eq!(properties.len(), 2);
        assert_eq!(properties[1].severity(), Some(Severity::Warning));
    }

    #[test]
    fn test_string_checks() {
        let helper = helper_with(AnalysisServices::new());
        let mut properties = Vec::new();

        let (error, warning) = (Severity::Error, Severity::Warning);
        let (number, blank) = (json!(12), json!("  "));
        let (age, padded) = (json!("Age"), json!(" Age"));

        assert!(!helper.check_is_string(Some(&number), "label", &mut properties, error));
        assert!(properties[0].message().unwrap().contains("number"));
        assert!(!helper.check_is_string(None, "label", &mut properties, error));
        assert_eq!(properties.len(), 1);

        assert!(!helper.check_is_not_empty_string(Some(&blank), "label", &mut properties, error));
        assert!(helper.check_is_not_empty_string(Some(&age), "label", &mut properties, error));
        assert!(!helper.check_needs_trimming(Some(&padded), "label", &mut properties, warning));
        assert!(helper.check_needs_trimming(Some(&age), "label", &mut properties, warning));
        assert_eq!(properties.len(), 3);
    }

    #[test]
    fn test_value_host_name_exists_ignores_case() {
        let mut helper = helper_with(AnalysisServices::new());
        helper.args_mut().results_mut().value_host_names = vec!["Age".into()];
        let mut properties = Vec::new();

        let (age, height) = (json!("age"), json!("Height"));
        let property = "valueHostName";

        assert!(helper.check_value_host_name_exists(
            Some(&age),
            property,
            &mut properties,
            Severity::Error
        ));
        assert!(!helper.check_value_host_name_exists(
            Some(&height),
            property,
            &mut properties,
            Severity::Error
        ));
        assert_eq!(properties.len(), 1);
        assert!(properties[0].message().unwrap().contains("ValueHostName does not exist"));
    }

    #[test]
    fn test_value_property_contents() {
        let helper = helper_with(AnalysisServices::new());
        let mut properties = Vec::new();
        let positive = |value: &Value| match value.as_f64() {
            Some(n) if n > 0.0 => None,
            _ => Some("Must be a positive number.".to_string()),
        };

        let mut check = |value: Option<&Value>| {
            helper.check_value_property_contents(
                value,
                "minimum",
                &mut properties,
                Severity::Error,
                positive,
            )
        };

        assert!(check(Some(&json!(3))));
        assert!(!check(Some(&json!(-1))));
        assert!(!check(None));
        assert_eq!(properties.len(), 1);
    }
}
