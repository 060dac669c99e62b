//! Validation of `{token}` placeholders in messages.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::ValueHostConfig;
use crate::error::AnalysisError;
use crate::lookup_key::ServiceName;
use crate::results::{PropertyResult, Severity};

use super::{AnalysisResultsHelper, LookupKeyCheck};

/// Anything in braces, including an unterminated trailing brace.
static TOKEN_CANDIDATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^{}]*\}?").expect("token candidate pattern is valid"));

/// `{name}` or `{name:formatterKey}`.
static VALID_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{([A-Za-z_][A-Za-z0-9_]*)(?::([A-Za-z_][A-Za-z0-9_]*))?\}$")
        .expect("token pattern is valid")
});

impl AnalysisResultsHelper {
    /// Checks every token in `message`.
    ///
    /// A malformed token is an error quoting it. A formatter key after the
    /// colon goes through [`AnalysisResultsHelper::check_lookup_key_property`]
    /// against the formatter service.
    pub fn check_message_tokens(
        &mut self,
        message: Option<&str>,
        property_name: &str,
        value_host: Option<&ValueHostConfig>,
        properties: &mut Vec<PropertyResult>,
    ) -> Result<(), AnalysisError> {
        let Some(message) = message else {
            return Ok(());
        };

        for candidate in TOKEN_CANDIDATE.find_iter(message) {
            let token = candidate.as_str();
            match VALID_TOKEN.captures(token) {
                Some(captures) => {
                    if let Some(formatter_key) = captures.get(2) {
                        self.check_lookup_key_property(
                            &LookupKeyCheck::service(property_name, ServiceName::Formatter),
                            Some(formatter_key.as_str()),
                            value_host,
                            properties,
                        )?;
                    }
                }
                None => properties.push(PropertyResult::issue(
                    property_name,
                    Severity::Error,
                    format!(
                        "Invalid token \"{token}\". Tokens look like {{name}} or \
                         {{name:formatterKey}}."
                    ),
                )),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::helper::tests::helper_with;
    use crate::lookup_key::ServiceName;
    use crate::results::Severity;
    use crate::services::memory::InMemoryFormatters;
    use crate::services::AnalysisServices;

    #[test]
    fn test_valid_tokens_pass() {
        let formatters = InMemoryFormatters::new().with("Number", "NumberFormatter");
        let mut helper = helper_with(AnalysisServices::new().with_formatters(formatters));
        let mut properties = Vec::new();
        let message = "{Label} must be at least {Minimum:Number}.";
        helper
            .check_message_tokens(Some(message), "errorMessage", None, &mut properties)
            .unwrap();
        assert!(properties.is_empty());
        let formatter = helper.service_result("Number", ServiceName::Formatter);
        assert!(formatter.unwrap().is_resolved());
    }

    #[test]
    fn test_invalid_tokens_are_quoted() {
        let mut helper = helper_with(AnalysisServices::new());
        let mut properties = Vec::new();
        helper
            .check_message_tokens(
                Some("{Label is {bad token} and {Value"),
                "errorMessage",
                None,
                &mut properties,
            )
            .unwrap();
        let messages: Vec<_> = properties.iter().filter_map(|p| p.message()).collect();
        assert_eq!(messages.len(), 3);
        assert!(messages[0].contains("\"{Label is \""));
        assert!(messages.iter().any(|m| m.contains("\"{bad token}\"")));
        assert!(messages.iter().any(|m| m.contains("\"{Value\"")));
    }

    #[test]
    fn test_unknown_formatter_key_is_an_error() {
        let mut helper = helper_with(AnalysisServices::new());
        let mut properties = Vec::new();
        helper
            .check_message_tokens(Some("{Value:Currency}"), "summaryMessage", None, &mut properties)
            .unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].severity(), Some(Severity::Error));
        assert_eq!(properties[0].property_name(), "summaryMessage");
    }
}
