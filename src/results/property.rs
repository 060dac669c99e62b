//! Findings attached to a single property of a configuration node.

use indexmap::IndexMap;
use serde::Serialize;

use super::Severity;

/// A finding about one property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PropertyResult {
    Issue(PropertyIssue),
    /// Outcome of resolving a localization key in every configured culture.
    Localized(LocalizedPropertyResult),
}

impl PropertyResult {
    pub fn issue(
        property_name: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        PropertyResult::Issue(PropertyIssue {
            property_name: property_name.into(),
            severity,
            message: message.into(),
        })
    }

    pub fn property_name(&self) -> &str {
        match self {
            PropertyResult::Issue(issue) => &issue.property_name,
            PropertyResult::Localized(localized) => &localized.property_name,
        }
    }

    /// For localized results, the worst severity across cultures.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            PropertyResult::Issue(issue) => Some(issue.severity),
            PropertyResult::Localized(localized) => localized.severity(),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            PropertyResult::Issue(issue) => Some(&issue.message),
            PropertyResult::Localized(_) => None,
        }
    }

    pub fn as_localized(&self) -> Option<&LocalizedPropertyResult> {
        match self {
            PropertyResult::Localized(localized) => Some(localized),
            PropertyResult::Issue(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyIssue {
    pub property_name: String,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedPropertyResult {
    /// The `*l10n` property holding the localization key.
    pub property_name: String,
    pub l10n_key: String,
    /// One entry per configured culture, keyed by culture id.
    pub cultures: IndexMap<String, CultureLocalization>,
}

impl LocalizedPropertyResult {
    pub fn severity(&self) -> Option<Severity> {
        self.cultures.values().map(|c| c.severity).max()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CultureLocalization {
    pub requested_culture_id: String,
    /// Set when the text came from a different culture than requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_culture_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub severity: Severity,
    pub message: String,
}
