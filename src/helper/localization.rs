//! Cross-checking localization keys against every configured culture.

use indexmap::IndexMap;

use crate::results::{CultureLocalization, LocalizedPropertyResult, PropertyResult, Severity};
use crate::services::{LocalizationDetails, LocalizationSource};

use super::AnalysisResultsHelper;

impl AnalysisResultsHelper {
    /// Reports how `l10n_key` resolves in each culture.
    ///
    /// Adds exactly one [`LocalizedPropertyResult`] named `{prefix}l10n`, with
    /// one entry per culture. Does nothing when there is no key.
    pub fn check_localization(
        &self,
        property_prefix: &str,
        l10n_key: Option<&str>,
        fallback_text: Option<&str>,
        properties: &mut Vec<PropertyResult>,
    ) {
        let Some(l10n_key) = l10n_key.map(str::trim).filter(|key| !key.is_empty()) else {
            return;
        };

        let cultures: IndexMap<String, CultureLocalization> = self
            .args()
            .culture_ids()
            .iter()
            .map(|culture_id| {
                let details = self
                    .services()
                    .cultures()
                    .localize_with_details(culture_id, l10n_key, fallback_text);
                (culture_id.clone(), classify(culture_id, l10n_key, details))
            })
            .collect();

        properties.push(PropertyResult::Localized(LocalizedPropertyResult {
            property_name: format!("{property_prefix}l10n"),
            l10n_key: l10n_key.to_string(),
            cultures,
        }));
    }
}

fn classify(culture_id: &str, l10n_key: &str, details: LocalizationDetails) -> CultureLocalization {
    let actual_culture_id = details
        .actual_culture_id
        .filter(|actual| actual != culture_id);
    let (severity, message) = match details.source {
        LocalizationSource::Localized => {
            let text = details.text.as_deref().unwrap_or_default();
            let message = match &actual_culture_id {
                Some(actual) => format!(
                    "Localized text \"{text}\" comes from culture \"{actual}\" because \
                     \"{culture_id}\" has none."
                ),
                None => format!("Localized text \"{text}\"."),
            };
            (Severity::Info, message)
        }
        LocalizationSource::Fallback => (
            Severity::Warning,
            format!(
                "No text for \"{l10n_key}\" in culture \"{culture_id}\". The fallback text \
                 \"{}\" will be used.",
                details.text.as_deref().unwrap_or_default()
            ),
        ),
        LocalizationSource::NotFound => (
            Severity::Error,
            format!(
                "No text for \"{l10n_key}\" in culture \"{culture_id}\" and no fallback text. \
                 Nothing will be shown."
            ),
        ),
    };

    CultureLocalization {
        requested_culture_id: culture_id.to_string(),
        actual_culture_id,
        text: details.text,
        severity,
        message,
    }
}

#[cfg(test)]
mod tests {
    use crate::helper::tests::helper_with;
    use crate::results::{PropertyResult, Severity};
    use crate::services::memory::InMemoryCultures;
    use crate::services::AnalysisServices;

    #[test]
    fn test_each_culture_gets_one_outcome() {
        let cultures = InMemoryCultures::new()
            .with_culture("en")
            .with_regional_culture("en-GB", "en")
            .with_culture("fr")
            .with_culture("de")
            .with_text("en", "Age.Label", "Age")
            .with_text("fr", "Age.Label", "Âge");
        let mut helper = helper_with(AnalysisServices::new().with_cultures(cultures));
        helper.args_mut().results_mut().culture_ids =
            vec!["en".into(), "en-GB".into(), "fr".into(), "de".into()];

        let mut properties = Vec::new();
        helper.check_localization("label", Some("Age.Label"), None, &mut properties);

        assert_eq!(properties.len(), 1);
        let localized = properties[0].as_localized().unwrap();
        assert_eq!(localized.property_name, "labell10n");
        assert_eq!(localized.cultures.len(), 4);
        assert_eq!(localized.cultures["en"].severity, Severity::Info);
        assert_eq!(localized.cultures["en-GB"].actual_culture_id.as_deref(), Some("en"));
        assert_eq!(localized.cultures["fr"].text.as_deref(), Some("Âge"));
        assert_eq!(localized.cultures["de"].severity, Severity::Error);
        assert_eq!(localized.severity(), Some(Severity::Error));
    }

    #[test]
    fn test_fallback_text_is_a_warning() {
        let cultures = InMemoryCultures::new().with_culture("en");
        let mut helper = helper_with(AnalysisServices::new().with_cultures(cultures));
        helper.args_mut().results_mut().culture_ids = vec!["en".into()];

        let mut properties = Vec::new();
        helper.check_localization(
            "errorMessage",
            Some("Required"),
            Some("Required!"),
            &mut properties,
        );

        let entry = &properties[0].as_localized().unwrap().cultures["en"];
        assert_eq!(entry.severity, Severity::Warning);
        assert!(entry.message.contains("\"Required!\""));
    }

    #[test]
    fn test_no_key_is_a_no_op() {
        let helper = helper_with(AnalysisServices::new());
        let mut properties: Vec<PropertyResult> = Vec::new();
        helper.check_localization("label", None, Some("Age"), &mut properties);
        helper.check_localization("label", Some("  "), Some("Age"), &mut properties);
        assert!(properties.is_empty());
    }
}
