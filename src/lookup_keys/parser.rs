use crate::args::AnalysisArgs;
use crate::config::ValueHostConfig;
use crate::lookup_key::ServiceName;
use crate::results::{ServiceResult, Severity};

use super::LookupKeyAnalyzer;

/// Checks for a parser of the lookup key in every configured culture.
///
/// Text comes from `inputValueHostSampleValues` for the value host, or is
/// empty. With no cultures configured a single culture-neutral lookup is made.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserLookupKeyAnalyzer;

impl LookupKeyAnalyzer for ParserLookupKeyAnalyzer {
    fn service_name(&self) -> ServiceName {
        ServiceName::Parser
    }

    fn analyze(
        &self,
        lookup_key: &str,
        value_host: Option<&ValueHostConfig>,
        args: &mut AnalysisArgs,
    ) -> ServiceResult {
        let text = value_host
            .and_then(ValueHostConfig::name)
            .and_then(|name| args.input_sample_value(name))
            .unwrap_or_default();
        let cultures = if args.culture_ids().is_empty() {
            vec![String::new()]
        } else {
            args.culture_ids().to_vec()
        };

        let mut implementations: Vec<String> = Vec::new();
        let mut missing: Vec<&str> = Vec::new();
        for culture_id in &cultures {
            match args.services().parsers().find(lookup_key, culture_id, &text) {
                Some(implementation) => {
                    if !implementations.contains(&implementation) {
                        implementations.push(implementation);
                    }
                }
                None => missing.push(culture_id),
            }
        }

        if implementations.is_empty() {
            return ServiceResult::try_fallback(ServiceName::Parser);
        }
        let result = ServiceResult::found(ServiceName::Parser, implementations.join(", "));
        if missing.is_empty() {
            result
        } else {
            result.with_message(
                Severity::Warning,
                format!(
                    "No {} for lookup key \"{}\" in culture(s): {}.",
                    ServiceName::Parser.implementation_class(),
                    lookup_key,
                    missing.join(", ")
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup_keys::tests::args_with;
    use crate::services::memory::InMemoryParsers;
    use crate::services::AnalysisServices;

    #[test]
    fn test_parser_reports_missing_cultures() {
        let services = AnalysisServices::new()
            .with_parsers(InMemoryParsers::new().with_culture("Date", "en", "EnDateParser"));
        let mut args = args_with(services);
        args.results_mut().culture_ids = vec!["en".into(), "fr".into()];

        let result = ParserLookupKeyAnalyzer.analyze("Date", None, &mut args);
        assert_eq!(result.implementation.as_deref(), Some("EnDateParser"));
        assert_eq!(result.severity, Some(Severity::Warning));
        assert!(result.message.unwrap().contains("fr"));
    }

    #[test]
    fn test_parser_without_match_tries_fallback() {
        let mut args = args_with(AnalysisServices::new());
        let result = ParserLookupKeyAnalyzer.analyze("Money", None, &mut args);
        assert!(result.try_fallback);
    }

    #[test]
    fn test_parser_without_cultures_uses_neutral_lookup() {
        let parsers = InMemoryParsers::new().with("Number", "NumberParser");
        let services = AnalysisServices::new().with_parsers(parsers);
        let mut args = args_with(services);
        let result = ParserLookupKeyAnalyzer.analyze("Number", None, &mut args);
        assert_eq!(result.implementation.as_deref(), Some("NumberParser"));
        assert_eq!(result.severity, None);
    }
}
