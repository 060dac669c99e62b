//! Per-service analysis of a single canonical lookup key.
//!
//! The results helper calls a [`LookupKeyAnalyzer`] at most once per
//! (lookup key, service) pair and memoizes the [`ServiceResult`].

mod converter;
mod parser;

use crate::args::AnalysisArgs;
use crate::config::ValueHostConfig;
use crate::lookup_key::ServiceName;
use crate::results::ServiceResult;

pub use converter::ConverterLookupKeyAnalyzer;
pub use parser::ParserLookupKeyAnalyzer;

/// Decides whether one service can handle one lookup key.
///
/// Return [`ServiceResult::try_fallback`] when nothing matches this exact key
/// but a broader key might; the helper then walks the fallback chain.
pub trait LookupKeyAnalyzer: Send + Sync {
    fn service_name(&self) -> ServiceName;

    /// `value_host` is the value host whose configuration led to this key,
    /// when there is one.
    fn analyze(
        &self,
        lookup_key: &str,
        value_host: Option<&ValueHostConfig>,
        args: &mut AnalysisArgs,
    ) -> ServiceResult;
}

/// Looks the key up in the formatter service.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatterLookupKeyAnalyzer;

impl LookupKeyAnalyzer for FormatterLookupKeyAnalyzer {
    fn service_name(&self) -> ServiceName {
        ServiceName::Formatter
    }

    fn analyze(
        &self,
        lookup_key: &str,
        _value_host: Option<&ValueHostConfig>,
        args: &mut AnalysisArgs,
    ) -> ServiceResult {
        match args.services().formatters().find(lookup_key) {
            Some(implementation) => ServiceResult::found(ServiceName::Formatter, implementation),
            None => ServiceResult::try_fallback(ServiceName::Formatter),
        }
    }
}

/// Looks the key up in the identifier service.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierLookupKeyAnalyzer;

impl LookupKeyAnalyzer for IdentifierLookupKeyAnalyzer {
    fn service_name(&self) -> ServiceName {
        ServiceName::Identifier
    }

    fn analyze(
        &self,
        lookup_key: &str,
        _value_host: Option<&ValueHostConfig>,
        args: &mut AnalysisArgs,
    ) -> ServiceResult {
        match args.services().identifiers().find_by_lookup_key(lookup_key) {
            Some(info) => ServiceResult::found(ServiceName::Identifier, info.implementation),
            None => ServiceResult::try_fallback(ServiceName::Identifier),
        }
    }
}
