use serde_json::Value;

use crate::args::AnalysisArgs;
use crate::config::ValueHostConfig;
use crate::lookup_key::ServiceName;
use crate::results::{ServiceResult, Severity};

use super::LookupKeyAnalyzer;

/// Checks for a converter producing the lookup key from the value host's
/// sample value and data type.
///
/// Converters are matched exactly; there is no fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConverterLookupKeyAnalyzer;

impl LookupKeyAnalyzer for ConverterLookupKeyAnalyzer {
    fn service_name(&self) -> ServiceName {
        ServiceName::Converter
    }

    fn analyze(
        &self,
        lookup_key: &str,
        value_host: Option<&ValueHostConfig>,
        args: &mut AnalysisArgs,
    ) -> ServiceResult {
        let (sample, source_lookup_key) = match value_host {
            Some(host) => (
                args.value_host_sample_value(host),
                host.data_type().map(str::trim).filter(|key| !key.is_empty()),
            ),
            None => (Ok(None), None),
        };
        let sample = match sample {
            Ok(sample) => sample.unwrap_or(Value::Null),
            Err(error) => {
                return ServiceResult::not_found(ServiceName::Converter)
                    .with_message(Severity::Error, error.to_string())
            }
        };

        match args
            .services()
            .converters()
            .find(&sample, source_lookup_key, lookup_key)
        {
            Some(implementation) => ServiceResult::found(ServiceName::Converter, implementation),
            None => ServiceResult::not_found(ServiceName::Converter),
        }
    }
}
