//! The accumulated outcome of an analysis run.

mod explorer;
mod lookup_key;
mod node;
mod property;
mod severity;

use serde::Serialize;
use serde_json::Value;

use crate::lookup_key::eq_ignore_case;

pub use explorer::{ResultFilter, ResultsExplorer};
pub use lookup_key::{LookupKeyResult, ServiceResult};
pub use node::{
    ConditionConfigResult, ConfigFeature, ConfigNodeResult, ConfigResult, ValidatorConfigResult,
    ValueHostConfigResult, MISSING_IDENTITY, UNKNOWN_IDENTITY,
};
pub use property::{CultureLocalization, LocalizedPropertyResult, PropertyIssue, PropertyResult};
pub use severity::Severity;

/// Everything an analysis run produced.
///
/// `lookup_key_results` holds exactly one entry per canonical lookup key;
/// `value_host_results` mirrors the input value host order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResults {
    pub culture_ids: Vec<String>,
    pub value_host_names: Vec<String>,
    pub lookup_key_results: Vec<LookupKeyResult>,
    pub value_host_results: Vec<ValueHostConfigResult>,
}

impl AnalysisResults {
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn explorer(&self) -> ResultsExplorer<'_> {
        ResultsExplorer::new(self)
    }

    /// Case-insensitive lookup of a lookup key result.
    pub fn lookup_key_result(&self, lookup_key: &str) -> Option<&LookupKeyResult> {
        self.lookup_key_results
            .iter()
            .find(|r| eq_ignore_case(&r.lookup_key, lookup_key))
    }
}
