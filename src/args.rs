//! Options and the shared context threaded through one analysis.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analyzers::ConfigAnalyzers;
use crate::config::ValueHostConfig;
use crate::error::AnalysisError;
use crate::registry::LookupKeyAnalyzerRegistry;
use crate::results::AnalysisResults;
use crate::sample_values::SampleValues;
use crate::services::AnalysisServices;

/// Default limit on condition nesting.
pub const DEFAULT_MAX_CONDITION_DEPTH: usize = 100;

/// Caller-supplied settings for one analysis.
///
/// Deserializes from the camelCase JSON form used by tooling:
///
/// ```rust
/// use preflight::AnalysisOptions;
/// use serde_json::json;
///
/// let options: AnalysisOptions = serde_json::from_value(json!({
///     "lookupKeysSampleValues": { "Money": 12.5 },
///     "fixUpDataTypes": true
/// })).unwrap();
/// assert!(options.fix_up_data_types);
/// assert_eq!(options.max_condition_depth, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisOptions {
    /// Lookup key to representative value.
    pub lookup_keys_sample_values: IndexMap<String, Value>,
    /// Value host name to representative value. Highest priority.
    pub value_hosts_sample_values: IndexMap<String, Value>,
    /// Value host name to the text a user would type, for exercising parsers.
    pub input_value_host_sample_values: IndexMap<String, Value>,
    /// Assign a data type identified from the sample value to value hosts
    /// that declare none.
    pub fix_up_data_types: bool,
    pub max_condition_depth: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            lookup_keys_sample_values: IndexMap::new(),
            value_hosts_sample_values: IndexMap::new(),
            input_value_host_sample_values: IndexMap::new(),
            fix_up_data_types: false,
            max_condition_depth: DEFAULT_MAX_CONDITION_DEPTH,
        }
    }
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lookup_key_sample(
        mut self,
        lookup_key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.lookup_keys_sample_values
            .insert(lookup_key.into(), value.into());
        self
    }

    pub fn with_value_host_sample(
        mut self,
        value_host_name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.value_hosts_sample_values
            .insert(value_host_name.into(), value.into());
        self
    }

    pub fn with_input_sample(
        mut self,
        value_host_name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.input_value_host_sample_values
            .insert(value_host_name.into(), value.into());
        self
    }

    pub fn with_fix_up_data_types(mut self, enabled: bool) -> Self {
        self.fix_up_data_types = enabled;
        self
    }

    pub fn with_max_condition_depth(mut self, depth: usize) -> Self {
        self.max_condition_depth = depth;
        self
    }
}

/// State shared by every analyzer during one call.
///
/// Built in two phases: the args exist before the node analyzers do, and the
/// analyzers are attached afterwards with [`AnalysisArgs::attach_analyzers`]
/// because each of them needs to reach the others.
pub struct AnalysisArgs {
    services: Arc<AnalysisServices>,
    lookup_key_analyzers: Arc<LookupKeyAnalyzerRegistry>,
    options: AnalysisOptions,
    results: AnalysisResults,
    sample_values: SampleValues,
    analyzers: Option<Arc<ConfigAnalyzers>>,
}

impl AnalysisArgs {
    pub fn new(
        services: Arc<AnalysisServices>,
        lookup_key_analyzers: Arc<LookupKeyAnalyzerRegistry>,
        options: AnalysisOptions,
    ) -> Self {
        Self {
            services,
            lookup_key_analyzers,
            options,
            results: AnalysisResults::default(),
            sample_values: SampleValues::new(),
            analyzers: None,
        }
    }

    pub fn services(&self) -> &AnalysisServices {
        &self.services
    }

    pub fn shared_services(&self) -> Arc<AnalysisServices> {
        Arc::clone(&self.services)
    }

    pub fn lookup_key_analyzers(&self) -> &LookupKeyAnalyzerRegistry {
        &self.lookup_key_analyzers
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    pub fn results(&self) -> &AnalysisResults {
        &self.results
    }

    pub fn results_mut(&mut self) -> &mut AnalysisResults {
        &mut self.results
    }

    pub fn into_results(self) -> AnalysisResults {
        self.results
    }

    pub fn culture_ids(&self) -> &[String] {
        &self.results.culture_ids
    }

    pub fn attach_analyzers(&mut self, analyzers: Arc<ConfigAnalyzers>) {
        self.analyzers = Some(analyzers);
    }

    pub fn analyzers(&self) -> Result<Arc<ConfigAnalyzers>, AnalysisError> {
        self.analyzers
            .clone()
            .ok_or(AnalysisError::AnalyzersNotWired)
    }

    /// A representative value for `lookup_key`; see [`SampleValues::get`].
    pub fn sample_value(
        &mut self,
        lookup_key: &str,
        value_host_name: Option<&str>,
    ) -> Result<Option<Value>, AnalysisError> {
        self.sample_values
            .get(lookup_key, value_host_name, &self.options, &self.services)
    }

    /// A representative value for a value host, through its data type.
    pub fn value_host_sample_value(
        &mut self,
        value_host: &ValueHostConfig,
    ) -> Result<Option<Value>, AnalysisError> {
        self.sample_values
            .for_value_host(value_host, &self.options, &self.services)
    }

    /// Text used to exercise parsers for the named value host.
    pub fn input_sample_value(&self, value_host_name: &str) -> Option<String> {
        SampleValues::input_text(value_host_name, &self.options)
    }

    pub fn register_sample_value(&mut self, lookup_key: &str, value: Value) {
        self.sample_values.register(lookup_key, value);
    }
}
