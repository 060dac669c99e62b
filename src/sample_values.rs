//! Representative values used to exercise services without real data.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::args::AnalysisOptions;
use crate::config::ValueHostConfig;
use crate::error::AnalysisError;
use crate::lookup_key::{eq_ignore_case, fold_case};
use crate::services::AnalysisServices;

/// Per-call cache of sample values, keyed by lower-cased lookup key.
///
/// Sources, highest priority first:
/// 1. `valueHostsSampleValues` for the named value host
/// 2. `lookupKeysSampleValues` for the lookup key (case-insensitive)
/// 3. values already found or registered during this call
/// 4. the identifier service's sample for the lookup key
/// 5. the same search for the key's fallback, repeated down the chain
#[derive(Debug, Clone, Default)]
pub struct SampleValues {
    cache: HashMap<String, Value>,
}

impl SampleValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, lookup_key: &str, value: Value) {
        self.cache.insert(fold_case(lookup_key), value);
    }

    /// Returns `Ok(None)` when no source has a value, and
    /// [`AnalysisError::FallbackCycle`] when the fallback chain loops.
    pub fn get(
        &mut self,
        lookup_key: &str,
        value_host_name: Option<&str>,
        options: &AnalysisOptions,
        services: &AnalysisServices,
    ) -> Result<Option<Value>, AnalysisError> {
        let host_sample =
            value_host_name.and_then(|name| options.value_hosts_sample_values.get(name));
        if let Some(value) = host_sample {
            return Ok(Some(value.clone()));
        }

        let mut chain: Vec<String> = Vec::new();
        let mut current = lookup_key.to_string();
        loop {
            if chain.iter().any(|seen| eq_ignore_case(seen, &current)) {
                chain.push(current);
                return Err(AnalysisError::FallbackCycle(chain));
            }
            if let Some(value) = self.lookup_direct(&current, options, services) {
                self.cache.insert(fold_case(lookup_key), value.clone());
                return Ok(Some(value));
            }
            let next = services.fallbacks().find(&current);
            chain.push(current);
            match next {
                Some(fallback) => {
                    debug!(lookup_key, fallback = %fallback, "sample value falls back");
                    current = fallback;
                }
                None => return Ok(None),
            }
        }
    }

    /// A sample for a value host: its own override first, then its data type.
    pub fn for_value_host(
        &mut self,
        value_host: &ValueHostConfig,
        options: &AnalysisOptions,
        services: &AnalysisServices,
    ) -> Result<Option<Value>, AnalysisError> {
        let name = value_host.name();
        if let Some(value) = name.and_then(|n| options.value_hosts_sample_values.get(n)) {
            return Ok(Some(value.clone()));
        }
        match value_host.data_type().map(str::trim).filter(|t| !t.is_empty()) {
            Some(data_type) => self.get(data_type, None, options, services),
            None => Ok(None),
        }
    }

    pub fn input_text(value_host_name: &str, options: &AnalysisOptions) -> Option<String> {
        options
            .input_value_host_sample_values
            .get(value_host_name)
            .map(|value| match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
    }

    fn lookup_direct(
        &self,
        lookup_key: &str,
        options: &AnalysisOptions,
        services: &AnalysisServices,
    ) -> Option<Value> {
        options
            .lookup_keys_sample_values
            .iter()
            .find(|(key, _)| eq_ignore_case(key, lookup_key))
            .map(|(_, value)| value.clone())
            .or_else(|| self.cache.get(&fold_case(lookup_key)).cloned())
            .or_else(|| {
                services
                    .identifiers()
                    .find_by_lookup_key(lookup_key)
                    .and_then(|info| info.sample_value)
            })
    }
}
