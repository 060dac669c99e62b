//! The top-level entry point.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::analyzers::{
    ConfigAnalyzer, ConfigAnalyzers, ConfigPropertyAnalyzer, NodeScope, PropertyAnalyzers,
};
use crate::args::{AnalysisArgs, AnalysisOptions};
use crate::config::{ConditionConfig, ConfigObject, ValidatorConfig, ValueHostConfig};
use crate::helper::AnalysisResultsHelper;
use crate::registry::LookupKeyAnalyzerRegistry;
use crate::results::{
    AnalysisResults, ConditionConfigResult, ConfigResult, PropertyResult, Severity,
    ValidatorConfigResult, ValueHostConfigResult,
};
use crate::services::AnalysisServices;

/// Analyzes value host configurations against a set of services.
///
/// One instance can run any number of analyses, in sequence or in parallel;
/// each call builds its own [`AnalysisArgs`] and shares only the services
/// and registries.
///
/// # Example
///
/// ```rust
/// use preflight::{ConfigAnalysis, ValueHostConfig};
///
/// let mut configs = vec![ValueHostConfig::new("Age").with("dataType", "Number")];
/// let results = ConfigAnalysis::new().analyze(&mut configs);
///
/// assert_eq!(results.value_host_names, vec!["Age"]);
/// assert!(results.lookup_key_result("Number").unwrap().used_as_data_type);
/// ```
#[derive(Clone)]
pub struct ConfigAnalysis {
    services: Arc<AnalysisServices>,
    lookup_key_analyzers: Arc<LookupKeyAnalyzerRegistry>,
    options: AnalysisOptions,
    value_host_analyzers: PropertyAnalyzers<ValueHostConfig, ValueHostConfigResult>,
    validator_analyzers: PropertyAnalyzers<ValidatorConfig, ValidatorConfigResult>,
    condition_analyzers: PropertyAnalyzers<ConditionConfig, ConditionConfigResult>,
}

impl ConfigAnalysis {
    /// Empty services, the standard lookup key analyzers and default options.
    pub fn new() -> Self {
        Self::with_services(AnalysisServices::new())
    }

    pub fn with_services(services: AnalysisServices) -> Self {
        Self {
            services: Arc::new(services),
            lookup_key_analyzers: Arc::new(LookupKeyAnalyzerRegistry::standard()),
            options: AnalysisOptions::default(),
            value_host_analyzers: Vec::new(),
            validator_analyzers: Vec::new(),
            condition_analyzers: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_lookup_key_analyzers(mut self, registry: LookupKeyAnalyzerRegistry) -> Self {
        self.lookup_key_analyzers = Arc::new(registry);
        self
    }

    /// Adds a value host rule, run after the built-in ones.
    pub fn with_value_host_analyzer<A>(mut self, analyzer: A) -> Self
    where
        A: ConfigPropertyAnalyzer<ValueHostConfig, ValueHostConfigResult> + 'static,
    {
        self.value_host_analyzers.push(Arc::new(analyzer));
        self
    }

    pub fn with_validator_analyzer<A>(mut self, analyzer: A) -> Self
    where
        A: ConfigPropertyAnalyzer<ValidatorConfig, ValidatorConfigResult> + 'static,
    {
        self.validator_analyzers.push(Arc::new(analyzer));
        self
    }

    pub fn with_condition_analyzer<A>(mut self, analyzer: A) -> Self
    where
        A: ConfigPropertyAnalyzer<ConditionConfig, ConditionConfigResult> + 'static,
    {
        self.condition_analyzers.push(Arc::new(analyzer));
        self
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Runs one analysis.
    ///
    /// `configs` is only written to when `fix_up_data_types` is set, and then
    /// only to add a `dataType` to value hosts that have none.
    pub fn analyze(&self, configs: &mut [ValueHostConfig]) -> AnalysisResults {
        let mut args = AnalysisArgs::new(
            Arc::clone(&self.services),
            Arc::clone(&self.lookup_key_analyzers),
            self.options.clone(),
        );
        args.results_mut().culture_ids = self.services.cultures().available_cultures();
        args.results_mut().value_host_names = configs
            .iter()
            .filter_map(|config| config.name().map(str::to_string))
            .collect();

        let analyzers = Arc::new(ConfigAnalyzers::with_additional(
            self.value_host_analyzers.clone(),
            self.validator_analyzers.clone(),
            self.condition_analyzers.clone(),
        ));
        args.attach_analyzers(Arc::clone(&analyzers));
        let mut helper = AnalysisResultsHelper::new(args);

        let fixed_up = if self.options.fix_up_data_types {
            fix_up_data_types(configs, &mut helper)
        } else {
            Vec::new()
        };

        let mut value_host_results: Vec<ValueHostConfigResult> = Vec::with_capacity(configs.len());
        for (index, config) in configs.iter().enumerate() {
            let scope = NodeScope::value_host(index, config);
            let mut result = analyzers
                .value_host
                .analyze(config, &scope, &value_host_results, &mut helper);
            if let Some((_, data_type)) = fixed_up.iter().find(|(fixed, _)| *fixed == index) {
                result.properties_mut().push(PropertyResult::issue(
                    "dataType",
                    Severity::Info,
                    format!(
                        "dataType was not assigned. It was set to \"{data_type}\" from the \
                         sample value."
                    ),
                ));
            }
            value_host_results.push(result);
        }

        for identifier in self.services.identifiers().get_all() {
            helper.mark_used_as_data_type(&identifier.lookup_key);
        }

        let mut results = helper.into_results();
        results.value_host_results = value_host_results;

        let explorer = results.explorer();
        info!(
            value_hosts = results.value_host_results.len(),
            lookup_keys = results.lookup_key_results.len(),
            errors = explorer.count_by_severity(Severity::Error),
            warnings = explorer.count_by_severity(Severity::Warning),
            "configuration analysis complete"
        );
        results
    }

    /// Analyzes independent configuration sets in parallel.
    ///
    /// Results are in the same order as `config_sets`.
    pub fn analyze_many(&self, config_sets: &mut [Vec<ValueHostConfig>]) -> Vec<AnalysisResults> {
        config_sets
            .par_iter_mut()
            .map(|configs| self.analyze(configs))
            .collect()
    }
}

impl Default for ConfigAnalysis {
    fn default() -> Self {
        Self::new()
    }
}

/// Assigns `dataType` from the identifier service's reading of each untyped
/// value host's sample value. Returns the indexes and types assigned.
fn fix_up_data_types(
    configs: &mut [ValueHostConfig],
    helper: &mut AnalysisResultsHelper,
) -> Vec<(usize, String)> {
    let mut fixed = Vec::new();
    for (index, config) in configs.iter_mut().enumerate() {
        let has_data_type = config
            .data_type()
            .is_some_and(|data_type| !data_type.trim().is_empty());
        if has_data_type {
            continue;
        }
        let Some(name) = config.name() else {
            continue;
        };
        let Some(sample) = helper
            .args()
            .options()
            .value_hosts_sample_values
            .get(name)
            .cloned()
        else {
            continue;
        };
        if let Some(data_type) = helper.services().identifiers().identify(&sample) {
            debug!(value_host = name, %data_type, "assigning data type from sample value");
            config.set("dataType", data_type.clone());
            fixed.push((index, data_type));
        }
    }
    fixed
}
