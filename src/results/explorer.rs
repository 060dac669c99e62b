use crate::lookup_key::{eq_ignore_case, ServiceName};

use super::{
    AnalysisResults, ConditionConfigResult, ConfigFeature, ConfigNodeResult, LookupKeyResult,
    PropertyResult, ServiceResult, Severity, ValueHostConfigResult,
};

/// Criteria for selecting node results. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ResultFilter {
    feature: Option<ConfigFeature>,
    identity: Option<String>,
    property_name: Option<String>,
    min_severity: Option<Severity>,
}

impl ResultFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feature(mut self, feature: ConfigFeature) -> Self {
        self.feature = Some(feature);
        self
    }

    /// Matched case-insensitively.
    pub fn identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn property_name(mut self, property_name: impl Into<String>) -> Self {
        self.property_name = Some(property_name.into());
        self
    }

    pub fn min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = Some(severity);
        self
    }

    fn matches_node(&self, node: &ConfigNodeResult) -> bool {
        if self.feature.is_some_and(|f| f != node.feature) {
            return false;
        }
        if let Some(identity) = &self.identity {
            if !eq_ignore_case(&node.identity, identity) {
                return false;
            }
        }
        if self.property_name.is_none() && self.min_severity.is_none() {
            return true;
        }
        let node_level = self.property_name.is_none()
            && self.severity_passes(node.severity);
        node_level || node.properties.iter().any(|p| self.matches_property(p))
    }

    fn matches_property(&self, property: &PropertyResult) -> bool {
        if let Some(name) = &self.property_name {
            if property.property_name() != name {
                return false;
            }
        }
        self.severity_passes(property.severity())
    }

    fn severity_passes(&self, severity: Option<Severity>) -> bool {
        match self.min_severity {
            None => true,
            Some(min) => severity.is_some_and(|s| s >= min),
        }
    }
}

/// Read-only queries over [`AnalysisResults`].
#[derive(Debug, Clone, Copy)]
pub struct ResultsExplorer<'a> {
    results: &'a AnalysisResults,
}

impl<'a> ResultsExplorer<'a> {
    pub fn new(results: &'a AnalysisResults) -> Self {
        Self { results }
    }

    /// Every node result, depth-first in configuration order.
    pub fn nodes(&self) -> Vec<&'a ConfigNodeResult> {
        let mut nodes = Vec::new();
        for value_host in &self.results.value_host_results {
            collect_value_host(value_host, &mut nodes);
        }
        nodes
    }

    pub fn query_config_results(&self, filter: &ResultFilter) -> Vec<&'a ConfigNodeResult> {
        self.nodes()
            .into_iter()
            .filter(|n| filter.matches_node(n))
            .collect()
    }

    pub fn count_config_results(&self, filter: &ResultFilter) -> usize {
        self.query_config_results(filter).len()
    }

    /// Matching property results paired with the node that holds them.
    pub fn query_property_results(
        &self,
        filter: &ResultFilter,
    ) -> Vec<(&'a ConfigNodeResult, &'a PropertyResult)> {
        self.nodes()
            .into_iter()
            .filter(|n| filter.feature.map_or(true, |f| f == n.feature))
            .filter(|n| {
                filter
                    .identity
                    .as_deref()
                    .map_or(true, |id| eq_ignore_case(&n.identity, id))
            })
            .flat_map(|n| {
                n.properties
                    .iter()
                    .filter(|p| filter.matches_property(p))
                    .map(move |p| (n, p))
            })
            .collect()
    }

    pub fn lookup_key(&self, lookup_key: &str) -> Option<&'a LookupKeyResult> {
        self.results.lookup_key_result(lookup_key)
    }

    pub fn service_result(
        &self,
        lookup_key: &str,
        service_name: ServiceName,
    ) -> Option<&'a ServiceResult> {
        self.lookup_key(lookup_key)?.service_result(service_name)
    }

    /// Number of findings at exactly `severity`, across nodes, properties,
    /// lookup keys and service results.
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        let from_nodes: usize = self
            .nodes()
            .iter()
            .map(|n| {
                let own = usize::from(n.severity == Some(severity));
                own + n
                    .properties
                    .iter()
                    .filter(|p| p.severity() == Some(severity))
                    .count()
            })
            .sum();
        let from_keys: usize = self
            .results
            .lookup_key_results
            .iter()
            .map(|k| {
                usize::from(k.severity == Some(severity))
                    + k.service_results
                        .iter()
                        .filter(|s| s.severity == Some(severity))
                        .count()
            })
            .sum();
        from_nodes + from_keys
    }

    pub fn has_errors(&self) -> bool {
        self.count_by_severity(Severity::Error) > 0
    }
}

fn collect_value_host<'a>(
    value_host: &'a ValueHostConfigResult,
    out: &mut Vec<&'a ConfigNodeResult>,
) {
    out.push(&value_host.node);
    for validator in &value_host.validator_results {
        out.push(&validator.node);
        if let Some(condition) = &validator.condition_result {
            collect_condition(condition, out);
        }
    }
    if let Some(enabler) = &value_host.enabler_condition_result {
        collect_condition(enabler, out);
    }
}

fn collect_condition<'a>(
    condition: &'a ConditionConfigResult,
    out: &mut Vec<&'a ConfigNodeResult>,
) {
    out.push(&condition.node);
    for child in &condition.child_condition_results {
        collect_condition(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::ConfigPath;
    use crate::results::ValidatorConfigResult;

    fn sample_results() -> AnalysisResults {
        let mut host = ValueHostConfigResult::new("Age", ConfigPath::value_host(0));
        host.node.properties.push(PropertyResult::issue(
            "label",
            Severity::Info,
            "Label is empty",
        ));

        let validator_path = ConfigPath::value_host(0)
            .push_property("validatorConfigs")
            .push_index(0);
        let mut validator = ValidatorConfigResult::new("Required", validator_path);
        let mut condition = ConditionConfigResult::new("Require", ConfigPath::root());
        condition.node.properties.push(PropertyResult::issue(
            "valueHostName",
            Severity::Error,
            "ValueHostName does not exist",
        ));
        validator.condition_result = Some(condition);
        host.validator_results.push(validator);

        AnalysisResults {
            culture_ids: vec!["en".into()],
            value_host_names: vec!["Age".into()],
            lookup_key_results: vec![LookupKeyResult::new("Number")],
            value_host_results: vec![host],
        }
    }

    #[test]
    fn test_nodes_are_depth_first() {
        let results = sample_results();
        let features: Vec<_> = results.explorer().nodes().iter().map(|n| n.feature).collect();
        assert_eq!(
            features,
            vec![ConfigFeature::ValueHost, ConfigFeature::Validator, ConfigFeature::Condition]
        );
    }

    #[test]
    fn test_filter_by_min_severity() {
        let results = sample_results();
        let explorer = results.explorer();

        let errors =
            explorer.query_config_results(&ResultFilter::new().min_severity(Severity::Error));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].identity, "Require");

        let any = explorer.count_config_results(&ResultFilter::new().min_severity(Severity::Info));
        assert_eq!(any, 2);
    }

    #[test]
    fn test_filter_by_feature_and_identity() {
        let results = sample_results();
        let filter = ResultFilter::new()
            .feature(ConfigFeature::Validator)
            .identity("required");
        assert_eq!(results.explorer().count_config_results(&filter), 1);
    }

    #[test]
    fn test_property_query_pairs_with_node() {
        let results = sample_results();
        let found = results
            .explorer()
            .query_property_results(&ResultFilter::new().property_name("valueHostName"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0.feature, ConfigFeature::Condition);
    }

    #[test]
    fn test_has_errors() {
        let results = sample_results();
        assert!(results.explorer().has_errors());
        assert_eq!(results.explorer().count_by_severity(Severity::Info), 1);
        assert!(!AnalysisResults::default().explorer().has_errors());
    }

    #[test]
    fn test_lookup_key_is_case_insensitive() {
        let results = sample_results();
        assert!(results.explorer().lookup_key("number").is_some());
        assert!(results.explorer().lookup_key("String").is_none());
    }
}
