//! Table-backed service implementations.
//!
//! Each type is filled through `with*` builder calls and is immutable after
//! that, so it can be shared across parallel analyses.

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::ConditionConfig;
use crate::error::ServiceError;
use crate::lookup_key::eq_ignore_case;

use super::{
    ComparerService, Condition, ConditionCategory, ConditionFactory, ConverterService,
    CultureService, FormatterService, IdentifierInfo, IdentifierService, LocalizationDetails,
    LocalizationSource, LookupKeyFallbackService, ParserService,
};

/// Condition factory over a table of condition types and default categories.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConditionFactory {
    types: IndexMap<String, ConditionCategory>,
}

impl InMemoryConditionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, condition_type: impl Into<String>, category: ConditionCategory) -> Self {
        self.types.insert(condition_type.into(), category);
        self
    }
}

struct TableCondition {
    condition_type: String,
    category: ConditionCategory,
}

impl Condition for TableCondition {
    fn condition_type(&self) -> &str {
        &self.condition_type
    }

    fn category(&self) -> ConditionCategory {
        self.category.clone()
    }
}

impl ConditionFactory for InMemoryConditionFactory {
    fn create(&self, config: &ConditionConfig) -> Result<Box<dyn Condition>, ServiceError> {
        let condition_type = config
            .condition_type()
            .ok_or(ServiceError::MissingConditionType)?;
        let category = self
            .types
            .get(condition_type)
            .ok_or_else(|| ServiceError::UnknownConditionType(condition_type.to_string()))?;
        Ok(Box::new(TableCondition {
            condition_type: condition_type.to_string(),
            category: category.clone(),
        }))
    }

    fn can_create(&self, condition_type: &str) -> bool {
        self.types.contains_key(condition_type)
    }
}

#[derive(Debug, Clone)]
struct ConverterEntry {
    source_lookup_key: Option<String>,
    result_lookup_key: String,
    implementation: String,
}

/// Converters keyed by result lookup key and, optionally, source lookup key.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConverters {
    entries: Vec<ConverterEntry>,
}

impl InMemoryConverters {
    pub fn new() -> Self {
        Self::default()
    }

    /// A converter producing `result_lookup_key` from any source.
    pub fn with(
        self,
        result_lookup_key: impl Into<String>,
        implementation: impl Into<String>,
    ) -> Self {
        self.push(None, result_lookup_key.into(), implementation.into())
    }

    /// A converter limited to values of `source_lookup_key`.
    pub fn with_source(
        self,
        source_lookup_key: impl Into<String>,
        result_lookup_key: impl Into<String>,
        implementation: impl Into<String>,
    ) -> Self {
        self.push(
            Some(source_lookup_key.into()),
            result_lookup_key.into(),
            implementation.into(),
        )
    }

    fn push(
        mut self,
        source_lookup_key: Option<String>,
        result_lookup_key: String,
        implementation: String,
    ) -> Self {
        self.entries.push(ConverterEntry {
            source_lookup_key,
            result_lookup_key,
            implementation,
        });
        self
    }
}

impl ConverterService for InMemoryConverters {
    fn find(
        &self,
        _value: &Value,
        source_lookup_key: Option<&str>,
        result_lookup_key: &str,
    ) -> Option<String> {
        self.entries
            .iter()
            .find(|entry| {
                entry.result_lookup_key == result_lookup_key
                    && match (&entry.source_lookup_key, source_lookup_key) {
                        (None, _) => true,
                        (Some(expected), Some(actual)) => expected == actual,
                        (Some(_), None) => false,
                    }
            })
            .map(|entry| entry.implementation.clone())
    }
}

/// Comparers keyed by lookup key. Values are not inspected.
#[derive(Debug, Clone, Default)]
pub struct InMemoryComparers {
    comparers: IndexMap<String, String>,
}

impl InMemoryComparers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        lookup_key: impl Into<String>,
        implementation: impl Into<String>,
    ) -> Self {
        self.comparers.insert(lookup_key.into(), implementation.into());
        self
    }
}

impl ComparerService for InMemoryComparers {
    fn find(&self, _first: &Value, _second: &Value, lookup_key: &str) -> Option<String> {
        self.comparers.get(lookup_key).cloned()
    }
}

#[derive(Debug, Clone)]
struct ParserEntry {
    lookup_key: String,
    culture_id: Option<String>,
    implementation: String,
}

/// Parsers keyed by lookup key, optionally limited to one culture.
#[derive(Debug, Clone, Default)]
pub struct InMemoryParsers {
    entries: Vec<ParserEntry>,
}

impl InMemoryParsers {
    pub fn new() -> Self {
        Self::default()
    }

    /// A parser for every culture.
    pub fn with(
        mut self,
        lookup_key: impl Into<String>,
        implementation: impl Into<String>,
    ) -> Self {
        self.entries.push(ParserEntry {
            lookup_key: lookup_key.into(),
            culture_id: None,
            implementation: implementation.into(),
        });
        self
    }

    pub fn with_culture(
        mut self,
        lookup_key: impl Into<String>,
        culture_id: impl Into<String>,
        implementation: impl Into<String>,
    ) -> Self {
        self.entries.push(ParserEntry {
            lookup_key: lookup_key.into(),
            culture_id: Some(culture_id.into()),
            implementation: implementation.into(),
        });
        self
    }
}

impl ParserService for InMemoryParsers {
    fn find(&self, lookup_key: &str, culture_id: &str, _text: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|entry| {
                entry.lookup_key == lookup_key
                    && entry.culture_id.as_deref().map_or(true, |culture| culture == culture_id)
            })
            .map(|entry| entry.implementation.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryFormatters {
    formatters: IndexMap<String, String>,
}

impl InMemoryFormatters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        lookup_key: impl Into<String>,
        implementation: impl Into<String>,
    ) -> Self {
        self.formatters.insert(lookup_key.into(), implementation.into());
        self
    }
}

impl FormatterService for InMemoryFormatters {
    fn find(&self, lookup_key: &str) -> Option<String> {
        self.formatters.get(lookup_key).cloned()
    }
}

#[derive(Clone)]
struct IdentifierEntry {
    info: IdentifierInfo,
    recognizes: fn(&Value) -> bool,
}

/// Identifiers that recognize values through a predicate.
#[derive(Clone, Default)]
pub struct InMemoryIdentifiers {
    entries: Vec<IdentifierEntry>,
}

impl InMemoryIdentifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Number`, `String` and `Boolean` identifiers matching the JSON kinds.
    pub fn standard() -> Self {
        Self::new()
            .with("Number", "NumberIdentifier", Some(Value::from(1)), Value::is_number)
            .with("String", "StringIdentifier", Some(Value::from("sample")), Value::is_string)
            .with("Boolean", "BooleanIdentifier", Some(Value::from(true)), Value::is_boolean)
    }

    pub fn with(
        mut self,
        lookup_key: impl Into<String>,
        implementation: impl Into<String>,
        sample_value: Option<Value>,
        recognizes: fn(&Value) -> bool,
    ) -> Self {
        self.entries.push(IdentifierEntry {
            info: IdentifierInfo {
                lookup_key: lookup_key.into(),
                implementation: implementation.into(),
                sample_value,
            },
            recognizes,
        });
        self
    }
}

impl IdentifierService for InMemoryIdentifiers {
    fn identify(&self, value: &Value) -> Option<String> {
        self.entries
            .iter()
            .find(|entry| (entry.recognizes)(value))
            .map(|entry| entry.info.lookup_key.clone())
    }

    fn find_by_lookup_key(&self, lookup_key: &str) -> Option<IdentifierInfo> {
        self.entries
            .iter()
            .find(|entry| eq_ignore_case(&entry.info.lookup_key, lookup_key))
            .map(|entry| entry.info.clone())
    }

    fn get_all(&self) -> Vec<IdentifierInfo> {
        self.entries.iter().map(|entry| entry.info.clone()).collect()
    }
}

/// Lookup keys with their fallback keys.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFallbacks {
    fallbacks: IndexMap<String, Option<String>>,
}

impl InMemoryFallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, lookup_key: impl Into<String>, fallback: impl Into<String>) -> Self {
        self.fallbacks.insert(lookup_key.into(), Some(fallback.into()));
        self
    }

    /// Registers a key that has no fallback of its own.
    pub fn with_root(mut self, lookup_key: impl Into<String>) -> Self {
        self.fallbacks.insert(lookup_key.into(), None);
        self
    }
}

impl LookupKeyFallbackService for InMemoryFallbacks {
    fn contains(&self, lookup_key: &str) -> bool {
        self.fallbacks.contains_key(lookup_key)
    }

    fn find(&self, lookup_key: &str) -> Option<String> {
        self.fallbacks.get(lookup_key).cloned().flatten()
    }
}

/// Cultures with optional parent cultures and a translation table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCultures {
    cultures: IndexMap<String, Option<String>>,
    texts: IndexMap<(String, String), String>,
}

impl InMemoryCultures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_culture(mut self, culture_id: impl Into<String>) -> Self {
        self.cultures.insert(culture_id.into(), None);
        self
    }

    /// A regional culture that borrows missing texts from `parent_id`.
    pub fn with_regional_culture(
        mut self,
        culture_id: impl Into<String>,
        parent_id: impl Into<String>,
    ) -> Self {
        self.cultures.insert(culture_id.into(), Some(parent_id.into()));
        self
    }

    pub fn with_text(
        mut self,
        culture_id: impl Into<String>,
        l10n_key: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.texts
            .insert((culture_id.into(), l10n_key.into()), text.into());
        self
    }

    fn lookup(&self, culture_id: &str, l10n_key: &str) -> Option<(String, String)> {
        let mut current = Some(culture_id.to_string());
        let mut visited = Vec::new();
        while let Some(culture) = current {
            if visited.contains(&culture) {
                break;
            }
            if let Some(text) = self.texts.get(&(culture.clone(), l10n_key.to_string())) {
                return Some((culture, text.clone()));
            }
            current = self.cultures.get(&culture).cloned().flatten();
            visited.push(culture);
        }
        None
    }
}

impl CultureService for InMemoryCultures {
    fn available_cultures(&self) -> Vec<String> {
        self.cultures.keys().cloned().collect()
    }

    fn localize_with_details(
        &self,
        culture_id: &str,
        l10n_key: &str,
        fallback_text: Option<&str>,
    ) -> LocalizationDetails {
        if let Some((actual, text)) = self.lookup(culture_id, l10n_key) {
            return LocalizationDetails {
                source: LocalizationSource::Localized,
                text: Some(text),
                actual_culture_id: Some(actual),
            };
        }
        match fallback_text {
            Some(text) => LocalizationDetails {
                source: LocalizationSource::Fallback,
                text: Some(text.to_string()),
                actual_culture_id: None,
            },
            None => LocalizationDetails {
                source: LocalizationSource::NotFound,
                text: None,
                actual_culture_id: None,
            },
        }
    }
}
