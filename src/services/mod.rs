//! Collaborator services consulted during analysis.
//!
//! The analysis never owns these. A host application supplies implementations
//! backed by its real registries; [`memory`] offers table-backed versions for
//! tools and tests.

mod compare;
pub mod memory;

use std::fmt::{self, Display};
use std::sync::Arc;

use serde_json::Value;

use crate::config::ConditionConfig;
use crate::error::{AnalysisError, ComparerError, ServiceError};

pub use compare::{default_compare, ComparisonResult};

/// The broad behavior group a condition belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConditionCategory {
    Require,
    Comparison,
    Contents,
    Children,
    DataTypeCheck,
    Undetermined,
    Other(String),
}

impl ConditionCategory {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Require" => ConditionCategory::Require,
            "Comparison" => ConditionCategory::Comparison,
            "Contents" => ConditionCategory::Contents,
            "Children" => ConditionCategory::Children,
            "DataTypeCheck" => ConditionCategory::DataTypeCheck,
            "Undetermined" => ConditionCategory::Undetermined,
            other => ConditionCategory::Other(other.to_string()),
        }
    }
}

impl Display for ConditionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionCategory::Require => f.write_str("Require"),
            ConditionCategory::Comparison => f.write_str("Comparison"),
            ConditionCategory::Contents => f.write_str("Contents"),
            ConditionCategory::Children => f.write_str("Children"),
            ConditionCategory::DataTypeCheck => f.write_str("DataTypeCheck"),
            ConditionCategory::Undetermined => f.write_str("Undetermined"),
            ConditionCategory::Other(name) => f.write_str(name),
        }
    }
}

/// A condition instance produced by the factory.
pub trait Condition: Send + Sync {
    fn condition_type(&self) -> &str;

    /// Category used when the config does not set one.
    fn category(&self) -> ConditionCategory;
}

pub trait ConditionFactory: Send + Sync {
    fn create(&self, config: &ConditionConfig) -> Result<Box<dyn Condition>, ServiceError>;

    fn can_create(&self, condition_type: &str) -> bool;
}

pub trait ConverterService: Send + Sync {
    /// Finds a converter from `value` (of `source_lookup_key`, when known) to
    /// `result_lookup_key`. Returns the implementation name.
    fn find(
        &self,
        value: &Value,
        source_lookup_key: Option<&str>,
        result_lookup_key: &str,
    ) -> Option<String>;
}

pub trait ComparerService: Send + Sync {
    /// Finds a comparer registered for `lookup_key` that accepts both values.
    fn find(&self, first: &Value, second: &Value, lookup_key: &str) -> Option<String>;

    /// The comparer used when none is registered.
    fn default_compare(
        &self,
        first: &Value,
        second: &Value,
    ) -> Result<ComparisonResult, ComparerError> {
        default_compare(first, second)
    }
}

pub trait ParserService: Send + Sync {
    /// Finds a parser for `lookup_key` in `culture_id` that accepts `text`.
    fn find(&self, lookup_key: &str, culture_id: &str, text: &str) -> Option<String>;
}

pub trait FormatterService: Send + Sync {
    fn find(&self, lookup_key: &str) -> Option<String>;
}

/// A registered data type identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierInfo {
    /// The identifier's canonical lookup key.
    pub lookup_key: String,
    pub implementation: String,
    /// A value the identifier recognizes, used as a default sample value.
    pub sample_value: Option<Value>,
}

pub trait IdentifierService: Send + Sync {
    /// Lookup key of the first identifier that recognizes `value`.
    fn identify(&self, value: &Value) -> Option<String>;

    /// The identifier whose lookup key matches `lookup_key`, ignoring case.
    fn find_by_lookup_key(&self, lookup_key: &str) -> Option<IdentifierInfo>;

    fn get_all(&self) -> Vec<IdentifierInfo>;
}

pub trait LookupKeyFallbackService: Send + Sync {
    /// Whether `lookup_key` is registered, with or without a fallback.
    fn contains(&self, lookup_key: &str) -> bool;

    /// The fallback registered for `lookup_key`.
    fn find(&self, lookup_key: &str) -> Option<String>;

    /// Follows the fallback chain to its last link.
    ///
    /// Returns `lookup_key` itself when it has no fallback, and
    /// [`AnalysisError::FallbackCycle`] when the chain revisits a key.
    fn fallback_to_deepest_match(&self, lookup_key: &str) -> Result<String, AnalysisError> {
        let mut chain = vec![lookup_key.to_string()];
        let mut current = lookup_key.to_string();
        while let Some(next) = self.find(&current) {
            let revisit = chain.iter().any(|seen| seen == &next);
            chain.push(next.clone());
            if revisit {
                return Err(AnalysisError::FallbackCycle(chain));
            }
            current = next;
        }
        Ok(current)
    }
}

/// How a localization request was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalizationSource {
    Localized,
    Fallback,
    NotFound,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalizationDetails {
    pub source: LocalizationSource,
    pub text: Option<String>,
    /// Culture that supplied the text, when it differs from the request this
    /// is a regional fallback (`en-US` served by `en`).
    pub actual_culture_id: Option<String>,
}

pub trait CultureService: Send + Sync {
    fn available_cultures(&self) -> Vec<String>;

    fn localize_with_details(
        &self,
        culture_id: &str,
        l10n_key: &str,
        fallback_text: Option<&str>,
    ) -> LocalizationDetails;
}

/// The collaborators available to one analysis.
///
/// Every slot starts with an empty in-memory implementation, so a host only
/// replaces what it actually registers.
///
/// # Example
///
/// ```rust
/// use preflight::services::memory::{InMemoryConditionFactory, InMemoryFormatters};
/// use preflight::services::{AnalysisServices, ConditionCategory};
///
/// let services = AnalysisServices::new()
///     .with_condition_factory(
///         InMemoryConditionFactory::new().with("EqualTo", ConditionCategory::Comparison),
///     )
///     .with_formatters(InMemoryFormatters::new().with("Number", "NumberFormatter"));
/// assert!(services.condition_factory().can_create("EqualTo"));
/// ```
#[derive(Clone)]
pub struct AnalysisServices {
    condition_factory: Arc<dyn ConditionFactory>,
    converters: Arc<dyn ConverterService>,
    comparers: Arc<dyn ComparerService>,
    parsers: Arc<dyn ParserService>,
    formatters: Arc<dyn FormatterService>,
    identifiers: Arc<dyn IdentifierService>,
    fallbacks: Arc<dyn LookupKeyFallbackService>,
    cultures: Arc<dyn CultureService>,
}

impl AnalysisServices {
    pub fn new() -> Self {
        Self {
            condition_factory: Arc::new(memory::InMemoryConditionFactory::new()),
            converters: Arc::new(memory::InMemoryConverters::new()),
            comparers: Arc::new(memory::InMemoryComparers::new()),
            parsers: Arc::new(memory::InMemoryParsers::new()),
            formatters: Arc::new(memory::InMemoryFormatters::new()),
            identifiers: Arc::new(memory::InMemoryIdentifiers::new()),
            fallbacks: Arc::new(memory::InMemoryFallbacks::new()),
            cultures: Arc::new(memory::InMemoryCultures::new()),
        }
    }

    pub fn with_condition_factory(mut self, factory: impl ConditionFactory + 'static) -> Self {
        self.condition_factory = Arc::new(factory);
        self
    }

    pub fn with_converters(mut self, converters: impl ConverterService + 'static) -> Self {
        self.converters = Arc::new(converters);
        self
    }

    pub fn with_comparers(mut self, comparers: impl ComparerService + 'static) -> Self {
        self.comparers = Arc::new(comparers);
        self
    }

    pub fn with_parsers(mut self, parsers: impl ParserService + 'static) -> Self {
        self.parsers = Arc::new(parsers);
        self
    }

    pub fn with_formatters(mut self, formatters: impl FormatterService + 'static) -> Self {
        self.formatters = Arc::new(formatters);
        self
    }

    pub fn with_identifiers(mut self, identifiers: impl IdentifierService + 'static) -> Self {
        self.identifiers = Arc::new(identifiers);
        self
    }

    pub fn with_fallbacks(mut self, fallbacks: impl LookupKeyFallbackService + 'static) -> Self {
        self.fallbacks = Arc::new(fallbacks);
        self
    }

    pub fn with_cultures(mut self, cultures: impl CultureService + 'static) -> Self {
        self.cultures = Arc::new(cultures);
        self
    }

    pub fn condition_factory(&self) -> &dyn ConditionFactory {
        &*self.condition_factory
    }

    pub fn converters(&self) -> &dyn ConverterService {
        &*self.converters
    }

    pub fn comparers(&self) -> &dyn ComparerService {
        &*self.comparers
    }

    pub fn parsers(&self) -> &dyn ParserService {
        &*self.parsers
    }

    pub fn formatters(&self) -> &dyn FormatterService {
        &*self.formatters
    }

    pub fn identifiers(&self) -> &dyn IdentifierService {
        &*self.identifiers
    }

    pub fn fallbacks(&self) -> &dyn LookupKeyFallbackService {
        &*self.fallbacks
    }

    pub fn cultures(&self) -> &dyn CultureService {
        &*self.cultures
    }
}

impl Default for AnalysisServices {
    fn default() -> Self {
        Self::new()
    }
}
