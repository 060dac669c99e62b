//! Registry of per-service lookup key analyzers.
//!
//! The results helper asks this registry which [`LookupKeyAnalyzer`] answers
//! for a [`ServiceName`]. A host may replace the built-in set entirely by
//! starting from [`LookupKeyAnalyzerRegistry::new`].

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::lookup_key::ServiceName;
use crate::lookup_keys::{
    ConverterLookupKeyAnalyzer, FormatterLookupKeyAnalyzer, IdentifierLookupKeyAnalyzer,
    LookupKeyAnalyzer, ParserLookupKeyAnalyzer,
};

type AnalyzerMap = Arc<RwLock<HashMap<ServiceName, Arc<dyn LookupKeyAnalyzer>>>>;

/// A thread-safe map from service name to the analyzer for that service.
///
/// The map is behind `Arc<RwLock<...>>`, so clones share registrations and
/// parallel analyses can read it concurrently.
///
/// # Example
///
/// ```rust
/// use preflight::lookup_key::ServiceName;
/// use preflight::lookup_keys::FormatterLookupKeyAnalyzer;
/// use preflight::LookupKeyAnalyzerRegistry;
///
/// let registry = LookupKeyAnalyzerRegistry::new();
/// registry.register(FormatterLookupKeyAnalyzer).unwrap();
///
/// assert!(registry.get(ServiceName::Formatter).is_some());
/// assert!(registry.get(ServiceName::Parser).is_none());
///
/// // Only one analyzer per service
/// assert!(registry.register(FormatterLookupKeyAnalyzer).is_err());
/// ```
pub struct LookupKeyAnalyzerRegistry {
    analyzers: AnalyzerMap,
}

impl LookupKeyAnalyzerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            analyzers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Converter, parser, formatter and identifier analyzers.
    ///
    /// Comparers are resolved by the condition comparer analyzer rather than
    /// through this registry.
    pub fn standard() -> Self {
        let mut analyzers: HashMap<ServiceName, Arc<dyn LookupKeyAnalyzer>> = HashMap::new();
        analyzers.insert(ServiceName::Converter, Arc::new(ConverterLookupKeyAnalyzer));
        analyzers.insert(ServiceName::Parser, Arc::new(ParserLookupKeyAnalyzer));
        analyzers.insert(ServiceName::Formatter, Arc::new(FormatterLookupKeyAnalyzer));
        analyzers.insert(ServiceName::Identifier, Arc::new(IdentifierLookupKeyAnalyzer));
        Self {
            analyzers: Arc::new(RwLock::new(analyzers)),
        }
    }

    /// Registers `analyzer` under its own service name.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateService` if that service already has
    /// an analyzer.
    pub fn register<A>(&self, analyzer: A) -> Result<(), RegistryError>
    where
        A: LookupKeyAnalyzer + 'static,
    {
        let service_name = analyzer.service_name();
        let mut analyzers = self.analyzers.write();

        if analyzers.contains_key(&service_name) {
            return Err(RegistryError::DuplicateService(service_name));
        }

        analyzers.insert(service_name, Arc::new(analyzer));
        Ok(())
    }

    /// Registers `analyzer`, replacing any analyzer for the same service.
    pub fn replace<A>(&self, analyzer: A) -> Option<Arc<dyn LookupKeyAnalyzer>>
    where
        A: LookupKeyAnalyzer + 'static,
    {
        let service_name = analyzer.service_name();
        self.analyzers
            .write()
            .insert(service_name, Arc::new(analyzer))
    }

    pub fn get(&self, service_name: ServiceName) -> Option<Arc<dyn LookupKeyAnalyzer>> {
        self.analyzers.read().get(&service_name).cloned()
    }

    pub fn contains(&self, service_name: ServiceName) -> bool {
        self.analyzers.read().contains_key(&service_name)
    }

    /// Registered service names, sorted.
    pub fn service_names(&self) -> Vec<ServiceName> {
        let mut names: Vec<_> = self.analyzers.read().keys().copied().collect();
        names.sort();
        names
    }
}

impl Default for LookupKeyAnalyzerRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl Clone for LookupKeyAnalyzerRegistry {
    fn clone(&self) -> Self {
        Self {
            analyzers: Arc::clone(&self.analyzers),
        }
    }
}
