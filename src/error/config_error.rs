//! Structural errors found while loading a configuration document.
//!
//! These are distinct from analysis findings: a [`ConfigError`] means the JSON
//! could not be shaped into configuration objects at all, so that part of the
//! tree is never analyzed.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::path::ConfigPath;

/// One structural defect in a configuration document.
///
/// # Example
///
/// ```rust
/// use preflight::{ConfigError, ConfigPath};
///
/// let error = ConfigError::new(ConfigPath::value_host(2), "expected an object")
///     .with_code("not_an_object")
///     .with_got("string");
///
/// assert_eq!(error.code, "not_an_object");
/// assert_eq!(error.to_string(), "valueHostConfigs[2]: expected an object (got: string)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    pub path: ConfigPath,
    pub message: String,
    /// JSON type of the offending value, when relevant.
    pub got: Option<String>,
    /// Machine-readable code such as `not_an_array`.
    pub code: String,
}

impl ConfigError {
    /// Creates an error with the generic `invalid_config` code.
    pub fn new(path: ConfigPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            got: None,
            code: "invalid_config".to_string(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "(root): {}", self.message)?;
        } else {
            write!(f, "{}: {}", self.path, self.message)?;
        }
        if let Some(got) = &self.got {
            write!(f, " (got: {})", got)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigError {}

/// A non-empty set of [`ConfigError`]s.
///
/// Loading never stops at the first defect; every malformed node is reported.
/// Sets combine through [`Semigroup`] so per-node results can be folded
/// together.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigErrors(NonEmptyVec<ConfigError>);

impl ConfigErrors {
    pub fn single(error: ConfigError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Builds a set from a vec, or `None` when the vec is empty.
    pub fn from_vec(errors: Vec<ConfigError>) -> Option<Self> {
        NonEmptyVec::from_vec(errors).map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigError> {
        self.0.iter()
    }

    pub fn first(&self) -> &ConfigError {
        self.0.head()
    }

    /// Errors reported at exactly `path`.
    pub fn at_path(&self, path: &ConfigPath) -> Vec<&ConfigError> {
        self.0.iter().filter(|e| &e.path == path).collect()
    }

    pub fn with_code(&self, code: &str) -> Vec<&ConfigError> {
        self.0.iter().filter(|e| e.code == code).collect()
    }

    pub fn into_vec(self) -> Vec<ConfigError> {
        self.0.into_vec()
    }
}

impl Semigroup for ConfigErrors {
    fn combine(self, other: Self) -> Self {
        ConfigErrors(self.0.combine(other.0))
    }
}

impl Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration has {} structural error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigErrors {}

impl IntoIterator for ConfigErrors {
    type Item = ConfigError;
    type IntoIter = std::vec::IntoIter<ConfigError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}
