//! Locations inside a configuration tree.
//!
//! Every node result and every configuration loading error carries a
//! [`ConfigPath`] such as `valueHostConfigs[0].validatorConfigs[1].conditionConfig`
//! so a report can point at the exact object that needs fixing.

use std::fmt::{self, Display};

use serde::{Serialize, Serializer};

/// One step in a [`ConfigPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named property such as `validatorConfigs` or `conditionConfig`.
    Property(String),
    /// A position in an array property.
    Index(usize),
}

/// Path from the configuration root to one node or property.
///
/// Paths are immutable; `push_*` returns a new path so sibling branches can
/// share a common prefix.
///
/// # Example
///
/// ```rust
/// use preflight::ConfigPath;
///
/// let path = ConfigPath::root()
///     .push_property("valueHostConfigs")
///     .push_index(0)
///     .push_property("enablerConfig");
///
/// assert_eq!(path.to_string(), "valueHostConfigs[0].enablerConfig");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ConfigPath {
    segments: Vec<PathSegment>,
}

impl ConfigPath {
    /// The empty path, naming the configuration document itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of the value host config at `index` in the root list.
    pub fn value_host(index: usize) -> Self {
        Self::root()
            .push_property("valueHostConfigs")
            .push_index(index)
    }

    pub fn push_property(&self, name: impl Into<String>) -> Self {
        self.with(PathSegment::Property(name.into()))
    }

    pub fn push_index(&self, index: usize) -> Self {
        self.with(PathSegment::Index(index))
    }

    fn with(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment);
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// The enclosing path, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.to_vec(),
        })
    }

    /// The last property name on the path, skipping trailing indexes.
    pub fn last_property(&self) -> Option<&str> {
        self.segments.iter().rev().find_map(|segment| match segment {
            PathSegment::Property(name) => Some(name.as_str()),
            PathSegment::Index(_) => None,
        })
    }

    /// True if `self` is `other` or lies beneath it.
    pub fn starts_with(&self, other: &ConfigPath) -> bool {
        self.segments.starts_with(&other.segments)
    }
}

impl Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Property(name) if i == 0 => f.write_str(name)?,
                PathSegment::Property(name) => write!(f, ".{}", name)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl Serialize for ConfigPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
