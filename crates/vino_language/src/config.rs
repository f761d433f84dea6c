//! Configuration for semantic analysis.
//!
//! Two policies are left to the embedding application: which user-defined
//! persona attributes are accepted, and whether resource attributes must
//! point at real files.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Which identifier-keyed persona attributes are accepted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AttributePolicy {
    /// Any identifier may be used as an attribute key.
    #[default]
    Open,
    /// Only the listed identifiers may be used as attribute keys.
    Restricted(BTreeSet<String>),
}

impl AttributePolicy {
    /// Creates a restricted policy from a list of keys.
    #[must_use]
    pub fn restricted<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Restricted(keys.into_iter().map(Into::into).collect())
    }

    /// Returns true if `key` is an accepted user-defined attribute.
    #[must_use]
    pub fn allows(&self, key: &str) -> bool {
        match self {
            Self::Open => true,
            Self::Restricted(keys) => keys.contains(key),
        }
    }
}

/// How resource attributes are validated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ResourcePolicy {
    /// Resources are opaque strings; only emptiness is checked.
    #[default]
    Opaque,
    /// Resources must name existing filesystem entries.
    Verify {
        /// Directory that relative resource paths are resolved against.
        base_dir: PathBuf,
    },
}

impl ResourcePolicy {
    /// Creates a verifying policy rooted at `base_dir`.
    #[must_use]
    pub fn verify(base_dir: impl Into<PathBuf>) -> Self {
        Self::Verify {
            base_dir: base_dir.into(),
        }
    }

    /// Returns the base directory when resources are verified.
    #[must_use]
    pub fn base_dir(&self) -> Option<&Path> {
        match self {
            Self::Opaque => None,
            Self::Verify { base_dir } => Some(base_dir),
        }
    }
}

/// Configuration for the semantic analyzer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Accepted user-defined persona attributes.
    pub attributes: AttributePolicy,
    /// Resource validation.
    pub resources: ResourcePolicy,
}

impl AnalyzerConfig {
    /// Creates a configuration that verifies resources under `base_dir` and
    /// accepts no user-defined attributes.
    #[must_use]
    pub fn strict(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            attributes: AttributePolicy::Restricted(BTreeSet::new()),
            resources: ResourcePolicy::verify(base_dir),
        }
    }

    /// Builder method to set the attribute policy.
    #[must_use]
    pub fn with_attributes(mut self, attributes: AttributePolicy) -> Self {
        self.attributes = attributes;
        self
    }

    /// Builder method to set the resource policy.
    #[must_use]
    pub fn with_resources(mut self, resources: ResourcePolicy) -> Self {
        self.resources = resources;
        self
    }
}
