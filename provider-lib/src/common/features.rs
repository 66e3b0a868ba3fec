//! Build-time optional capabilities.
//!
//! Translators never consult global state to learn what this binary can do.
//! A [`FeatureRegistry`] is handed to them at construction instead, which is
//! usually [`BuildFeatures`] in production and a [`FeatureSet`] (or a mock)
//! when the caller wants to pin the answer.

use std::{collections::HashSet, sync::Arc};

use crate::Error;

pub type ThreadSafeFeatureRegistry = Arc<dyn FeatureRegistry>;

#[cfg_attr(test, mockall::automock)]
pub trait FeatureRegistry: Send + Sync {
    fn is_feature_enabled(&self, name: &str) -> bool;
}

/// A capability that only exists when the matching cargo feature is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatedFeature {
    /// Registry key.
    pub name: &'static str,
    /// Human readable name used in error messages.
    pub description: &'static str,
    /// Cargo feature that compiles it in.
    pub flag: &'static str,
}

pub const CLIENT_HELLO_IMPERSONATION: GatedFeature = GatedFeature {
    name: "client-hello-impersonation",
    description: "client-hello impersonation (uTLS)",
    flag: "utls",
};

impl GatedFeature {
    pub fn ensure(&self, registry: &dyn FeatureRegistry) -> Result<(), Error> {
        if registry.is_feature_enabled(self.name) {
            Ok(())
        } else {
            Err(Error::MissingBuildFeature {
                feature: self.description,
                flag: self.flag,
            })
        }
    }
}

/// Reports the cargo features this crate was compiled with.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildFeatures;

impl FeatureRegistry for BuildFeatures {
    fn is_feature_enabled(&self, name: &str) -> bool {
        name == CLIENT_HELLO_IMPERSONATION.name && cfg!(feature = "utls")
    }
}

/// An explicit list of enabled features.
#[derive(Debug, Default, Clone)]
pub struct FeatureSet {
    enabled: HashSet<String>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(mut self, name: impl Into<String>) -> Self {
        self.enabled.insert(name.into());
        self
    }
}

impl<S: Into<String>> FromIterator<S> for FeatureSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            enabled: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl FeatureRegistry for FeatureSet {
    fn is_feature_enabled(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }
}
