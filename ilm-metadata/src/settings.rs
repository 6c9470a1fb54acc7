//! Flat index settings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Setting that names the lifecycle policy an index is managed by.
pub const LIFECYCLE_NAME_SETTING: &str = "index.lifecycle.name";

/// Immutable, key-ordered index settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(BTreeMap<String, String>);

impl Settings {
    /// Empty settings.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starts a builder with no settings.
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// Starts a builder seeded with these settings.
    pub fn to_builder(&self) -> SettingsBuilder {
        SettingsBuilder {
            values: self.0.clone(),
        }
    }

    /// Returns the raw value of a setting.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns the configured lifecycle policy name.
    /// An empty value is treated as unset.
    pub fn lifecycle_name(&self) -> Option<&str> {
        self.get(LIFECYCLE_NAME_SETTING).filter(|name| !name.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates settings in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Settings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Builder for [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct SettingsBuilder {
    values: BTreeMap<String, String>,
}

impl SettingsBuilder {
    /// Sets a value, replacing any previous one.
    pub fn put(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Sets the lifecycle policy reference.
    pub fn lifecycle_name(self, policy: impl Into<String>) -> Self {
        self.put(LIFECYCLE_NAME_SETTING, policy)
    }

    pub fn remove(mut self, key: &str) -> Self {
        self.values.remove(key);
        self
    }

    pub fn build(self) -> Settings {
        Settings(self.values)
    }
}
