//! Index metadata, the entities that reference lifecycle policies.

use crate::settings::Settings;
use ilm_types::IndexUuid;
use serde::{Deserialize, Serialize};

/// Metadata for a single index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMetadata {
    /// Index name, unique within a cluster.
    pub name: String,
    /// Identifies this incarnation of the index.
    pub uuid: IndexUuid,
    /// Index-level settings.
    #[serde(default)]
    pub settings: Settings,
}

impl IndexMetadata {
    /// Creates index metadata with a fresh uuid.
    pub fn new(name: impl Into<String>, settings: Settings) -> Self {
        Self {
            name: name.into(),
            uuid: IndexUuid::new(),
            settings,
        }
    }

    /// Index managed by the given lifecycle policy.
    pub fn with_policy(name: impl Into<String>, policy: impl Into<String>) -> Self {
        Self::new(name, Settings::builder().lifecycle_name(policy).build())
    }

    /// The lifecycle policy this index is configured with, if any.
    pub fn lifecycle_policy(&self) -> Option<&str> {
        self.settings.lifecycle_name()
    }
}
