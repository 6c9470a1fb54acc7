//! Lifecycle policies and the policy registry.
//!
//! The registry ([`IndexLifecycleMetadata`]) is an immutable value. Edits go
//! through [`crate::mutate`] and always produce a fresh registry, so a reader
//! holding the previous one never observes a change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Whether lifecycle execution is running across the cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationMode {
    #[default]
    Running,
    Stopping,
    Stopped,
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Running => "RUNNING",
            Self::Stopping => "STOPPING",
            Self::Stopped => "STOPPED",
        };
        f.write_str(s)
    }
}

/// A named step of a policy, entered once an index reaches `min_age_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    #[serde(default)]
    pub min_age_ms: u64,
    /// Action name to action configuration.
    #[serde(default)]
    pub actions: BTreeMap<String, serde_json::Value>,
}

impl Phase {
    pub fn new(name: impl Into<String>, min_age_ms: u64) -> Self {
        Self {
            name: name.into(),
            min_age_ms,
            actions: BTreeMap::new(),
        }
    }

    /// Adds an action to the phase.
    pub fn with_action(mut self, action: impl Into<String>, config: serde_json::Value) -> Self {
        self.actions.insert(action.into(), config);
        self
    }
}

/// A lifecycle policy definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecyclePolicy {
    pub name: String,
    #[serde(default)]
    pub phases: BTreeMap<String, Phase>,
}

impl LifecyclePolicy {
    /// Creates a policy with no phases.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phases: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) a phase, keyed by its name.
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phases.insert(phase.name.clone(), phase);
        self
    }
}

/// A stored policy plus the bookkeeping the registry keeps for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecyclePolicyMetadata {
    pub policy: LifecyclePolicy,
    /// Security headers captured when the policy was stored.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Bumped on every put of the same policy name, starting at 1.
    pub version: u64,
    pub modified_date: DateTime<Utc>,
}

impl LifecyclePolicyMetadata {
    pub fn name(&self) -> &str {
        &self.policy.name
    }
}

/// The policy registry: policy name to stored policy, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexLifecycleMetadata {
    policies: BTreeMap<String, LifecyclePolicyMetadata>,
    #[serde(default)]
    operation_mode: OperationMode,
}

impl IndexLifecycleMetadata {
    /// Key under which the registry is stored in cluster metadata.
    pub const TYPE: &'static str = "index_lifecycle";

    pub fn new(
        policies: BTreeMap<String, LifecyclePolicyMetadata>,
        operation_mode: OperationMode,
    ) -> Self {
        Self {
            policies,
            operation_mode,
        }
    }

    /// An empty registry in `Running` mode.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn policies(&self) -> &BTreeMap<String, LifecyclePolicyMetadata> {
        &self.policies
    }

    pub fn get(&self, name: &str) -> Option<&LifecyclePolicyMetadata> {
        self.policies.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.policies.contains_key(name)
    }

    /// Policy names in key order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.policies.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    pub fn operation_mode(&self) -> OperationMode {
        self.operation_mode
    }
}
