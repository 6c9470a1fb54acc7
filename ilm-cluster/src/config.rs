//! Coordinator configuration.

use crate::ack::AckPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the cluster service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Human-readable name of the local node.
    pub node_name: String,
    /// Upper bound on compare-and-swap attempts for one update task.
    pub max_publish_attempts: u32,
    /// How many members must acknowledge a publication.
    pub ack_policy: AckPolicy,
    /// Default time to wait for acknowledgment (ms).
    pub ack_timeout_ms: u64,
    /// Default time an update task may spend retrying publication (ms).
    pub master_timeout_ms: u64,
}

impl ClusterConfig {
    pub fn ack_timeout(&self) -> Duration {
        Duration::from_millis(self.ack_timeout_ms)
    }

    pub fn master_timeout(&self) -> Duration {
        Duration::from_millis(self.master_timeout_ms)
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            node_name: "ilm-node".to_string(),
            max_publish_attempts: 64,
            ack_policy: AckPolicy::All,
            ack_timeout_ms: 30_000,
            master_timeout_ms: 30_000,
        }
    }
}
