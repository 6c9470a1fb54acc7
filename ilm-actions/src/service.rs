//! Entry point shared by every lifecycle action.

use crate::error::ActionResult;
use ilm_cluster::{ClusterBlockLevel, ClusterService, ClusterState, TaskTimeouts};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Response for actions that publish a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcknowledgedResponse {
    /// False when the change was committed but not confirmed cluster-wide
    /// within the ack timeout.
    pub acknowledged: bool,
}

/// Runs lifecycle actions against a cluster service.
#[derive(Clone)]
pub struct LifecycleService {
    cluster: Arc<ClusterService>,
}

impl LifecycleService {
    pub fn new(cluster: Arc<ClusterService>) -> Self {
        Self { cluster }
    }

    pub fn cluster(&self) -> &Arc<ClusterService> {
        &self.cluster
    }

    /// Request timeouts, falling back to the cluster configuration.
    pub(crate) fn timeouts(
        &self,
        ack: Option<Duration>,
        master: Option<Duration>,
    ) -> TaskTimeouts {
        let defaults = self.cluster.default_timeouts();
        TaskTimeouts::new(
            ack.unwrap_or(defaults.ack),
            master.unwrap_or(defaults.master),
        )
    }
}

/// Rejects the request if any global block applies at `level`.
pub(crate) fn check_block(state: &ClusterState, level: ClusterBlockLevel) -> ActionResult<()> {
    match state.blocks().global_blocked_error(level) {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
