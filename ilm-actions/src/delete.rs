//! Delete a lifecycle policy.
//!
//! The delete runs as a cluster state update task. On every attempt it checks,
//! against the state it is about to replace, that no index still references
//! the policy and that the policy exists; only then is the registry rebuilt
//! without it. Index metadata and the operation mode are carried over as is.

use crate::error::{ActionError, ActionResult};
use crate::service::{check_block, AcknowledgedResponse, LifecycleService};
use ilm_cluster::{ClusterBlockLevel, ClusterState, ClusterStateUpdateTask, TaskOutcome};
use ilm_metadata::delete_policy;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Request to delete one lifecycle policy by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteLifecycleRequest {
    pub policy_name: String,
    /// Overrides the configured ack timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack_timeout: Option<Duration>,
    /// Overrides the configured master timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_timeout: Option<Duration>,
}

impl DeleteLifecycleRequest {
    pub fn new(policy_name: impl Into<String>) -> Self {
        Self {
            policy_name: policy_name.into(),
            ack_timeout: None,
            master_timeout: None,
        }
    }

    pub fn with_ack_timeout(mut self, timeout: Duration) -> Self {
        self.ack_timeout = Some(timeout);
        self
    }

    pub fn with_master_timeout(mut self, timeout: Duration) -> Self {
        self.master_timeout = Some(timeout);
        self
    }

    pub fn validate(&self) -> ActionResult<()> {
        if self.policy_name.is_empty() {
            return Err(ActionError::Validation("policy name is missing".into()));
        }
        Ok(())
    }
}

pub type DeleteLifecycleResponse = AcknowledgedResponse;

/// The update task behind [`LifecycleService::delete_policy`].
///
/// Every run checks references and presence against the state it is given,
/// so a run that follows a lost race sees the winner's changes.
pub struct DeleteLifecycleTask<'a> {
    policy: &'a str,
}

impl<'a> DeleteLifecycleTask<'a> {
    pub fn new(policy: &'a str) -> Self {
        Self { policy }
    }
}

impl ClusterStateUpdateTask for DeleteLifecycleTask<'_> {
    type Error = ActionError;

    fn execute(&self, current: &ClusterState) -> ActionResult<TaskOutcome> {
        let metadata = delete_policy(current.metadata(), self.policy)?;
        Ok(TaskOutcome::Changed(current.to_builder().metadata(metadata)))
    }
}

impl LifecycleService {
    /// Deletes a policy and waits for the change to be acknowledged.
    ///
    /// A policy still referenced by an index, or absent from the current
    /// registry, is rejected without publishing anything. An ack timeout is
    /// not an error: the response carries `acknowledged: false` and the
    /// deletion stays committed.
    pub async fn delete_policy(
        &self,
        request: DeleteLifecycleRequest,
    ) -> ActionResult<DeleteLifecycleResponse> {
        request.validate()?;
        check_block(&self.cluster().state(), ClusterBlockLevel::MetadataWrite)?;

        let source = format!("delete-lifecycle-{}", request.policy_name);
        let task = DeleteLifecycleTask::new(&request.policy_name);
        let timeouts = self.timeouts(request.ack_timeout, request.master_timeout);
        let pending = self
            .cluster()
            .submit_state_update_task(&source, &task, timeouts)?;

        let version = pending.version();
        let acknowledged = pending.wait().await.acknowledged();
        info!(policy = %request.policy_name, version, acknowledged, "deleted lifecycle policy");

        Ok(DeleteLifecycleResponse { acknowledged })
    }
}
