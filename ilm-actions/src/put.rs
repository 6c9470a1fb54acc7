//! Create or replace a lifecycle policy.

use crate::error::{ActionError, ActionResult};
use crate::service::{check_block, AcknowledgedResponse, LifecycleService};
use chrono::{DateTime, Utc};
use ilm_cluster::{ClusterBlockLevel, ClusterState, ClusterStateUpdateTask, TaskOutcome};
use ilm_metadata::{store_policy, LifecyclePolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::info;

/// Phases a policy may define.
pub const VALID_PHASES: [&str; 5] = ["hot", "warm", "cold", "frozen", "delete"];

const MAX_NAME_BYTES: usize = 255;
const INVALID_NAME_CHARS: [char; 10] = ['\\', '/', '*', '?', '"', '<', '>', '|', ',', '#'];

/// Request to store a policy under its own name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PutLifecycleRequest {
    pub policy: LifecyclePolicy,
    /// Security headers recorded alongside the policy.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack_timeout: Option<Duration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_timeout: Option<Duration>,
}

impl PutLifecycleRequest {
    pub fn new(policy: LifecyclePolicy) -> Self {
        Self {
            policy,
            headers: BTreeMap::new(),
            ack_timeout: None,
            master_timeout: None,
        }
    }

    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
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
        validate_policy_name(&self.policy.name)?;
        for (key, phase) in &self.policy.phases {
            if key != &phase.name {
                return Err(ActionError::Validation(format!(
                    "phase [{key}] is named [{}]",
                    phase.name
                )));
            }
            if !VALID_PHASES.contains(&key.as_str()) {
                return Err(ActionError::Validation(format!(
                    "unsupported phase [{key}], expected one of {VALID_PHASES:?}"
                )));
            }
        }
        Ok(())
    }
}

fn validate_policy_name(name: &str) -> ActionResult<()> {
    let invalid = |reason: &str| -> ActionResult<()> {
        Err(ActionError::Validation(format!(
            "invalid policy name [{name}]: {reason}"
        )))
    };

    if name.is_empty() {
        return invalid("must not be empty");
    }
    if name.starts_with('_') {
        return invalid("must not start with '_'");
    }
    if name.len() > MAX_NAME_BYTES {
        return invalid("must be at most 255 bytes");
    }
    if name.chars().any(char::is_whitespace) {
        return invalid("must not contain whitespace");
    }
    if let Some(c) = name.chars().find(|c| INVALID_NAME_CHARS.contains(c)) {
        return invalid(&format!("must not contain '{c}'"));
    }
    Ok(())
}

struct PutLifecycleTask<'a> {
    request: &'a PutLifecycleRequest,
    now: DateTime<Utc>,
}

impl ClusterStateUpdateTask for PutLifecycleTask<'_> {
    type Error = ActionError;

    fn execute(&self, current: &ClusterState) -> ActionResult<TaskOutcome> {
        let metadata = current.metadata();
        let stored = metadata
            .lifecycle()
            .and_then(|registry| registry.get(&self.request.policy.name));
        if let Some(stored) = stored {
            if stored.policy == self.request.policy && stored.headers == self.request.headers {
                return Ok(TaskOutcome::Unchanged);
            }
        }

        let metadata = store_policy(
            metadata,
            self.request.policy.clone(),
            self.request.headers.clone(),
            self.now,
        );
        Ok(TaskOutcome::Changed(current.to_builder().metadata(metadata)))
    }
}

impl LifecycleService {
    /// Stores a policy, bumping its version if one of the same name exists.
    ///
    /// Storing a policy identical to the one already held publishes nothing
    /// and is reported as acknowledged.
    pub async fn put_policy(
        &self,
        request: PutLifecycleRequest,
    ) -> ActionResult<AcknowledgedResponse> {
        request.validate()?;
        check_block(&self.cluster().state(), ClusterBlockLevel::MetadataWrite)?;

        let source = format!("put-lifecycle-{}", request.policy.name);
        let task = PutLifecycleTask {
            request: &request,
            now: Utc::now(),
        };
        let timeouts = self.timeouts(request.ack_timeout, request.master_timeout);
        let pending = self
            .cluster()
            .submit_state_update_task(&source, &task, timeouts)?;

        let published = pending.published();
        let acknowledged = pending.wait().await.acknowledged();
        info!(policy = %request.policy.name, published, acknowledged, "stored lifecycle policy");

        Ok(AcknowledgedResponse { acknowledged })
    }
}
