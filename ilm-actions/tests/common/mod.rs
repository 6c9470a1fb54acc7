//! Cluster fixtures for lifecycle action tests.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use ilm_actions::{ActionError, LifecycleService};
use ilm_cluster::{
    AckPolicy, ClusterBlocks, ClusterConfig, ClusterService, ClusterState,
    ClusterStateUpdateTask, FollowerBehaviour, InMemoryPublisher, TaskOutcome,
};
use ilm_metadata::{
    store_policy, IndexLifecycleMetadata, IndexMetadata, LifecyclePolicy, Metadata, OperationMode,
    Phase,
};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// A two-phase policy named `name`.
pub fn policy(name: &str) -> LifecyclePolicy {
    let hot = Phase::new("hot", 0).with_action("rollover", json!({"max_age": "7d"}));
    let delete = Phase::new("delete", 30 * DAY_MS).with_action("delete", json!({}));
    LifecyclePolicy::new(name).with_phase(hot).with_phase(delete)
}

/// Metadata holding `policies` and one index per `(index, policy)` pair.
pub fn metadata(policies: &[&str], indices: &[(&str, &str)]) -> Metadata {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut metadata = Metadata::empty();
    for name in policies {
        metadata = store_policy(&metadata, policy(name), BTreeMap::new(), now);
    }
    let mut builder = metadata.to_builder();
    for (index, policy) in indices {
        builder = builder.put_index(IndexMetadata::with_policy(*index, *policy));
    }
    builder.build()
}

/// Same metadata with the registry switched to `mode`.
pub fn with_mode(metadata: &Metadata, mode: OperationMode) -> Metadata {
    let registry = metadata.lifecycle().cloned().unwrap_or_default();
    metadata
        .to_builder()
        .lifecycle(IndexLifecycleMetadata::new(registry.policies().clone(), mode))
        .build()
}

pub fn single_node(metadata: Metadata) -> LifecycleService {
    let state = ClusterState::new(metadata, ClusterBlocks::empty());
    let cluster = ClusterService::single_node(ClusterConfig::default(), state);
    LifecycleService::new(Arc::new(cluster))
}

pub fn with_followers(
    metadata: Metadata,
    behaviours: Vec<FollowerBehaviour>,
) -> (LifecycleService, InMemoryPublisher) {
    let publisher = InMemoryPublisher::with_followers(behaviours);
    let config = ClusterConfig {
        ack_policy: AckPolicy::All,
        ..Default::default()
    };
    let state = ClusterState::new(metadata, ClusterBlocks::empty());
    let cluster = ClusterService::new(config, state, Arc::new(publisher.clone()));
    (LifecycleService::new(Arc::new(cluster)), publisher)
}

/// Registered policy names, in order.
pub fn policy_names(service: &LifecycleService) -> Vec<String> {
    service
        .cluster()
        .state()
        .metadata()
        .lifecycle()
        .map(|r| r.names().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Applies an edit to the index map.
pub struct EditIndices<F>(pub F);

impl<F> ClusterStateUpdateTask for EditIndices<F>
where
    F: Fn(&Metadata) -> Metadata + Send + Sync,
{
    type Error = ActionError;

    fn execute(&self, current: &ClusterState) -> Result<TaskOutcome, ActionError> {
        let metadata = (self.0)(current.metadata());
        Ok(TaskOutcome::Changed(current.to_builder().metadata(metadata)))
    }
}

/// Runs `inner`, and on its first run publishes `rival` before returning, so
/// the compare-and-swap of that first run loses.
pub struct RivalOnFirstRun<'a, T, R> {
    pub cluster: &'a ClusterService,
    pub inner: T,
    pub rival: R,
    runs: AtomicUsize,
}

impl<'a, T, R> RivalOnFirstRun<'a, T, R> {
    pub fn new(cluster: &'a ClusterService, inner: T, rival: R) -> Self {
        Self {
            cluster,
            inner,
            rival,
            runs: AtomicUsize::new(0),
        }
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

impl<T, R> ClusterStateUpdateTask for RivalOnFirstRun<'_, T, R>
where
    T: ClusterStateUpdateTask<Error = ActionError>,
    R: ClusterStateUpdateTask<Error = ActionError>,
{
    type Error = ActionError;

    fn execute(&self, current: &ClusterState) -> Result<TaskOutcome, ActionError> {
        let outcome = self.inner.execute(current)?;
        if self.runs.fetch_add(1, Ordering::SeqCst) == 0 {
            self.cluster
                .submit_state_update_task("rival", &self.rival, self.cluster.default_timeouts())?;
        }
        Ok(outcome)
    }
}
