//! Shared update tasks for cluster service tests.

#![allow(dead_code)]

use ilm_cluster::{
    ClusterError, ClusterService, ClusterState, ClusterStateUpdateTask, TaskOutcome,
};
use ilm_metadata::{IndexMetadata, Settings};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum TestTaskError {
    #[error(transparent)]
    Cluster(#[from] ClusterError),
    #[error("rejected: {0}")]
    Rejected(String),
}

/// Adds an index; rejects if it already exists.
pub struct PutIndex {
    pub name: String,
    pub executions: AtomicUsize,
}

impl PutIndex {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            executions: AtomicUsize::new(0),
        }
    }

    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

impl ClusterStateUpdateTask for PutIndex {
    type Error = TestTaskError;

    fn execute(&self, current: &ClusterState) -> Result<TaskOutcome, TestTaskError> {
        self.executions.fetch_add(1, Ordering::SeqCst);
        if current.metadata().index(&self.name).is_some() {
            return Err(TestTaskError::Rejected(self.name.clone()));
        }
        let metadata = current
            .metadata()
            .to_builder()
            .put_index(IndexMetadata::new(self.name.clone(), Settings::empty()))
            .build();
        Ok(TaskOutcome::Changed(current.to_builder().metadata(metadata)))
    }
}

/// Sneaks another publication in during the first `interferences` executions,
/// so the wrapped task's compare-and-swap loses.
pub struct Interfering {
    pub service: Arc<ClusterService>,
    pub inner: PutIndex,
    pub interferences: usize,
    counter: AtomicUsize,
}

impl Interfering {
    pub fn new(service: Arc<ClusterService>, inner: PutIndex, interferences: usize) -> Self {
        Self {
            service,
            inner,
            interferences,
            counter: AtomicUsize::new(0),
        }
    }
}

impl ClusterStateUpdateTask for Interfering {
    type Error = TestTaskError;

    fn execute(&self, current: &ClusterState) -> Result<TaskOutcome, TestTaskError> {
        let outcome = self.inner.execute(current)?;
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        if n < self.interferences {
            let rival = PutIndex::new(&format!("rival-{n}"));
            self.service
                .submit_state_update_task("rival", &rival, self.service.default_timeouts())?;
        }
        Ok(outcome)
    }
}
