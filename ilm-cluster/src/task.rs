//! Cluster state update tasks.

use crate::error::ClusterError;
use crate::state::{ClusterState, ClusterStateBuilder};
use std::time::Duration;

/// What a task wants done with the state it was shown.
#[derive(Debug)]
pub enum TaskOutcome {
    /// Nothing to publish.
    Unchanged,
    /// Publish the successor described by this builder.
    Changed(ClusterStateBuilder),
}

/// A unit of work that derives a new cluster state from the current one.
///
/// `execute` may run several times for one submission, each time against the
/// newest state, whenever a concurrent update wins the race to publish. It
/// must therefore be a pure function of the state it is given. Errors it
/// returns are terminal and handed back to the submitter unchanged.
pub trait ClusterStateUpdateTask: Send + Sync {
    type Error: std::error::Error + From<ClusterError> + Send + Sync + 'static;

    fn execute(&self, current: &ClusterState) -> Result<TaskOutcome, Self::Error>;
}

/// Per-request timeouts for an update task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTimeouts {
    /// How long the caller waits for cluster-wide acknowledgment.
    pub ack: Duration,
    /// How long the task may keep retrying publication.
    pub master: Duration,
}

impl TaskTimeouts {
    pub fn new(ack: Duration, master: Duration) -> Self {
        Self { ack, master }
    }
}
