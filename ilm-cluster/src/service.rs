//! The cluster update coordinator.
//!
//! All writers go through [`ClusterService::submit_state_update_task`], which
//! runs an optimistic loop over the current-state pointer:
//!
//! 1. load the latest published state
//! 2. run the task against it (validation and mutation, fresh every attempt)
//! 3. build the successor (`version + 1`)
//! 4. compare-and-swap it in; if another writer got there first, start over
//!
//! No lock is held across steps 1–4. Readers call [`ClusterService::state`]
//! and always get a complete, immutable snapshot.

use crate::ack::{AckTracker, PendingAck};
use crate::blocks::{ClusterBlock, ClusterBlocks};
use crate::config::ClusterConfig;
use crate::error::{ClusterError, ClusterResult};
use crate::publisher::{NoopPublisher, StatePublisher};
use crate::state::ClusterState;
use crate::task::{ClusterStateUpdateTask, TaskOutcome, TaskTimeouts};
use arc_swap::ArcSwap;
use ilm_types::NodeId;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

/// Owns the authoritative cluster state on the elected node.
pub struct ClusterService {
    local_node: NodeId,
    config: ClusterConfig,
    state: ArcSwap<ClusterState>,
    acks: AckTracker,
    publisher: Arc<dyn StatePublisher>,
}

impl ClusterService {
    /// Creates a service that replicates through `publisher`.
    pub fn new(
        config: ClusterConfig,
        initial: ClusterState,
        publisher: Arc<dyn StatePublisher>,
    ) -> Self {
        let local_node = NodeId::new();
        let members = std::iter::once(local_node).chain(publisher.followers());
        let acks = AckTracker::new(members, config.ack_policy);
        acks.ack(local_node, initial.version());

        info!(
            node = %local_node,
            name = %config.node_name,
            members = acks.members().len(),
            version = initial.version(),
            "cluster service started"
        );

        Self {
            local_node,
            config,
            state: ArcSwap::from_pointee(initial),
            acks,
            publisher,
        }
    }

    /// Creates a service with no followers.
    pub fn single_node(config: ClusterConfig, initial: ClusterState) -> Self {
        Self::new(config, initial, Arc::new(NoopPublisher))
    }

    /// The latest published state.
    pub fn state(&self) -> Arc<ClusterState> {
        self.state.load_full()
    }

    pub fn local_node(&self) -> NodeId {
        self.local_node
    }

    /// Every member taking part in acknowledgment, local node first.
    pub fn members(&self) -> &[NodeId] {
        self.acks.members()
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Timeouts from the configuration defaults.
    pub fn default_timeouts(&self) -> TaskTimeouts {
        TaskTimeouts::new(self.config.ack_timeout(), self.config.master_timeout())
    }

    /// Runs `task` until it commits, fails, or runs out of attempts.
    ///
    /// Errors returned by the task are passed through untouched and nothing is
    /// published. Losing a publication race is never reported as an error
    /// unless `max_publish_attempts` or the master timeout is exhausted, which
    /// yields [`ClusterError::Unavailable`].
    ///
    /// Replication of a committed state is spawned onto the caller's tokio
    /// runtime. Without one the task is not run and
    /// [`ClusterError::NoRuntime`] is returned.
    pub fn submit_state_update_task<T>(
        &self,
        source: &str,
        task: &T,
        timeouts: TaskTimeouts,
    ) -> Result<PendingAck, T::Error>
    where
        T: ClusterStateUpdateTask + ?Sized,
    {
        let runtime = Handle::try_current().map_err(|_| {
            T::Error::from(ClusterError::NoRuntime {
                task: source.to_string(),
            })
        })?;
        let started = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            let current = self.state.load_full();

            let builder = match task.execute(&current)? {
                TaskOutcome::Unchanged => {
                    debug!(source, version = current.version(), "update task left state unchanged");
                    return Ok(PendingAck::unchanged(current));
                }
                TaskOutcome::Changed(builder) => builder,
            };
            debug_assert_eq!(builder.base_version(), current.version());

            let next = Arc::new(builder.build());
            let prev = self.state.compare_and_swap(&current, Arc::clone(&next));

            if Arc::ptr_eq(&prev, &current) {
                info!(source, version = next.version(), attempts, "published cluster state");
                return Ok(self.publish(&runtime, next, timeouts));
            }

            debug!(source, attempt = attempts, "lost publication race, retrying");
            if attempts >= self.config.max_publish_attempts || started.elapsed() >= timeouts.master {
                warn!(source, attempts, "giving up on cluster state update");
                return Err(ClusterError::Unavailable {
                    task: source.to_string(),
                    attempts,
                }
                .into());
            }
        }
    }

    /// Adds a global block.
    pub fn add_block(&self, block: ClusterBlock) -> ClusterResult<PendingAck> {
        let source = format!("add-block-{}", block.id);
        let task = BlocksTask(move |blocks: &ClusterBlocks| {
            if blocks.has_global_block(block.id) {
                None
            } else {
                Some(blocks.with_block(block.clone()))
            }
        });
        self.submit_state_update_task(&source, &task, self.default_timeouts())
    }

    /// Removes the global block `id`.
    pub fn remove_block(&self, id: u32) -> ClusterResult<PendingAck> {
        let source = format!("remove-block-{id}");
        let task = BlocksTask(move |blocks: &ClusterBlocks| {
            blocks.has_global_block(id).then(|| blocks.without_block(id))
        });
        self.submit_state_update_task(&source, &task, self.default_timeouts())
    }

    fn publish(
        &self,
        runtime: &Handle,
        state: Arc<ClusterState>,
        timeouts: TaskTimeouts,
    ) -> PendingAck {
        self.acks.ack(self.local_node, state.version());
        let pending = self.acks.pending(Arc::clone(&state), timeouts.ack);

        let publisher = Arc::clone(&self.publisher);
        let sender = self.acks.sender(state.version());
        runtime.spawn(async move {
            publisher.publish(state, sender).await;
        });

        pending
    }
}

/// Edits only the block set; `None` means nothing to change.
struct BlocksTask<F>(F);

impl<F> ClusterStateUpdateTask for BlocksTask<F>
where
    F: Fn(&ClusterBlocks) -> Option<ClusterBlocks> + Send + Sync,
{
    type Error = ClusterError;

    fn execute(&self, current: &ClusterState) -> Result<TaskOutcome, ClusterError> {
        Ok(match (self.0)(current.blocks()) {
            Some(blocks) => TaskOutcome::Changed(current.to_builder().blocks(blocks)),
            None => TaskOutcome::Unchanged,
        })
    }
}
