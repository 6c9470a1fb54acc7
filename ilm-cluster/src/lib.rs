//! Cluster state publication for lifecycle metadata.
//!
//! # Architecture
//!
//! The elected node owns a single pointer to the current [`ClusterState`].
//! States are immutable and versioned; every change produces a successor with
//! `version + 1`, published with a compare-and-swap so that concurrent writers
//! are serialized into one total order without a global lock.
//!
//! ## Components
//!
//! - **State**: versioned snapshot of metadata plus cluster blocks
//! - **Blocks**: global blocks that reject classes of operations
//! - **Service**: the optimistic update coordinator
//! - **Ack**: per-member acknowledgment tracking with timeouts
//! - **Publisher**: the seam to the replication layer
//!
//! ## Update flow
//!
//! 1. **Submit**: a task is handed to [`ClusterService::submit_state_update_task`]
//! 2. **Execute**: the task derives a successor from the latest state
//! 3. **Publish**: compare-and-swap; on a lost race go back to step 2
//! 4. **Replicate**: the new state is handed to the [`StatePublisher`]
//! 5. **Acknowledge**: the caller awaits [`PendingAck`] until members confirm
//!    or the ack timeout elapses
//!
//! # Example
//!
//! ```
//! use ilm_cluster::{ClusterConfig, ClusterService, ClusterState};
//!
//! let service = ClusterService::single_node(ClusterConfig::default(), ClusterState::default());
//! assert_eq!(service.state().version(), 0);
//! ```

pub mod ack;
mod blocks;
mod config;
mod error;
pub mod publisher;
mod service;
mod state;
mod task;

pub use ack::{AckOutcome, AckPolicy, AckSender, AckTracker, PendingAck};
pub use blocks::{ClusterBlock, ClusterBlockLevel, ClusterBlocks};
pub use config::ClusterConfig;
pub use error::{ClusterBlockError, ClusterError, ClusterResult};
pub use publisher::{FollowerBehaviour, InMemoryPublisher, NoopPublisher, StatePublisher};
pub use service::ClusterService;
pub use state::{ClusterState, ClusterStateBuilder};
pub use task::{ClusterStateUpdateTask, TaskOutcome, TaskTimeouts};
