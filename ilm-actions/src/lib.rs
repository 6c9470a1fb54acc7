//! Lifecycle policy actions executed through the cluster service.
//!
//! Each write action is validated, checked against global cluster blocks,
//! then submitted to [`ilm_cluster::ClusterService`] as a state update task.
//! The task body re-runs against the newest state whenever it loses a
//! publication race, so checks such as "no index uses this policy" always hold
//! for the state that is actually committed.
//!
//! # Example
//!
//! ```
//! use ilm_actions::{DeleteLifecycleRequest, LifecycleService, PutLifecycleRequest};
//! use ilm_cluster::{ClusterConfig, ClusterService, ClusterState};
//! use ilm_metadata::LifecyclePolicy;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), ilm_actions::ActionError> {
//! let cluster = ClusterService::single_node(ClusterConfig::default(), ClusterState::default());
//! let service = LifecycleService::new(Arc::new(cluster));
//!
//! service.put_policy(PutLifecycleRequest::new(LifecyclePolicy::new("logs"))).await?;
//! let response = service.delete_policy(DeleteLifecycleRequest::new("logs")).await?;
//! assert!(response.acknowledged);
//! # Ok(())
//! # }
//! ```

mod delete;
mod error;
mod get;
mod put;
mod service;

pub use delete::{DeleteLifecycleRequest, DeleteLifecycleResponse, DeleteLifecycleTask};
pub use error::{ActionError, ActionResult};
pub use get::{GetLifecycleRequest, GetLifecycleResponse, PolicyInfo};
pub use put::{PutLifecycleRequest, VALID_PHASES};
pub use service::{AcknowledgedResponse, LifecycleService};
