//! Error types for cluster state publication.

use crate::blocks::ClusterBlock;
use thiserror::Error;

/// Result type for cluster operations.
pub type ClusterResult<T> = Result<T, ClusterError>;

/// Errors raised by the update coordinator itself, as opposed to the tasks it
/// runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterError {
    /// Every publication attempt lost its compare-and-swap, or the master
    /// timeout elapsed while retrying.
    #[error("cluster state update [{task}] unavailable after {attempts} attempts")]
    Unavailable { task: String, attempts: u32 },

    /// The update was submitted outside a tokio runtime, so its publication
    /// could not be scheduled. Nothing was committed.
    #[error("cluster state update [{task}] submitted outside a tokio runtime")]
    NoRuntime { task: String },
}

/// The request hit one or more global cluster blocks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("blocked by: {}", describe(.blocks))]
pub struct ClusterBlockError {
    pub blocks: Vec<ClusterBlock>,
}

impl ClusterBlockError {
    /// Retryable only if every block involved is.
    pub fn is_retryable(&self) -> bool {
        self.blocks.iter().all(|b| b.retryable)
    }
}

fn describe(blocks: &[ClusterBlock]) -> String {
    blocks
        .iter()
        .map(|b| {
            let status = if b.retryable {
                "SERVICE_UNAVAILABLE"
            } else {
                "FORBIDDEN"
            };
            format!("[{status}/{}/{}];", b.id, b.description)
        })
        .collect()
}
