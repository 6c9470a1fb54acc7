//! Error types for lifecycle actions.

use ilm_cluster::{ClusterBlockError, ClusterError};
use ilm_metadata::MetadataError;
use thiserror::Error;

/// Result type for lifecycle actions.
pub type ActionResult<T> = Result<T, ActionError>;

/// Errors surfaced to callers of lifecycle actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The request itself is malformed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A global block rejected the request before it ran.
    #[error(transparent)]
    ClusterBlocked(#[from] ClusterBlockError),

    /// The policy is missing or still in use.
    #[error(transparent)]
    Policy(#[from] MetadataError),

    /// The update could not be published.
    #[error(transparent)]
    Cluster(#[from] ClusterError),
}

impl ActionError {
    /// HTTP-style status code for the error.
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::ClusterBlocked(e) if e.is_retryable() => 503,
            Self::ClusterBlocked(_) => 403,
            Self::Policy(MetadataError::PolicyNotFound { .. }) => 404,
            Self::Policy(MetadataError::PolicyInUse { .. }) => 400,
            Self::Cluster(ClusterError::Unavailable { .. }) => 503,
            Self::Cluster(ClusterError::NoRuntime { .. }) => 500,
        }
    }

    /// Whether the same request may succeed if sent again later.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ClusterBlocked(e) => e.is_retryable(),
            Self::Cluster(ClusterError::Unavailable { .. }) => true,
            Self::Cluster(ClusterError::NoRuntime { .. }) => false,
            Self::Validation(_) | Self::Policy(_) => false,
        }
    }
}
