//! Error types for metadata edits.

use thiserror::Error;

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Errors raised while validating or editing the policy registry.
///
/// Both variants are terminal: retrying against a newer snapshot is the
/// caller's decision, never an automatic one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// The policy is absent from the registry being edited.
    #[error("Lifecycle policy not found: {policy}")]
    PolicyNotFound { policy: String },

    /// The policy is still referenced by an index.
    #[error("Cannot delete policy [{policy}]. It is being used by at least one index [{index}]")]
    PolicyInUse { policy: String, index: String },
}

impl MetadataError {
    /// Name of the policy the error refers to.
    pub fn policy(&self) -> &str {
        match self {
            Self::PolicyNotFound { policy } | Self::PolicyInUse { policy, .. } => policy,
        }
    }
}
