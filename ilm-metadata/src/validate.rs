//! Reference checks between indices and lifecycle policies.
//!
//! Indices are scanned in the metadata's native order, which is ascending
//! index name. When several indices reference a policy, the first one in that
//! order is the one reported.

use crate::error::{MetadataError, MetadataResult};
use crate::metadata::Metadata;

/// Fails with [`MetadataError::PolicyInUse`] if any index references `policy`.
pub fn validate_not_referenced(metadata: &Metadata, policy: &str) -> MetadataResult<()> {
    match metadata
        .indices()
        .find(|index| index.lifecycle_policy() == Some(policy))
    {
        Some(index) => Err(MetadataError::PolicyInUse {
            policy: policy.to_string(),
            index: index.name.clone(),
        }),
        None => Ok(()),
    }
}

/// Names of every index configured with `policy`, in index name order.
pub fn indices_using_policy<'a>(metadata: &'a Metadata, policy: &str) -> Vec<&'a str> {
    metadata
        .indices()
        .filter(|index| index.lifecycle_policy() == Some(policy))
        .map(|index| index.name.as_str())
        .collect()
}
