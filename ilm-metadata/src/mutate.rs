//! Registry edits. Every function here is pure: it reads the given snapshot
//! and returns a new one, leaving the input untouched.

use crate::error::{MetadataError, MetadataResult};
use crate::metadata::Metadata;
use crate::policy::{IndexLifecycleMetadata, LifecyclePolicy, LifecyclePolicyMetadata};
use crate::validate::validate_not_referenced;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

/// Returns a copy of `registry` without `policy`.
///
/// Absence is checked before anything is built. The operation mode and every
/// other entry are carried over unchanged.
pub fn remove_policy(
    registry: &IndexLifecycleMetadata,
    policy: &str,
) -> MetadataResult<IndexLifecycleMetadata> {
    if !registry.contains(policy) {
        return Err(MetadataError::PolicyNotFound {
            policy: policy.to_string(),
        });
    }

    let mut policies = registry.policies().clone();
    policies.remove(policy);
    Ok(IndexLifecycleMetadata::new(policies, registry.operation_mode()))
}

/// Returns a copy of `registry` with `policy` inserted or replaced.
///
/// A replaced policy gets the previous version plus one, a new one starts at 1.
pub fn put_policy(
    registry: &IndexLifecycleMetadata,
    policy: LifecyclePolicy,
    headers: BTreeMap<String, String>,
    now: DateTime<Utc>,
) -> IndexLifecycleMetadata {
    let version = registry
        .get(&policy.name)
        .map_or(1, |existing| existing.version + 1);

    let mut policies = registry.policies().clone();
    policies.insert(
        policy.name.clone(),
        LifecyclePolicyMetadata {
            policy,
            headers,
            version,
            modified_date: now,
        },
    );
    IndexLifecycleMetadata::new(policies, registry.operation_mode())
}

/// Derives the metadata that results from deleting `policy`.
///
/// References are checked first, then presence in the current registry. A
/// metadata snapshot without a registry behaves as an empty one.
pub fn delete_policy(metadata: &Metadata, policy: &str) -> MetadataResult<Metadata> {
    validate_not_referenced(metadata, policy)?;

    let registry = metadata
        .lifecycle()
        .ok_or_else(|| MetadataError::PolicyNotFound {
            policy: policy.to_string(),
        })?;
    let registry = remove_policy(registry, policy)?;
    debug!(policy, remaining = registry.len(), "removed lifecycle policy");

    Ok(metadata.to_builder().lifecycle(registry).build())
}

/// Derives the metadata that results from storing `policy`.
/// Creates a `Running` registry if none exists yet.
pub fn store_policy(
    metadata: &Metadata,
    policy: LifecyclePolicy,
    headers: BTreeMap<String, String>,
    now: DateTime<Utc>,
) -> Metadata {
    let registry = match metadata.lifecycle() {
        Some(existing) => put_policy(existing, policy, headers, now),
        None => put_policy(&IndexLifecycleMetadata::empty(), policy, headers, now),
    };
    metadata.to_builder().lifecycle(registry).build()
}
