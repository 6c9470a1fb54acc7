//! Read lifecycle policies from the current state.

use crate::error::ActionResult;
use crate::service::{check_block, LifecycleService};
use chrono::{DateTime, Utc};
use ilm_cluster::ClusterBlockLevel;
use ilm_metadata::{
    indices_using_policy, IndexLifecycleMetadata, LifecyclePolicy, LifecyclePolicyMetadata,
    Metadata, MetadataError,
};
use serde::{Deserialize, Serialize};

/// Request for some or all stored policies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetLifecycleRequest {
    /// Empty, `*` or `_all` selects every policy.
    #[serde(default)]
    pub policy_names: Vec<String>,
}

impl GetLifecycleRequest {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            policy_names: names.into_iter().map(Into::into).collect(),
        }
    }

    fn selects_all(&self) -> bool {
        match self.policy_names.as_slice() {
            [] => true,
            [one] => one == "*" || one == "_all",
            _ => false,
        }
    }
}

/// One stored policy as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyInfo {
    pub name: String,
    pub version: u64,
    pub modified_date: DateTime<Utc>,
    pub policy: LifecyclePolicy,
    /// Indices currently configured with this policy.
    pub in_use_by: Vec<String>,
}

impl PolicyInfo {
    fn from_stored(metadata: &Metadata, stored: &LifecyclePolicyMetadata) -> Self {
        Self {
            name: stored.name().to_string(),
            version: stored.version,
            modified_date: stored.modified_date,
            policy: stored.policy.clone(),
            in_use_by: indices_using_policy(metadata, stored.name())
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetLifecycleResponse {
    pub policies: Vec<PolicyInfo>,
}

impl LifecycleService {
    /// Returns the requested policies in name order.
    ///
    /// Naming a policy that does not exist fails the whole request.
    pub fn get_policies(
        &self,
        request: &GetLifecycleRequest,
    ) -> ActionResult<GetLifecycleResponse> {
        let state = self.cluster().state();
        check_block(&state, ClusterBlockLevel::MetadataRead)?;

        let metadata = state.metadata();
        let empty = IndexLifecycleMetadata::empty();
        let registry = metadata.lifecycle().map_or(&empty, |r| &**r);

        let policies = if request.selects_all() {
            registry
                .policies()
                .values()
                .map(|stored| PolicyInfo::from_stored(metadata, stored))
                .collect()
        } else {
            let mut names: Vec<&str> = request.policy_names.iter().map(String::as_str).collect();
            names.sort_unstable();
            names.dedup();
            names
                .into_iter()
                .map(|name| {
                    registry
                        .get(name)
                        .map(|stored| PolicyInfo::from_stored(metadata, stored))
                        .ok_or_else(|| MetadataError::PolicyNotFound {
                            policy: name.to_string(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(GetLifecycleResponse { policies })
    }
}
