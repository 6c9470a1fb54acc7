//! The cluster metadata aggregate.

use crate::index::IndexMetadata;
use crate::policy::IndexLifecycleMetadata;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Immutable metadata snapshot: every index plus the lifecycle registry.
///
/// Both halves sit behind `Arc`s, so deriving a successor that only edits
/// the registry shares the index map with its predecessor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, deserialize_with = "deserialize_indices")]
    indices: Arc<BTreeMap<String, IndexMetadata>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lifecycle: Option<Arc<IndexLifecycleMetadata>>,
}

impl Metadata {
    /// Metadata with no indices and no lifecycle registry.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> MetadataBuilder {
        MetadataBuilder::default()
    }

    /// Starts a builder seeded with this snapshot.
    pub fn to_builder(&self) -> MetadataBuilder {
        MetadataBuilder {
            indices: Arc::clone(&self.indices),
            lifecycle: self.lifecycle.clone(),
        }
    }

    /// Iterates indices in name order.
    pub fn indices(&self) -> impl Iterator<Item = &IndexMetadata> {
        self.indices.values()
    }

    pub fn index(&self, name: &str) -> Option<&IndexMetadata> {
        self.indices.get(name)
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if both snapshots share the same index map allocation.
    pub fn shares_indices_with(&self, other: &Metadata) -> bool {
        Arc::ptr_eq(&self.indices, &other.indices)
    }

    /// The lifecycle registry, if one was ever installed.
    pub fn lifecycle(&self) -> Option<&Arc<IndexLifecycleMetadata>> {
        self.lifecycle.as_ref()
    }
}

/// Index maps are keyed by index name; a stored map that disagrees is rejected.
fn deserialize_indices<'de, D>(
    deserializer: D,
) -> Result<Arc<BTreeMap<String, IndexMetadata>>, D::Error>
where
    D: Deserializer<'de>,
{
    let indices = BTreeMap::<String, IndexMetadata>::deserialize(deserializer)?;
    if let Some((key, index)) = indices.iter().find(|(key, index)| **key != index.name) {
        return Err(D::Error::custom(format!(
            "index stored under [{key}] is named [{}]",
            index.name
        )));
    }
    Ok(Arc::new(indices))
}

/// Builder for [`Metadata`]. Index edits copy the index map on first write.
#[derive(Debug, Clone, Default)]
pub struct MetadataBuilder {
    indices: Arc<BTreeMap<String, IndexMetadata>>,
    lifecycle: Option<Arc<IndexLifecycleMetadata>>,
}

impl MetadataBuilder {
    /// Adds or replaces an index, keyed by its name.
    pub fn put_index(mut self, index: IndexMetadata) -> Self {
        Arc::make_mut(&mut self.indices).insert(index.name.clone(), index);
        self
    }

    pub fn remove_index(mut self, name: &str) -> Self {
        if self.indices.contains_key(name) {
            Arc::make_mut(&mut self.indices).remove(name);
        }
        self
    }

    /// Installs a lifecycle registry.
    pub fn lifecycle(mut self, registry: IndexLifecycleMetadata) -> Self {
        self.lifecycle = Some(Arc::new(registry));
        self
    }

    pub fn build(self) -> Metadata {
        Metadata {
            indices: self.indices,
            lifecycle: self.lifecycle,
        }
    }
}
