//! Cluster-wide blocks that reject whole classes of operations.

use crate::error::ClusterBlockError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The class of operation a block applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterBlockLevel {
    Read,
    Write,
    MetadataRead,
    MetadataWrite,
}

/// A single global block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterBlock {
    pub id: u32,
    pub description: String,
    /// Whether the condition is expected to clear on its own.
    pub retryable: bool,
    pub levels: BTreeSet<ClusterBlockLevel>,
}

impl ClusterBlock {
    pub fn new(
        id: u32,
        description: impl Into<String>,
        retryable: bool,
        levels: impl IntoIterator<Item = ClusterBlockLevel>,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            retryable,
            levels: levels.into_iter().collect(),
        }
    }

    /// No elected master: writes cannot be published.
    pub fn no_master_writes() -> Self {
        Self::new(
            2,
            "no master",
            true,
            [ClusterBlockLevel::Write, ClusterBlockLevel::MetadataWrite],
        )
    }

    /// Operator-set read-only cluster.
    pub fn read_only() -> Self {
        Self::new(
            6,
            "cluster read-only (api)",
            false,
            [ClusterBlockLevel::Write, ClusterBlockLevel::MetadataWrite],
        )
    }

    pub fn applies_to(&self, level: ClusterBlockLevel) -> bool {
        self.levels.contains(&level)
    }
}

/// The set of global blocks, keyed by block id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterBlocks {
    #[serde(default)]
    global: BTreeMap<u32, ClusterBlock>,
}

impl ClusterBlocks {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a copy with `block` added (replacing any block with its id).
    pub fn with_block(&self, block: ClusterBlock) -> Self {
        let mut global = self.global.clone();
        global.insert(block.id, block);
        Self { global }
    }

    /// Returns a copy without the block `id`.
    pub fn without_block(&self, id: u32) -> Self {
        let mut global = self.global.clone();
        global.remove(&id);
        Self { global }
    }

    pub fn has_global_block(&self, id: u32) -> bool {
        self.global.contains_key(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty()
    }

    pub fn global_blocked(&self, level: ClusterBlockLevel) -> bool {
        self.global.values().any(|b| b.applies_to(level))
    }

    /// Error describing every block at `level`, or `None` if nothing blocks it.
    pub fn global_blocked_error(&self, level: ClusterBlockLevel) -> Option<ClusterBlockError> {
        let blocks: Vec<ClusterBlock> = self
            .global
            .values()
            .filter(|b| b.applies_to(level))
            .cloned()
            .collect();
        if blocks.is_empty() {
            None
        } else {
            Some(ClusterBlockError { blocks })
        }
    }
}
