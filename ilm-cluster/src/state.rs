//! Versioned, immutable cluster state.

use crate::blocks::ClusterBlocks;
use ilm_metadata::Metadata;
use ilm_types::CommitToken;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One published cluster state. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterState {
    version: u64,
    state_uuid: CommitToken,
    metadata: Arc<Metadata>,
    #[serde(default)]
    blocks: Arc<ClusterBlocks>,
}

impl ClusterState {
    /// A first state at version 0.
    pub fn new(metadata: Metadata, blocks: ClusterBlocks) -> Self {
        Self {
            version: 0,
            state_uuid: CommitToken::new(),
            metadata: Arc::new(metadata),
            blocks: Arc::new(blocks),
        }
    }

    /// Starts a successor of this state.
    pub fn to_builder(&self) -> ClusterStateBuilder {
        ClusterStateBuilder {
            base_version: self.version,
            metadata: Arc::clone(&self.metadata),
            blocks: Arc::clone(&self.blocks),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Token identifying this exact publication.
    pub fn state_uuid(&self) -> CommitToken {
        self.state_uuid
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn blocks(&self) -> &ClusterBlocks {
        &self.blocks
    }
}

impl Default for ClusterState {
    fn default() -> Self {
        Self::new(Metadata::empty(), ClusterBlocks::empty())
    }
}

/// Builds the successor of a given state.
///
/// The result always has `version = base + 1` and a fresh state uuid; parts
/// that are not replaced are shared with the base state.
#[derive(Debug, Clone)]
pub struct ClusterStateBuilder {
    base_version: u64,
    metadata: Arc<Metadata>,
    blocks: Arc<ClusterBlocks>,
}

impl ClusterStateBuilder {
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Arc::new(metadata);
        self
    }

    pub fn blocks(mut self, blocks: ClusterBlocks) -> Self {
        self.blocks = Arc::new(blocks);
        self
    }

    /// Version of the state this builder was derived from.
    pub fn base_version(&self) -> u64 {
        self.base_version
    }

    pub fn build(self) -> ClusterState {
        ClusterState {
            version: self.base_version + 1,
            state_uuid: CommitToken::new(),
            metadata: self.metadata,
            blocks: self.blocks,
        }
    }
}
