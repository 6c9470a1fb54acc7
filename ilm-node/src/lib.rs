//! Node configuration and snapshot storage for the `ilm-node` binary.
//!
//! A node is configured from a TOML file and operates on a metadata snapshot
//! stored as JSON. Each invocation loads the snapshot, starts an in-process
//! cluster around it, runs one action and writes the committed metadata back.

use anyhow::{Context, Result};
use ilm_actions::LifecycleService;
use ilm_cluster::{
    ClusterBlocks, ClusterConfig, ClusterService, ClusterState, FollowerBehaviour,
    InMemoryPublisher,
};
use ilm_metadata::Metadata;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Contents of the node's TOML config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Where the metadata snapshot lives.
    pub state_path: PathBuf,
    /// In-process followers that acknowledge every publication.
    pub followers: usize,
    pub cluster: ClusterConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from("ilm-state.json"),
            followers: 0,
            cluster: ClusterConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Reads the config, or returns defaults if `path` does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

/// Reads the metadata snapshot, or an empty one if `path` does not exist.
pub fn load_metadata(path: &Path) -> Result<Metadata> {
    if !path.exists() {
        info!("No snapshot at {:?}, starting empty", path);
        return Ok(Metadata::empty());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to decode snapshot {}", path.display()))
}

/// Writes the snapshot through a temporary sibling file so a crash never
/// leaves a truncated snapshot behind.
pub fn save_metadata(path: &Path, metadata: &Metadata) -> Result<()> {
    let json = serde_json::to_string_pretty(metadata).context("Failed to encode snapshot")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to replace {}", path.display()))?;
    debug!("Saved snapshot to {:?}", path);
    Ok(())
}

/// Starts an in-process cluster over `metadata`.
pub fn start(config: &NodeConfig, metadata: Metadata) -> LifecycleService {
    let publisher =
        InMemoryPublisher::with_followers((0..config.followers).map(|_| FollowerBehaviour::immediate()));
    let state = ClusterState::new(metadata, ClusterBlocks::empty());
    let cluster = ClusterService::new(config.cluster.clone(), state, Arc::new(publisher));
    LifecycleService::new(Arc::new(cluster))
}
