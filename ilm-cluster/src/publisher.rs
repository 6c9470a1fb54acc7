//! Replication seam.
//!
//! The coordinator commits locally and then hands the new state to a
//! [`StatePublisher`], which is responsible for getting it to the other
//! members and reporting their results through an [`AckSender`]. Consensus
//! and transport live behind this trait; the implementations here are
//! in-process stand-ins.

use crate::ack::AckSender;
use crate::state::ClusterState;
use arc_swap::{ArcSwap, ArcSwapOption};
use async_trait::async_trait;
use ilm_types::NodeId;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Delivers committed states to the rest of the cluster.
#[async_trait]
pub trait StatePublisher: Send + Sync {
    /// Members other than the local node that take part in acknowledgment.
    fn followers(&self) -> Vec<NodeId>;

    /// Sends `state` to every follower and reports each result via `acks`.
    /// Must not block on acknowledgment of earlier states.
    async fn publish(&self, state: Arc<ClusterState>, acks: AckSender);
}

/// Publisher for a single-node cluster.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPublisher;

#[async_trait]
impl StatePublisher for NoopPublisher {
    fn followers(&self) -> Vec<NodeId> {
        Vec::new()
    }

    async fn publish(&self, _state: Arc<ClusterState>, _acks: AckSender) {}
}

/// How an in-process follower reacts to a published state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowerBehaviour {
    /// Apply and acknowledge after `delay`.
    Ack { delay: Duration },
    /// Never answer.
    Unresponsive,
    /// Reject the state with `reason`.
    Fail { reason: String },
}

impl FollowerBehaviour {
    /// Acknowledge right away.
    pub fn immediate() -> Self {
        Self::Ack {
            delay: Duration::ZERO,
        }
    }
}

#[derive(Debug)]
struct Follower {
    behaviour: ArcSwap<FollowerBehaviour>,
    applied: ArcSwapOption<ClusterState>,
}

impl Follower {
    /// Keeps the newest state seen. Deliveries may arrive out of order.
    fn apply(&self, state: &Arc<ClusterState>) {
        self.applied.rcu(|current| match current {
            Some(existing) if existing.version() >= state.version() => Some(Arc::clone(existing)),
            _ => Some(Arc::clone(state)),
        });
    }
}

/// In-process followers with scriptable behaviour.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPublisher {
    followers: Arc<Vec<(NodeId, Follower)>>,
}

impl InMemoryPublisher {
    /// Publisher with one follower per behaviour. [`StatePublisher::followers`]
    /// lists their ids in the same order.
    pub fn with_followers(behaviours: impl IntoIterator<Item = FollowerBehaviour>) -> Self {
        let followers = behaviours
            .into_iter()
            .map(|behaviour| {
                (
                    NodeId::new(),
                    Follower {
                        behaviour: ArcSwap::from_pointee(behaviour),
                        applied: ArcSwapOption::empty(),
                    },
                )
            })
            .collect();
        Self {
            followers: Arc::new(followers),
        }
    }

    fn follower(&self, node: NodeId) -> Option<&Follower> {
        self.followers
            .iter()
            .find(|(id, _)| *id == node)
            .map(|(_, follower)| follower)
    }

    /// Changes how `node` reacts to later publications.
    pub fn set_behaviour(&self, node: NodeId, behaviour: FollowerBehaviour) {
        if let Some(follower) = self.follower(node) {
            follower.behaviour.store(Arc::new(behaviour));
        }
    }

    /// Newest state `node` has applied.
    pub fn applied_state(&self, node: NodeId) -> Option<Arc<ClusterState>> {
        self.follower(node)
            .and_then(|follower| follower.applied.load_full())
    }
}

#[async_trait]
impl StatePublisher for InMemoryPublisher {
    fn followers(&self) -> Vec<NodeId> {
        self.followers.iter().map(|(id, _)| *id).collect()
    }

    async fn publish(&self, state: Arc<ClusterState>, acks: AckSender) {
        for (node, follower) in self.followers.iter() {
            let node = *node;
            let behaviour = follower.behaviour.load_full();
            match behaviour.as_ref() {
                FollowerBehaviour::Ack { delay } => {
                    let delay = *delay;
                    let publisher = self.clone();
                    let state = Arc::clone(&state);
                    let acks = acks.clone();
                    tokio::spawn(async move {
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                        if let Some(follower) = publisher.follower(node) {
                            follower.apply(&state);
                        }
                        acks.ack(node);
                    });
                }
                FollowerBehaviour::Unresponsive => {
                    debug!(%node, version = state.version(), "follower dropped publication");
                }
                FollowerBehaviour::Fail { reason } => acks.fail(node, reason.clone()),
            }
        }
    }
}
