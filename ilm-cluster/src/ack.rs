//! Acknowledgment tracking for published cluster states.
//!
//! Every member reports the highest state version it has applied. A
//! publication of version `v` is acknowledged once enough members (per
//! [`AckPolicy`]) report a version `>= v`. Acks are shared through a
//! `tokio::sync::watch` channel so waiters never touch the state pointer.

use crate::state::ClusterState;
use ilm_types::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

/// How many members must acknowledge a publication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AckPolicy {
    /// Every member.
    #[default]
    All,
    /// More than half of the members.
    Majority,
}

impl AckPolicy {
    /// Number of acks needed out of `members`.
    pub fn required(self, members: usize) -> usize {
        match self {
            Self::All => members,
            Self::Majority => members / 2 + 1,
        }
    }
}

/// Final result of waiting for acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckOutcome {
    /// Enough members applied the change.
    Acknowledged,
    /// Committed locally, but not confirmed before the timeout.
    TimedOut,
    /// Too many members reported failure for the policy to be met.
    ///
    /// A member that has not acknowledged `v` and reports a failure for any
    /// version `>= v` counts as failed for `v` as well, even if it applied
    /// `v` and its ack is still in flight.
    Failed {
        node: Option<NodeId>,
        reason: String,
    },
}

impl AckOutcome {
    /// True only when the change is confirmed cluster-wide.
    pub fn acknowledged(&self) -> bool {
        matches!(self, Self::Acknowledged)
    }
}

#[derive(Debug, Default)]
struct AckBoard {
    /// Highest version each node has applied.
    acked: HashMap<NodeId, u64>,
    /// Most recent version each node failed to apply, with the reason.
    failed: HashMap<NodeId, (u64, String)>,
}

fn record_ack(board: &watch::Sender<AckBoard>, node: NodeId, version: u64) {
    board.send_modify(|b| {
        let highest = b.acked.entry(node).or_insert(0);
        if version > *highest {
            *highest = version;
        }
    });
}

fn record_failure(board: &watch::Sender<AckBoard>, node: NodeId, version: u64, reason: String) {
    board.send_modify(|b| {
        let replace = b.failed.get(&node).is_none_or(|(v, _)| version >= *v);
        if replace {
            b.failed.insert(node, (version, reason));
        }
    });
}

fn evaluate(
    board: &AckBoard,
    members: &[NodeId],
    policy: AckPolicy,
    version: u64,
) -> Option<AckOutcome> {
    let required = policy.required(members.len());
    let mut acked = 0;
    let mut failed = 0;
    let mut first_failure = None;

    for node in members {
        if board.acked.get(node).is_some_and(|v| *v >= version) {
            acked += 1;
        } else if let Some((_, reason)) = board.failed.get(node).filter(|(v, _)| *v >= version) {
            failed += 1;
            first_failure.get_or_insert_with(|| (*node, reason.clone()));
        }
    }

    if acked >= required {
        return Some(AckOutcome::Acknowledged);
    }
    if members.len() - failed < required {
        let (node, reason) = first_failure?;
        return Some(AckOutcome::Failed {
            node: Some(node),
            reason,
        });
    }
    None
}

/// Shared record of which member applied which version.
#[derive(Debug, Clone)]
pub struct AckTracker {
    members: Arc<[NodeId]>,
    policy: AckPolicy,
    board: Arc<watch::Sender<AckBoard>>,
}

impl AckTracker {
    pub fn new(members: impl IntoIterator<Item = NodeId>, policy: AckPolicy) -> Self {
        let (board, _) = watch::channel(AckBoard::default());
        Self {
            members: members.into_iter().collect(),
            policy,
            board: Arc::new(board),
        }
    }

    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    pub fn policy(&self) -> AckPolicy {
        self.policy
    }

    /// Records that `node` applied `version` (and therefore everything before it).
    pub fn ack(&self, node: NodeId, version: u64) {
        record_ack(&self.board, node, version);
    }

    /// Records that `node` failed to apply `version`.
    pub fn fail(&self, node: NodeId, version: u64, reason: impl Into<String>) {
        record_failure(&self.board, node, version, reason.into());
    }

    /// Handle the replication layer uses to report results for `version`.
    pub fn sender(&self, version: u64) -> AckSender {
        AckSender {
            version,
            board: Arc::clone(&self.board),
        }
    }

    /// Outcome for `version` as of now, or `None` while still pending.
    pub fn outcome(&self, version: u64) -> Option<AckOutcome> {
        evaluate(&self.board.borrow(), &self.members, self.policy, version)
    }

    /// Waitable handle for a freshly published state.
    pub fn pending(&self, state: Arc<ClusterState>, timeout: Duration) -> PendingAck {
        PendingAck {
            state,
            published: true,
            timeout,
            waiter: Some(Waiter {
                rx: self.board.subscribe(),
                members: Arc::clone(&self.members),
                policy: self.policy,
            }),
        }
    }
}

/// Reports per-member apply results for one published version.
#[derive(Debug, Clone)]
pub struct AckSender {
    version: u64,
    board: Arc<watch::Sender<AckBoard>>,
}

impl AckSender {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn ack(&self, node: NodeId) {
        debug!(%node, version = self.version, "member acknowledged state");
        record_ack(&self.board, node, self.version);
    }

    pub fn fail(&self, node: NodeId, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(%node, version = self.version, %reason, "member failed to apply state");
        record_failure(&self.board, node, self.version, reason);
    }
}

#[derive(Debug)]
struct Waiter {
    rx: watch::Receiver<AckBoard>,
    members: Arc<[NodeId]>,
    policy: AckPolicy,
}

/// The caller's handle on a committed update.
///
/// The state is already the authoritative one when this exists; waiting only
/// observes propagation. Dropping the handle, or timing out, leaves the
/// committed state as it is.
#[derive(Debug)]
pub struct PendingAck {
    state: Arc<ClusterState>,
    published: bool,
    timeout: Duration,
    waiter: Option<Waiter>,
}

impl PendingAck {
    /// Handle for a task that left the state unchanged. Resolves immediately.
    pub fn unchanged(state: Arc<ClusterState>) -> Self {
        Self {
            state,
            published: false,
            timeout: Duration::ZERO,
            waiter: None,
        }
    }

    /// The state the update produced (or observed, if unchanged).
    pub fn state(&self) -> &Arc<ClusterState> {
        &self.state
    }

    pub fn version(&self) -> u64 {
        self.state.version()
    }

    /// Whether this update published a new state.
    pub fn published(&self) -> bool {
        self.published
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Waits up to the request's ack timeout.
    pub async fn wait(self) -> AckOutcome {
        let timeout = self.timeout;
        self.wait_timeout(timeout).await
    }

    /// Waits up to `timeout`. A zero timeout reports the current outcome
    /// without waiting.
    pub async fn wait_timeout(self, timeout: Duration) -> AckOutcome {
        let Some(Waiter {
            mut rx,
            members,
            policy,
        }) = self.waiter
        else {
            return AckOutcome::Acknowledged;
        };
        let version = self.state.version();

        let result = tokio::time::timeout(
            timeout,
            rx.wait_for(|board| evaluate(board, &members, policy, version).is_some()),
        )
        .await;

        match result {
            Ok(Ok(board)) => {
                evaluate(&board, &members, policy, version).unwrap_or(AckOutcome::TimedOut)
            }
            Ok(Err(_)) => AckOutcome::Failed {
                node: None,
                reason: "acknowledgment tracker closed".to_string(),
            },
            Err(_) => {
                warn!(version, ?timeout, "timed out waiting for acknowledgment");
                AckOutcome::TimedOut
            }
        }
    }
}
