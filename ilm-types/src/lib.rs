//! Core identifier types for the lifecycle workspace.
//!
//! Every identifier is a UUID v7 so that ids minted later sort later:
//! - [`NodeId`] names a cluster member
//! - [`IndexUuid`] names a concrete index incarnation
//! - [`CommitToken`] names one published cluster state and doubles as the
//!   idempotency token handed to the replication layer

mod ids;

pub use ids::{CommitToken, IndexUuid, NodeId};
