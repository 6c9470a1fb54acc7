use ilm_cluster::{ClusterBlock, ClusterBlockLevel, ClusterBlocks, ClusterState};
use ilm_metadata::Metadata;

#[test]
fn empty_blocks_block_nothing() {
    let blocks = ClusterBlocks::empty();
    assert!(blocks.is_empty());
    assert!(blocks.global_blocked_error(ClusterBlockLevel::MetadataWrite).is_none());
}

#[test]
fn block_applies_only_to_its_levels() {
    let blocks = ClusterBlocks::empty().with_block(ClusterBlock::read_only());
    assert!(blocks.global_blocked(ClusterBlockLevel::MetadataWrite));
    assert!(blocks.global_blocked(ClusterBlockLevel::Write));
    assert!(!blocks.global_blocked(ClusterBlockLevel::MetadataRead));
}

#[test]
fn with_and_without_do_not_alias() {
    let base = ClusterBlocks::empty();
    let blocked = base.with_block(ClusterBlock::no_master_writes());
    let cleared = blocked.without_block(ClusterBlock::no_master_writes().id);

    assert!(base.is_empty());
    assert!(blocked.has_global_block(2));
    assert!(cleared.is_empty());
}

#[test]
fn block_error_lists_every_matching_block() {
    let blocks = ClusterBlocks::empty()
        .with_block(ClusterBlock::no_master_writes())
        .with_block(ClusterBlock::read_only());
    let err = blocks
        .global_blocked_error(ClusterBlockLevel::MetadataWrite)
        .unwrap();

    assert_eq!(err.blocks.len(), 2);
    assert!(!err.is_retryable());
    assert_eq!(
        err.to_string(),
        "blocked by: [SERVICE_UNAVAILABLE/2/no master];[FORBIDDEN/6/cluster read-only (api)];"
    );
}

#[test]
fn retryable_when_all_blocks_are() {
    let blocks = ClusterBlocks::empty().with_block(ClusterBlock::no_master_writes());
    let err = blocks.global_blocked_error(ClusterBlockLevel::Write).unwrap();
    assert!(err.is_retryable());
}

#[test]
fn successor_state_shares_untouched_parts() {
    let state = ClusterState::new(Metadata::empty(), ClusterBlocks::empty());
    let next = state
        .to_builder()
        .blocks(ClusterBlocks::empty().with_block(ClusterBlock::read_only()))
        .build();

    assert_eq!(next.version(), state.version() + 1);
    assert_ne!(next.state_uuid(), state.state_uuid());
    assert_eq!(next.metadata(), state.metadata());
    assert!(state.blocks().is_empty());
}

#[test]
fn cluster_state_json_roundtrip() {
    let state = ClusterState::new(
        Metadata::empty(),
        ClusterBlocks::empty().with_block(ClusterBlock::read_only()),
    );
    let json = serde_json::to_string(&state).unwrap();
    let back: ClusterState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
}
