use ilm_metadata::{
    IndexLifecycleMetadata, IndexMetadata, Metadata, OperationMode, Settings,
    LIFECYCLE_NAME_SETTING,
};
use pretty_assertions::assert_eq;
use serde_json::json;

// ── Settings ─────────────────────────────────────────────────────

#[test]
fn settings_builder_put_and_remove() {
    let settings = Settings::builder()
        .put("index.number_of_shards", "1")
        .lifecycle_name("hot")
        .remove("index.number_of_shards")
        .build();

    assert_eq!(settings.len(), 1);
    assert_eq!(settings.lifecycle_name(), Some("hot"));
    assert_eq!(settings.get("index.number_of_shards"), None);
}

#[test]
fn settings_to_builder_does_not_alias() {
    let original = Settings::builder().lifecycle_name("hot").build();
    let edited = original.to_builder().lifecycle_name("cold").build();
    assert_eq!(original.lifecycle_name(), Some("hot"));
    assert_eq!(edited.lifecycle_name(), Some("cold"));
}

#[test]
fn settings_from_iterator() {
    let settings: Settings = [(LIFECYCLE_NAME_SETTING, "warm")].into_iter().collect();
    assert_eq!(settings.lifecycle_name(), Some("warm"));
}

// ── Metadata builder ─────────────────────────────────────────────

#[test]
fn builder_shares_untouched_indices() {
    let base = Metadata::builder()
        .put_index(IndexMetadata::new("a", Settings::empty()))
        .build();

    let registry_only = base.to_builder().lifecycle(IndexLifecycleMetadata::empty()).build();
    assert!(registry_only.shares_indices_with(&base));

    let with_index = base
        .to_builder()
        .put_index(IndexMetadata::new("b", Settings::empty()))
        .build();
    assert!(!with_index.shares_indices_with(&base));
    assert_eq!(base.index_count(), 1);
    assert_eq!(with_index.index_count(), 2);
}

#[test]
fn removing_unknown_index_keeps_sharing() {
    let base = Metadata::builder()
        .put_index(IndexMetadata::new("a", Settings::empty()))
        .build();
    let same = base.to_builder().remove_index("missing").build();
    assert!(same.shares_indices_with(&base));
}

#[test]
fn indices_iterate_in_name_order() {
    let md = Metadata::builder()
        .put_index(IndexMetadata::new("c", Settings::empty()))
        .put_index(IndexMetadata::new("a", Settings::empty()))
        .put_index(IndexMetadata::new("b", Settings::empty()))
        .build();
    let names: Vec<_> = md.indices().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

// ── Serialization ────────────────────────────────────────────────

#[test]
fn metadata_deserializes_from_state_json() {
    let raw = json!({
        "indices": {
            "logs-1": {
                "name": "logs-1",
                "uuid": "01890a5d-ac96-774b-bcce-b302099a8057",
                "settings": { "index.lifecycle.name": "hot" }
            }
        },
        "lifecycle": {
            "policies": {
                "hot": {
                    "policy": { "name": "hot", "phases": {} },
                    "version": 3,
                    "modified_date": "2024-01-01T00:00:00Z"
                }
            },
            "operation_mode": "STOPPED"
        }
    });

    let md: Metadata = serde_json::from_value(raw).unwrap();
    let registry = md.lifecycle().unwrap();
    assert_eq!(registry.operation_mode(), OperationMode::Stopped);
    assert_eq!(registry.get("hot").unwrap().version, 3);
    assert_eq!(md.index("logs-1").unwrap().lifecycle_policy(), Some("hot"));
}

#[test]
fn index_stored_under_another_name_is_rejected() {
    let raw = json!({
        "indices": {
            "logs-1": {
                "name": "logs-2",
                "uuid": "01890a5d-ac96-774b-bcce-b302099a8057",
                "settings": { "index.lifecycle.name": "hot" }
            }
        }
    });

    let err = serde_json::from_value::<Metadata>(raw).unwrap_err();
    assert!(err.to_string().contains("index stored under [logs-1] is named [logs-2]"));
}

#[test]
fn empty_metadata_omits_registry() {
    let value = serde_json::to_value(Metadata::empty()).unwrap();
    assert_eq!(value, json!({ "indices": {} }));
}
