//! Integration tests for config groups and label selection.

mod common;

use common::{memory_store, sample_group};
use confstore::{ConfigForGroup, Group, StoreError};

#[tokio::test]
async fn test_group_round_trip() {
    let (_backend, store) = memory_store();

    let created = store.add_config_group(sample_group("v1")).await.unwrap();
    let loaded = store.get_config_group(&created.id, "v1").await.unwrap();

    assert_eq!(loaded, created);
    assert_eq!(loaded.configs().len(), 4);
}

#[tokio::test]
async fn test_group_with_empty_configs_is_accepted() {
    let (_backend, store) = memory_store();

    let created = store.add_config_group(Group::new("v1")).await.unwrap();
    let loaded = store.get_config_group(&created.id, "v1").await.unwrap();
    assert_eq!(loaded.configs, Some(vec![]));
}

#[tokio::test]
async fn test_group_without_configs_is_rejected() {
    let (backend, store) = memory_store();

    let group = Group {
        configs: None,
        ..Group::new("v1")
    };
    let err = store.add_config_group(group).await.unwrap_err();

    assert!(err.is_invalid_input());
    assert!(backend.is_empty().await);
}

#[tokio::test]
async fn test_group_without_version_is_rejected() {
    let (backend, store) = memory_store();

    let err = store.add_config_group(sample_group("")).await.unwrap_err();
    assert!(err.is_invalid_input());
    assert!(backend.is_empty().await);
}

#[tokio::test]
async fn test_select_exact_match_keeps_duplicates_in_order() {
    let (_backend, store) = memory_store();
    let group = store.add_config_group(sample_group("v1")).await.unwrap();

    let matches = store
        .get_configs_by_labels(&group.id, "v1", "env:prod")
        .await
        .unwrap();

    let replicas: Vec<_> = matches.iter().map(|c| c.values["replicas"].as_str()).collect();
    assert_eq!(replicas, vec!["3", "4"]);
}

#[tokio::test]
async fn test_select_requires_full_label_set() {
    let (_backend, store) = memory_store();
    let group = store.add_config_group(sample_group("v1")).await.unwrap();

    let matches = store
        .get_configs_by_labels(&group.id, "v1", "region:eu;env:prod")
        .await
        .unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].values["replicas"], "5");

    // A subset of a variant's labels is not a match
    let matches = store
        .get_configs_by_labels(&group.id, "v1", "region:eu")
        .await
        .unwrap();
    assert!(matches.is_empty());

    // Neither is a superset
    let matches = store
        .get_configs_by_labels(&group.id, "v1", "env:dev;tier:web")
        .await
        .unwrap();
    assert!(matches.is_empty());
}

#[tokio::test]
async fn test_select_tolerates_empty_segments() {
    let (_backend, store) = memory_store();
    let group = store.add_config_group(sample_group("v1")).await.unwrap();

    let matches = store
        .get_configs_by_labels(&group.id, "v1", ";env:dev;;")
        .await
        .unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].values["replicas"], "1");
}

#[tokio::test]
async fn test_empty_query_matches_unlabelled_variants() {
    let (_backend, store) = memory_store();

    let group = Group::new("v1")
        .with_config(ConfigForGroup::new().with_value("fallback", "yes"))
        .with_config(ConfigForGroup::new().with_label("env", "prod"));
    let group = store.add_config_group(group).await.unwrap();

    let matches = store.get_configs_by_labels(&group.id, "v1", "").await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].values["fallback"], "yes");
}

#[tokio::test]
async fn test_malformed_query_fails_before_lookup() {
    let (_backend, store) = memory_store();

    // The group does not exist, so a lookup would be NotFound
    let err = store
        .get_configs_by_labels("missing", "v1", "env:prod;broken")
        .await
        .unwrap_err();

    assert!(err.is_invalid_label_format());
    match err {
        StoreError::InvalidInput(confstore::InvalidInputError::InvalidLabelFormat { segment }) => {
            assert_eq!(segment, "broken");
        }
        other => panic!("expected InvalidLabelFormat, got {other:?}"),
    }
}

#[tokio::test]
async fn test_select_on_missing_group_is_not_found() {
    let (_backend, store) = memory_store();

    let err = store
        .get_configs_by_labels("missing", "v1", "env:prod")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_update_replaces_whole_record() {
    let (_backend, store) = memory_store();
    let created = store.add_config_group(sample_group("v1")).await.unwrap();

    let replacement = Group::new("v1")
        .with_id(created.id.clone())
        .with_config(ConfigForGroup::new().with_label("env", "qa").with_value("replicas", "2"));
    store.update_config_group(replacement.clone()).await.unwrap();

    let loaded = store.get_config_group(&created.id, "v1").await.unwrap();
    assert_eq!(loaded, replacement);

    let matches = store
        .get_configs_by_labels(&created.id, "v1", "env:prod")
        .await
        .unwrap();
    assert!(matches.is_empty());
}

#[tokio::test]
async fn test_update_and_add_version_require_id() {
    let (backend, store) = memory_store();

    assert!(store.update_config_group(sample_group("v1")).await.unwrap_err().is_invalid_input());
    assert!(store
        .add_config_group_version(sample_group("v1"))
        .await
        .unwrap_err()
        .is_invalid_input());
    assert!(backend.is_empty().await);
}

#[tokio::test]
async fn test_group_versions_and_delete() {
    let (_backend, store) = memory_store();

    let created = store.add_config_group(sample_group("v1")).await.unwrap();
    store
        .add_config_group_version(sample_group("v2").with_id(created.id.clone()))
        .await
        .unwrap();

    assert_eq!(store.get_config_group_versions(&created.id).await.unwrap().len(), 2);

    store.delete_config_group(&created.id, "v1").await.unwrap();
    assert!(store.get_config_group(&created.id, "v1").await.unwrap_err().is_not_found());

    let remaining = store.get_config_group_versions(&created.id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].version, "v2");

    assert!(store
        .delete_config_group(&created.id, "v1")
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_group_prefix_delimiter_correctness() {
    let (_backend, store) = memory_store();

    store
        .add_config_group_version(sample_group("1").with_id("a"))
        .await
        .unwrap();
    store
        .add_config_group_version(sample_group("1").with_id("ab"))
        .await
        .unwrap();

    let versions = store.get_config_group_versions("a").await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].id, "a");
    assert_eq!(store.get_all_groups().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_group_collision_is_already_exists() {
    let (backend, store) = memory_store();
    let store = store.with_id_generator(|| "fixed".to_string());

    store.add_config_group(sample_group("v1")).await.unwrap();
    let err = store.add_config_group(sample_group("v1")).await.unwrap_err();

    assert!(matches!(err, StoreError::AlreadyExists { ref id, .. } if id == "fixed"));
    assert_eq!(backend.len().await, 1);
}

#[tokio::test]
async fn test_group_versions_of_empty_id_is_empty() {
    let (_backend, store) = memory_store();

    store.add_config_group(sample_group("v1")).await.unwrap();

    assert!(store.get_config_group_versions("").await.unwrap().is_empty());
    assert_eq!(store.get_all_groups().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_group_version_containing_delimiter_is_listed() {
    let (_backend, store) = memory_store();

    let created = store.add_config_group(sample_group("2024/q1")).await.unwrap();

    let versions = store.get_config_group_versions(&created.id).await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].version, "2024/q1");
    assert_eq!(store.get_all_groups().await.unwrap(), vec![created]);
}
