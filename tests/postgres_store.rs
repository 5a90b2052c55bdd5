//! Store behaviour against a live PostgreSQL. Set `TEST_DATABASE_URL` to run;
//! without it every test returns early. Each test works in its own schema.

use resource_api::{AppConfig, AppError, NewResource, PgResourceStore, ResourceFilter, ResourcePatch, ResourceStore};
use std::collections::HashMap;
use std::time::Duration;

async fn store() -> Option<PgResourceStore> {
    let url = std::env::var("TEST_DATABASE_URL").ok().filter(|u| !u.is_empty())?;
    let schema = format!("resource_api_test_{}", uuid::Uuid::new_v4().simple());
    let vars = HashMap::from([("DATABASE_URL", url), ("DATABASE_SCHEMA", schema)]);
    let config = match AppConfig::from_lookup(|key| vars.get(key).cloned()) {
        Ok(config) => config,
        Err(err) => panic!("test config: {err}"),
    };
    match PgResourceStore::connect(&config).await {
        Ok(store) => Some(store),
        Err(err) => panic!("connect to TEST_DATABASE_URL: {err}"),
    }
}

#[tokio::test]
async fn update_merges_and_refreshes_timestamp() {
    let Some(store) = store().await else { return };
    let created = store.create(NewResource::new("Test", Some("d"), 10.0)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;

    let patch = ResourcePatch {
        value: Some(20.0),
        ..Default::default()
    };
    let updated = store.update_by_id(created.id, patch).await.unwrap().unwrap();
    assert_eq!(updated.name, "Test");
    assert_eq!(updated.description.as_deref(), Some("d"));
    assert_eq!(updated.value, 20.0);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);

    let missing = store
        .update_by_id(uuid::Uuid::new_v4(), ResourcePatch::default())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn rejected_update_leaves_row_unchanged() {
    let Some(store) = store().await else { return };
    let created = store.create(NewResource::new("Test", None, 10.0)).await.unwrap();

    let patch = ResourcePatch {
        name: Some("  ".into()),
        ..Default::default()
    };
    let result = store.update_by_id(created.id, patch).await;
    assert!(matches!(result, Err(AppError::Validation { .. })));

    let fetched = store.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn insert_many_is_all_or_nothing() {
    let Some(store) = store().await else { return };
    let batch = vec![
        NewResource::new("First", None, 1.0),
        NewResource::new("Second", None, -1.0),
    ];
    assert!(matches!(store.insert_many(batch).await, Err(AppError::Validation { .. })));
    assert_eq!(store.count().await.unwrap(), 0);

    let batch = vec![
        NewResource::new("First", None, 1.0),
        NewResource::new("Second", Some("two"), 2.0),
    ];
    let inserted = store.insert_many(batch).await.unwrap();
    assert_eq!(inserted.len(), 2);
    let listed = store.list(&ResourceFilter::default()).await.unwrap();
    let names: Vec<_> = listed.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["First", "Second"]);
}
