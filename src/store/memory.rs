//! In-process backend. Records live in insertion order behind an async lock.

use super::ResourceStore;
use crate::error::AppError;
use crate::model::{NewResource, Resource, ResourceFilter, ResourcePatch};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryResourceStore {
    rows: RwLock<Vec<Resource>>,
}

impl MemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn materialize(record: NewResource, now: DateTime<Utc>) -> Resource {
    Resource {
        id: Uuid::new_v4(),
        name: record.name,
        description: record.description,
        value: record.value,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl ResourceStore for MemoryResourceStore {
    async fn create(&self, fields: NewResource) -> Result<Resource, AppError> {
        let record = fields.normalized()?;
        let resource = materialize(record, Utc::now());
        self.rows.write().await.push(resource.clone());
        Ok(resource)
    }

    async fn list(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|r| filter.matches(r)).cloned().collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Resource>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|r| r.id == id).cloned())
    }

    async fn update_by_id(&self, id: Uuid, patch: ResourcePatch) -> Result<Option<Resource>, AppError> {
        let mut rows = self.rows.write().await;
        let Some(current) = rows.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        let record = patch.apply_to(current).normalized()?;
        current.name = record.name;
        current.description = record.description;
        current.value = record.value;
        current.updated_at = Utc::now();
        Ok(Some(current.clone()))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Resource>, AppError> {
        let mut rows = self.rows.write().await;
        let removed = rows
            .iter()
            .position(|r| r.id == id)
            .map(|idx| rows.remove(idx));
        Ok(removed)
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.rows.read().await.len() as u64)
    }

    async fn insert_many(&self, items: Vec<NewResource>) -> Result<Vec<Resource>, AppError> {
        let records = items
            .into_iter()
            .map(NewResource::normalized)
            .collect::<Result<Vec<_>, _>>()?;
        let now = Utc::now();
        let created: Vec<Resource> = records.into_iter().map(|r| materialize(r, now)).collect();
        self.rows.write().await.extend(created.iter().cloned());
        Ok(created)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn create_assigns_id_and_timestamps() {
        let store = MemoryResourceStore::new();
        let created = store.create(NewResource::new("Test", None, 10.0)).await.unwrap();
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(store.get_by_id(created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn create_rejects_invalid_record_without_persisting() {
        let store = MemoryResourceStore::new();
        let err = store.create(NewResource::new("ok", None, -0.5)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn update_applies_partial_fields_and_refreshes_updated_at() {
        let store = MemoryResourceStore::new();
        let created = store
            .create(NewResource::new("Test", Some("first"), 10.0))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let patch = ResourcePatch {
            value: Some(20.0),
            ..Default::default()
        };
        let updated = store.update_by_id(created.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.name, "Test");
        assert_eq!(updated.description.as_deref(), Some("first"));
        assert_eq!(updated.value, 20.0);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn update_revalidates_whole_record() {
        let store = MemoryResourceStore::new();
        let created = store.create(NewResource::new("Test", None, 10.0)).await.unwrap();
        let patch = ResourcePatch {
            value: Some(-1.0),
            ..Default::default()
        };
        assert!(matches!(
            store.update_by_id(created.id, patch).await,
            Err(AppError::Validation { .. })
        ));
        assert_eq!(store.get_by_id(created.id).await.unwrap().unwrap().value, 10.0);
    }

    #[tokio::test]
    async fn missing_ids_are_none_not_errors() {
        let store = MemoryResourceStore::new();
        let id = Uuid::new_v4();
        assert_eq!(store.get_by_id(id).await.unwrap(), None);
        assert_eq!(store.update_by_id(id, ResourcePatch::default()).await.unwrap(), None);
        assert_eq!(store.delete_by_id(id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let store = MemoryResourceStore::new();
        let created = store.create(NewResource::new("Test", None, 1.0)).await.unwrap();
        assert_eq!(store.delete_by_id(created.id).await.unwrap().map(|r| r.id), Some(created.id));
        assert_eq!(store.get_by_id(created.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn insert_many_is_all_or_nothing() {
        let store = MemoryResourceStore::new();
        let items = vec![NewResource::new("a", None, 1.0), NewResource::new("", None, 2.0)];
        assert!(store.insert_many(items).await.is_err());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn list_keeps_insertion_order_and_filters() {
        let store = MemoryResourceStore::new();
        for (name, value) in [("Alpha", 5.0), ("beta", 1500.0), ("ALPHABET", 2000.0)] {
            store.create(NewResource::new(name, None, value)).await.unwrap();
        }
        let all = store.list(&ResourceFilter::default()).await.unwrap();
        let names: Vec<_> = all.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "beta", "ALPHABET"]);

        let filter = ResourceFilter {
            name: Some("alpha".into()),
            min_value: Some(1000.0),
            max_value: None,
        };
        let hits = store.list(&filter).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "ALPHABET");
    }
}
