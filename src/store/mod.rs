//! Persistence accessor for resources, with PostgreSQL and in-memory backends.
//!
//! Lookups by id return `Ok(None)` when nothing matches; callers decide whether that is an error.

mod memory;
mod postgres;

pub use memory::MemoryResourceStore;
pub use postgres::{ensure_database_exists, PgResourceStore};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::model::{NewResource, Resource, ResourceFilter, ResourcePatch};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// URL scheme selecting the in-memory backend.
pub const MEMORY_URL_SCHEME: &str = "memory:";

#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Insert one record. Text fields are trimmed and the record invariants enforced.
    async fn create(&self, fields: NewResource) -> Result<Resource, AppError>;

    /// All records matching the filter, oldest first.
    async fn list(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, AppError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Resource>, AppError>;

    /// Apply the supplied fields, re-check the whole record, refresh `updated_at`.
    async fn update_by_id(&self, id: Uuid, patch: ResourcePatch) -> Result<Option<Resource>, AppError>;

    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Resource>, AppError>;

    async fn count(&self) -> Result<u64, AppError>;

    /// Insert all records or none.
    async fn insert_many(&self, items: Vec<NewResource>) -> Result<Vec<Resource>, AppError>;

    /// Cheap liveness probe of the backing store.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Open the backend named by `DATABASE_URL`. PostgreSQL databases are created and migrated.
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn ResourceStore>, AppError> {
    if config.database_url.starts_with(MEMORY_URL_SCHEME) {
        tracing::info!("using in-memory resource store");
        return Ok(Arc::new(MemoryResourceStore::new()));
    }
    let store = PgResourceStore::connect(config).await?;
    Ok(Arc::new(store))
}
