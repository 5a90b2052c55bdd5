//! PostgreSQL backend.

use super::ResourceStore;
use crate::config::AppConfig;
use crate::error::{AppError, ConfigError};
use crate::migration::apply_migrations;
use crate::model::{NewResource, Resource, ResourceFilter, ResourcePatch};
use crate::sql::{self, bind_all, TableRef};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use uuid::Uuid;

pub struct PgResourceStore {
    pool: PgPool,
    table: TableRef,
}

impl PgResourceStore {
    pub fn new(pool: PgPool, schema: &str) -> Self {
        PgResourceStore {
            pool,
            table: TableRef::resources(schema),
        }
    }

    /// Create the database if needed, open the pool, and apply migrations.
    pub async fn connect(config: &AppConfig) -> Result<Self, AppError> {
        ensure_database_exists(&config.database_url).await?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;
        let store = Self::new(pool, &config.database_schema);
        apply_migrations(&store.pool, &store.table).await?;
        tracing::info!("database connected");
        Ok(store)
    }
}

#[async_trait]
impl ResourceStore for PgResourceStore {
    async fn create(&self, fields: NewResource) -> Result<Resource, AppError> {
        let record = fields.normalized()?;
        let q = sql::insert(&self.table, Uuid::new_v4(), &record, Utc::now());
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_all(sqlx::query_as::<_, Resource>(&q.sql), &q.params)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, AppError> {
        let q = sql::select_list(&self.table, filter);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_all(sqlx::query_as::<_, Resource>(&q.sql), &q.params)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Resource>, AppError> {
        let q = sql::select_by_id(&self.table, id, false);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_all(sqlx::query_as::<_, Resource>(&q.sql), &q.params)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_by_id(&self, id: Uuid, patch: ResourcePatch) -> Result<Option<Resource>, AppError> {
        let mut tx = self.pool.begin().await?;
        let select = sql::select_by_id(&self.table, id, true);
        tracing::debug!(sql = %select.sql, params = ?select.params, "query (tx)");
        let current = bind_all(sqlx::query_as::<_, Resource>(&select.sql), &select.params)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(current) = current else {
            return Ok(None);
        };
        let record = patch.apply_to(&current).normalized()?;
        let q = sql::update(&self.table, id, &record, Utc::now());
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
        let row = bind_all(sqlx::query_as::<_, Resource>(&q.sql), &q.params)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(row))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Resource>, AppError> {
        let q = sql::delete(&self.table, id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_all(sqlx::query_as::<_, Resource>(&q.sql), &q.params)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn count(&self) -> Result<u64, AppError> {
        let stmt = sql::count(&self.table);
        tracing::debug!(sql = %stmt, "query");
        let n = sqlx::query_scalar::<_, i64>(&stmt).fetch_one(&self.pool).await?;
        Ok(n.max(0) as u64)
    }

    async fn insert_many(&self, items: Vec<NewResource>) -> Result<Vec<Resource>, AppError> {
        let records = items
            .into_iter()
            .map(NewResource::normalized)
            .collect::<Result<Vec<_>, _>>()?;
        let mut out = Vec::with_capacity(records.len());
        let mut tx = self.pool.begin().await?;
        for record in &records {
            let q = sql::insert(&self.table, Uuid::new_v4(), record, Utc::now());
            tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
            let row = bind_all(sqlx::query_as::<_, Resource>(&q.sql), &q.params)
                .fetch_one(&mut *tx)
                .await?;
            out.push(row);
        }
        tx.commit().await?;
        Ok(out)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = PgConnectOptions::from_str(&admin_url).map_err(|e| ConfigError::Invalid {
        name: "DATABASE_URL",
        value: e.to_string(),
    })?;
    let mut conn = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", sql::quoted(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "created database");
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url
        .get(scheme_end..)
        .and_then(|rest| rest.find('/'))
        .map(|i| scheme_end + i + 1)
        .ok_or(ConfigError::Invalid {
            name: "DATABASE_URL",
            value: "no database path".into(),
        })?;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let mut parts = path_and_query.splitn(2, '?');
    let db_name = parts.next().unwrap_or("").trim();
    let query = parts.next().map(|q| format!("?{}", q)).unwrap_or_default();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres{}", base, query);
    Ok((admin_url, db_name.to_string()))
}
