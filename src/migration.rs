//! Create the schema and resources table if they do not exist. Safe to run on every boot.

use crate::error::AppError;
use crate::sql::{quoted, TableRef};
use sqlx::PgPool;

pub async fn apply_migrations(pool: &PgPool, table: &TableRef) -> Result<(), AppError> {
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(&table.schema)))
        .execute(pool)
        .await?;

    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL CHECK (length(name) > 0),
            description TEXT,
            value DOUBLE PRECISION NOT NULL CHECK (value >= 0),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        table.qualified()
    );
    sqlx::query(&ddl).execute(pool).await?;

    let index = format!(
        "CREATE INDEX IF NOT EXISTS {} ON {} (created_at, id)",
        quoted(&format!("{}_created_at_idx", table.table)),
        table.qualified()
    );
    sqlx::query(&index).execute(pool).await?;

    tracing::info!(table = %table.qualified(), "migrations applied");
    Ok(())
}
