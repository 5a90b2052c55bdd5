//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for the resources table.

use super::params::SqlParam;
use crate::model::{NewResource, ResourceFilter};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Table name used for resources.
pub const RESOURCE_TABLE: &str = "resources";

const COLUMNS: &[&str] = &["id", "name", "description", "value", "created_at", "updated_at"];

/// Quote identifier for PostgreSQL (safe: only from configuration).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Schema-qualified table.
#[derive(Clone, Debug)]
pub struct TableRef {
    pub schema: String,
    pub table: String,
}

impl TableRef {
    pub fn resources(schema: &str) -> Self {
        TableRef {
            schema: schema.to_string(),
            table: RESOURCE_TABLE.to_string(),
        }
    }

    pub fn qualified(&self) -> String {
        format!("{}.{}", quoted(&self.schema), quoted(&self.table))
    }
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: SqlParam) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

fn column_list() -> String {
    COLUMNS.iter().map(|c| quoted(c)).collect::<Vec<_>>().join(", ")
}

/// SELECT by primary key. With `for_update`, the row is locked until the transaction ends.
pub fn select_by_id(table: &TableRef, id: Uuid, for_update: bool) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(SqlParam::Uuid(id));
    let lock = if for_update { " FOR UPDATE" } else { "" };
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}{}",
        column_list(),
        table.qualified(),
        quoted("id"),
        n,
        lock
    );
    q
}

/// SELECT list with optional name substring and inclusive value bounds, oldest first.
pub fn select_list(table: &TableRef, filter: &ResourceFilter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();
    if let Some(name) = &filter.name {
        let n = q.push_param(SqlParam::Text(name.clone()));
        where_parts.push(format!("strpos(lower({}), lower(${})) > 0", quoted("name"), n));
    }
    if let Some(min) = filter.min_value {
        let n = q.push_param(SqlParam::F64(min));
        where_parts.push(format!("{} >= ${}", quoted("value"), n));
    }
    if let Some(max) = filter.max_value {
        let n = q.push_param(SqlParam::F64(max));
        where_parts.push(format!("{} <= ${}", quoted("value"), n));
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {}, {}",
        column_list(),
        table.qualified(),
        where_clause,
        quoted("created_at"),
        quoted("id")
    );
    q
}

/// INSERT one row with server-assigned id and timestamps.
pub fn insert(table: &TableRef, id: Uuid, record: &NewResource, now: DateTime<Utc>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let placeholders = [
        q.push_param(SqlParam::Uuid(id)),
        q.push_param(SqlParam::Text(record.name.clone())),
        q.push_param(SqlParam::OptText(record.description.clone())),
        q.push_param(SqlParam::F64(record.value)),
        q.push_param(SqlParam::Timestamp(now)),
        q.push_param(SqlParam::Timestamp(now)),
    ]
    .iter()
    .map(|n| format!("${}", n))
    .collect::<Vec<_>>();
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        table.qualified(),
        column_list(),
        placeholders.join(", "),
        column_list()
    );
    q
}

/// UPDATE the mutable columns of one row; `created_at` is never touched.
pub fn update(table: &TableRef, id: Uuid, record: &NewResource, now: DateTime<Utc>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let sets = [
        ("name", q.push_param(SqlParam::Text(record.name.clone()))),
        ("description", q.push_param(SqlParam::OptText(record.description.clone()))),
        ("value", q.push_param(SqlParam::F64(record.value))),
        ("updated_at", q.push_param(SqlParam::Timestamp(now))),
    ]
    .iter()
    .map(|(col, n)| format!("{} = ${}", quoted(col), n))
    .collect::<Vec<_>>();
    let id_param = q.push_param(SqlParam::Uuid(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        table.qualified(),
        sets.join(", "),
        quoted("id"),
        id_param,
        column_list()
    );
    q
}

/// DELETE by id, returning the removed row.
pub fn delete(table: &TableRef, id: Uuid) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(SqlParam::Uuid(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${} RETURNING {}",
        table.qualified(),
        quoted("id"),
        n,
        column_list()
    );
    q
}

pub fn count(table: &TableRef) -> String {
    format!("SELECT COUNT(*) FROM {}", table.qualified())
}
