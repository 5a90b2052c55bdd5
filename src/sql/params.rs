//! Typed query parameters and binding onto sqlx queries.

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;
use uuid::Uuid;

/// A value bound to a positional placeholder.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlParam {
    Uuid(Uuid),
    Text(String),
    OptText(Option<String>),
    F64(f64),
    Timestamp(DateTime<Utc>),
}

/// Bind every parameter in placeholder order.
pub fn bind_all<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &'q [SqlParam],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for p in params {
        query = match p {
            SqlParam::Uuid(u) => query.bind(*u),
            SqlParam::Text(s) => query.bind(s.as_str()),
            SqlParam::OptText(s) => query.bind(s.as_deref()),
            SqlParam::F64(n) => query.bind(*n),
            SqlParam::Timestamp(t) => query.bind(*t),
        };
    }
    query
}
