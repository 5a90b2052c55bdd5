//! Resource CRUD handlers: create, list, read, update, delete.
//!
//! Handlers never build error responses themselves; every failure is returned as an [`AppError`].

use crate::error::{AppError, FieldError};
use crate::extractors::JsonBody;
use crate::model::{NewResource, ResourceFilter, ResourcePatch};
use crate::response;
use crate::service::{numeric_value, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::IntoResponse,
};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

pub const VALIDATION_FAILED: &str = "Validation failed";
pub const INVALID_INPUT: &str =
    "Invalid input: name is required and value must be a non-negative number";
pub const RESOURCE_NOT_FOUND: &str = "Resource not found";
pub const RESOURCE_DELETED: &str = "Resource deleted successfully";

fn not_found() -> AppError {
    AppError::NotFound(RESOURCE_NOT_FOUND.into())
}

/// A malformed id was never issued, so it is reported like any other unknown id.
fn parse_id(id_str: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id_str).map_err(|_| not_found())
}

fn fail_on(errors: Vec<FieldError>) -> Result<(), AppError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(VALIDATION_FAILED, errors))
    }
}

/// Business re-check on top of the field validators: name a non-empty string,
/// value a real JSON number that is not negative.
fn create_fields(body: &Value) -> Result<NewResource, AppError> {
    let name = body
        .get("name")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty());
    let value = body
        .get("value")
        .filter(|v| v.is_number())
        .and_then(Value::as_f64)
        .filter(|v| *v >= 0.0);
    let (Some(name), Some(value)) = (name, value) else {
        return Err(AppError::validation(INVALID_INPUT, Vec::new()));
    };
    let description = match body.get("description") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            return Err(AppError::validation(
                VALIDATION_FAILED,
                vec![FieldError::body(
                    "description",
                    "Description must be a string",
                    Some(other),
                )],
            ))
        }
    };
    Ok(NewResource {
        name: name.to_string(),
        description,
        value,
    })
}

/// Fields to change; unknown keys, `id` and timestamps are ignored.
fn patch_fields(body: &Value) -> ResourcePatch {
    let text = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);
    ResourcePatch {
        name: text("name"),
        description: text("description"),
        value: body.get("value").and_then(numeric_value),
    }
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    fail_on(RequestValidator::create(&body))?;
    let fields = create_fields(&body)?;
    let created = state.store.create(fields).await?;
    tracing::debug!(id = %created.id, "resource created");
    Ok(response::created(created))
}

pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let filter = ResourceFilter::from_query(&params);
    let rows = state.store.list(&filter).await?;
    tracing::debug!(count = rows.len(), ?filter, "resources listed");
    Ok(response::ok(rows))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = state.store.get_by_id(id).await?.ok_or_else(not_found)?;
    Ok(response::ok(row))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    fail_on(RequestValidator::update(&body))?;
    let id = parse_id(&id_str)?;
    let row = state
        .store
        .update_by_id(id, patch_fields(&body))
        .await?
        .ok_or_else(not_found)?;
    Ok(response::ok(row))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let removed = state.store.delete_by_id(id).await?.ok_or_else(not_found)?;
    tracing::debug!(id = %removed.id, "resource deleted");
    Ok(response::message(RESOURCE_DELETED))
}
