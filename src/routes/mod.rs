//! HTTP surface: operational routes, the resource API, and the JSON 404 fallback.

mod common;
mod resource;

pub use common::common_routes;
pub use resource::resource_routes;

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, Router};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Base path of the resource API.
pub const RESOURCE_BASE_PATH: &str = "/api/resources";

pub(crate) async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".into())
}

/// Full application router with body limit and request tracing.
pub fn app(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .route(
            &format!("{RESOURCE_BASE_PATH}/"),
            resource::collection_routes().with_state(state.clone()),
        )
        .nest(RESOURCE_BASE_PATH, resource_routes(state))
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
