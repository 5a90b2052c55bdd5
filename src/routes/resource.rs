//! Resource CRUD routes, mounted under `/api/resources`.

use super::route_not_found;
use crate::handlers::resource::{create, delete as delete_handler, list, read, update};
use crate::state::AppState;
use axum::{
    routing::{get, MethodRouter},
    Router,
};

/// List and create. Also mounted at the base path with a trailing slash.
pub(crate) fn collection_routes() -> MethodRouter<AppState> {
    get(list).post(create).fallback(route_not_found)
}

pub fn resource_routes(state: AppState) -> Router {
    Router::new()
        .route("/", collection_routes())
        .route(
            "/:id",
            get(read)
                .put(update)
                .delete(delete_handler)
                .fallback(route_not_found),
        )
        .with_state(state)
}
