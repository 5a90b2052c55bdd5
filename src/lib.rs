//! Resource API: a small REST CRUD service for one entity, plus the summation exercises.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod seed;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;
pub mod sum;

pub use config::AppConfig;
pub use error::{AppError, ConfigError, FieldError};
pub use migration::apply_migrations;
pub use model::{NewResource, Resource, ResourceFilter, ResourcePatch};
pub use routes::{app, common_routes, resource_routes, RESOURCE_BASE_PATH};
pub use seed::seed_if_empty;
pub use state::AppState;
pub use store::{ensure_database_exists, open_store, MemoryResourceStore, PgResourceStore, ResourceStore};
